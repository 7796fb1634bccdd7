// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Phylomap Geometry: default services for `phylomap_core`, built on [`kurbo`].
//!
//! - [`MercatorViewport`]: Web Mercator projection under a pan/zoom [`kurbo::Affine`].
//! - [`ArcCurve`]: quadratic transmission arcs that fan out for repeated edges.
//!   [`StraightCurve`] draws plain two-point segments.
//! - [`CircularPie`]: pie layout proportional to visible counts.
//! - [`WeightedRgbBlend`]: count-weighted color average for blended demes.
//!
//! ```
//! use phylomap_core::{
//!     Color, GeoTable, LatLong, MapData, MapOptions, Services, TreeNode, TreeState, Visibility,
//! };
//! use phylomap_geometry::{ArcCurve, CircularPie, MercatorViewport, WeightedRgbBlend};
//!
//! let nodes = [
//!     TreeNode::new(0, 2015.0).with_trait("country", "fiji").with_children([1]),
//!     TreeNode::new(1, 2016.0).with_trait("country", "samoa"),
//! ];
//! let visibility = [Visibility::Visible; 2];
//! let colors = [Color::rgb(20, 120, 200); 2];
//!
//! let mut geo = GeoTable::new();
//! geo.insert("country", "fiji", LatLong::new(-17.7, 178.0));
//! geo.insert("country", "samoa", LatLong::new(-13.8, -172.1));
//!
//! let viewport = MercatorViewport::new(1024.0);
//! let services = Services {
//!     projector: &viewport,
//!     curves: &ArcCurve::default(),
//!     pie: &CircularPie::default(),
//!     blend: &WeightedRgbBlend::default(),
//! };
//! let tree = TreeState::new(&nodes, &visibility, &colors);
//! let (map, _) = MapData::build(tree, "country", &geo, MapOptions::default(), services);
//!
//! // Fiji to Samoa crosses the date line: Samoa is reached through its eastern copy.
//! let hop = map
//!     .transmissions
//!     .transmissions
//!     .iter()
//!     .find(|t| t.origin_lat_long.longitude == 178.0)
//!     .unwrap();
//! assert!(hop.destination_lat_long.longitude > 180.0);
//! assert_eq!(hop.curve.len(), 15);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod blend;
mod curve;
mod pie;
mod projection;

pub use blend::WeightedRgbBlend;
pub use curve::{ArcCurve, StraightCurve};
pub use pie::CircularPie;
pub use projection::{MAX_LATITUDE, MercatorViewport};
