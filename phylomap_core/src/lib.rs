// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Phylomap Core: turn an annotated phylogeny into map data.
//!
//! Given a tree whose nodes carry a location per geographic resolution, a
//! coordinate table, and per-node visibility and color, this crate builds the
//! two collections a phylogeographic map draws:
//!
//! - **Demes**: one marker per location and world copy, painted as a pie of
//!   visible tip colors or as a single blended color.
//! - **Transmissions**: one curve per tree edge that changes location, routed
//!   the short way across the date line.
//!
//! Built layers carry index maps so they can be patched cheaply when only
//! visibility and colors change, or when the viewport moves.
//!
//! ## Pipeline
//!
//! - [`aggregate_colors`]: per-location, per-color tip counts.
//! - [`build_demes`]: demes plus a location → positions [`DemeIndex`].
//! - [`resolve_transmissions`]: transmissions plus an id → positions [`TransmissionIndex`].
//! - [`update_visibility_and_colors`] and [`update_projection`]: in-place patches of
//!   built layers, equal in result to a rebuild.
//! - [`MapData`] runs the whole pipeline and wraps both updates.
//!
//! Projection, curve sampling, pie layout and color blending are supplied by the
//! caller through the [`Projector`], [`CurveService`], [`PieLayout`] and
//! [`ColorBlend`] traits. Closures of the matching shape implement them.
//! `phylomap_geometry` provides ready-made implementations.
//!
//! ## World copies
//!
//! With [`WorldCopies::Triplicate`] the world is laid out three times, at
//! longitude offsets -360, 0 and +360, and anything that lands on or beyond
//! ±360 is dropped. Transmission destinations are always allowed to wrap, so
//! even a single world copy draws a 170E → 170W edge as a short hop.
//!
//! ## Diagnostics
//!
//! Nothing here fails. Locations without coordinates and stale index entries
//! are skipped, logged through `tracing`, and returned in a [`Diagnostics`]
//! value next to the result.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use phylomap_core::{
//!     Color, ColorCounts, GeoTable, LatLong, PieSlice, TreeNode, TreeState, Visibility,
//!     WorldCopies, aggregate_colors, resolve_transmissions, update_visibility_and_colors,
//! };
//! # use phylomap_core::{MapOptions, build_demes};
//!
//! let red = Color::rgb(255, 0, 0);
//! let nodes = [
//!     TreeNode::new(0, 2010.0).with_trait("country", "peru").with_children([1, 2]),
//!     TreeNode::new(1, 2012.5).with_trait("country", "peru"),
//!     TreeNode::new(2, 2013.0).with_trait("country", "chile"),
//! ];
//! let mut visibility = [Visibility::Visible; 3];
//! let colors = [red; 3];
//!
//! let mut geo = GeoTable::new();
//! geo.insert("country", "peru", LatLong::new(-9.2, -75.0));
//! geo.insert("country", "chile", LatLong::new(-35.7, -71.5));
//!
//! let project = |lat: f64, long: f64| Point::new(long * 2.0, -lat * 2.0);
//! let curve = |a: Point, b: Point, _extend: u32| vec![a, a.midpoint(b), b];
//! let pie = |values: &[f64]| -> Vec<PieSlice> {
//!     values.iter().map(|&value| PieSlice { value, ..PieSlice::default() }).collect()
//! };
//! let blend = |_: &ColorCounts| red;
//!
//! let tree = TreeState::new(&nodes, &visibility, &colors);
//! let counts = aggregate_colors(tree, "country");
//! let (demes, _) = build_demes(&counts, &geo, "country", MapOptions::default(), &project, &pie, &blend);
//! let (transmissions, _) =
//!     resolve_transmissions(tree, "country", &geo, WorldCopies::Triplicate, &project, &curve);
//! assert_eq!(transmissions.transmissions[0].dates, [2010.0, 2011.5, 2013.0]);
//!
//! // Hide the Chilean tip; only counts and visibility flags change.
//! visibility[2] = Visibility::NotVisible;
//! let tree = TreeState::new(&nodes, &visibility, &colors);
//! let update =
//!     update_visibility_and_colors(Some(demes), Some(transmissions), tree, "country", &pie, &blend)
//!         .unwrap();
//! assert!(update.demes.for_location("chile").all(|d| d.count == 0));
//! assert!(update.transmissions.transmissions.iter().all(|t| !t.visible.is_visible()));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod aggregate;
mod config;
mod deme;
mod diagnostics;
mod index;
mod map;
mod services;
mod transmission;
mod types;
mod update;

#[cfg(test)]
mod testing;

pub use aggregate::{
    ColorCount, ColorCounts, LocationCounts, aggregate_colors, total, visible_total,
};
pub use config::{DemeStyle, MAX_LONGITUDE_SPAN, MapOptions, WORLD_WIDTH, WRAP_OFFSETS, WorldCopies};
pub use deme::{Deme, DemeArc, DemeLayer, DemeVisual, build_demes};
pub use diagnostics::Diagnostics;
pub use index::{DemeIndex, PositionIndex, Positions, TransmissionIndex};
pub use map::{MapData, Services};
pub use services::{ColorBlend, CurveService, PieLayout, PieSlice, Projector};
pub use transmission::{
    Transmission, TransmissionId, TransmissionLayer, interpolate_dates, is_drawable_span,
    resolve_transmissions,
};
pub use types::{Color, GeoNode, GeoTable, LatLong, TreeNode, TreeState, Visibility};
pub use update::{MapUpdate, update_projection, update_visibility_and_colors};
