// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transmissions: curves along tree edges whose endpoints sit in different locations.
//!
//! Each edge is realized at most once per origin world copy. For a given origin
//! copy every destination copy is tried, and the candidate whose endpoints are
//! horizontally closest on screen wins, so an edge from 170E to 170W takes the
//! short way across the date line rather than spanning the whole map.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Point;
use tracing::debug;

use crate::config::{MAX_LONGITUDE_SPAN, WORLD_WIDTH, WRAP_OFFSETS, WorldCopies, in_world_window};
use crate::diagnostics::Diagnostics;
use crate::index::TransmissionIndex;
use crate::services::{CurveService, Projector};
use crate::types::{Color, GeoNode, GeoTable, LatLong, TreeState, Visibility};

/// Stable identity of a tree edge: parent and child `array_idx`.
///
/// Displays as `"<parent>-<child>"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransmissionId {
    /// `array_idx` of the parent node.
    pub origin: usize,
    /// `array_idx` of the child node.
    pub destination: usize,
}

impl TransmissionId {
    /// The id of the edge `origin → destination`.
    pub const fn new(origin: usize, destination: usize) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

impl fmt::Display for TransmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.destination)
    }
}

/// One rendered curve for one edge at one origin world copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Transmission {
    /// Edge identity; shared by every world copy of the same edge.
    pub id: TransmissionId,
    /// Sampled curve in screen space.
    pub curve: Vec<Point>,
    /// Interpolated date for each curve sample.
    pub dates: Vec<f64>,
    /// Origin location name.
    pub origin_name: String,
    /// Destination location name.
    pub destination_name: String,
    /// Projected origin.
    pub origin_coords: Point,
    /// Projected destination.
    pub destination_coords: Point,
    /// Raw origin, longitude including its world-copy offset.
    pub origin_lat_long: LatLong,
    /// Raw destination, longitude including its world-copy offset.
    pub destination_lat_long: LatLong,
    /// Parent's numeric date.
    pub origin_num_date: f64,
    /// Child's numeric date.
    pub destination_num_date: f64,
    /// Parent's color.
    pub color: Color,
    /// Child's visibility.
    pub visible: Visibility,
    /// Occurrence number of this location pair, used to fan out parallel curves.
    pub extend: u32,
}

/// The built transmission collection and its id index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransmissionLayer {
    /// Transmissions in traversal order.
    pub transmissions: Vec<Transmission>,
    /// Id → positions in `transmissions`.
    pub indices: TransmissionIndex,
    pub(crate) unrendered: BTreeSet<TransmissionId>,
}

impl TransmissionLayer {
    /// Number of transmissions.
    pub fn len(&self) -> usize {
        self.transmissions.len()
    }

    /// True if there are no transmissions.
    pub fn is_empty(&self) -> bool {
        self.transmissions.is_empty()
    }

    /// Every realization of the edge `id`.
    pub fn for_id(&self, id: TransmissionId) -> impl Iterator<Item = &Transmission> {
        self.indices
            .get(&id)
            .unwrap_or_default()
            .iter()
            .filter_map(|&i| self.transmissions.get(i))
    }

    /// Location-changing edges that produced no transmission at all.
    pub fn unrendered(&self) -> impl Iterator<Item = TransmissionId> + '_ {
        self.unrendered.iter().copied()
    }
}

/// A tree edge whose endpoints carry distinct trait values.
pub(crate) struct LocationEdge<'a, N> {
    pub(crate) parent: &'a N,
    pub(crate) child: &'a N,
    pub(crate) origin: &'a str,
    pub(crate) destination: &'a str,
}

impl<N: GeoNode> LocationEdge<'_, N> {
    pub(crate) fn id(&self) -> TransmissionId {
        TransmissionId::new(self.parent.array_idx(), self.child.array_idx())
    }
}

/// Every edge that changes location, in traversal order.
pub(crate) fn location_edges<'a, N: GeoNode>(
    tree: TreeState<'a, N>,
    resolution: &'a str,
) -> impl Iterator<Item = LocationEdge<'a, N>> {
    tree.edges().filter_map(move |(parent, child)| {
        let origin = parent.location(resolution)?;
        let destination = child.location(resolution)?;
        (origin != destination).then_some(LocationEdge {
            parent,
            child,
            origin,
            destination,
        })
    })
}

/// Whether a path between two shifted longitudes may be drawn.
///
/// At least one end must lie inside the `(-360, 360)` window, the pair must not
/// sit wholly at or beyond the eastern edge, and the path may not span 180° or
/// more (that would be the long way round).
pub fn is_drawable_span(origin_longitude: f64, destination_longitude: f64) -> bool {
    (in_world_window(origin_longitude) || in_world_window(destination_longitude))
        && (origin_longitude < WORLD_WIDTH || destination_longitude < WORLD_WIDTH)
        && (origin_longitude - destination_longitude).abs() < MAX_LONGITUDE_SPAN
}

/// Dates for each of `samples` curve points, from `start` at the first to `end` at the last.
///
/// The curve service guarantees at least two samples.
pub fn interpolate_dates(samples: usize, start: f64, end: f64) -> Vec<f64> {
    debug_assert!(samples >= 2, "curves must have at least two points");
    let last = samples.saturating_sub(1) as f64;
    (0..samples)
        .map(|i| {
            let t = i as f64 / last;
            start * (1.0 - t) + end * t
        })
        .collect()
}

struct Candidate {
    origin: LatLong,
    destination: LatLong,
    origin_coords: Point,
    destination_coords: Point,
}

impl Candidate {
    fn horizontal_span(&self) -> f64 {
        (self.origin_coords.x - self.destination_coords.x).abs()
    }
}

/// The drawable destination copy closest on screen to the origin at `origin_offset`.
///
/// Ties keep the westernmost destination copy.
fn closest_candidate(
    origin: LatLong,
    destination: LatLong,
    origin_offset: f64,
    projector: &impl Projector,
) -> Option<Candidate> {
    let origin = origin.shifted(origin_offset);
    let mut best: Option<Candidate> = None;
    for &destination_offset in &WRAP_OFFSETS {
        let destination = destination.shifted(destination_offset);
        if !is_drawable_span(origin.longitude, destination.longitude) {
            continue;
        }
        let candidate = Candidate {
            origin,
            destination,
            origin_coords: projector.project_lat_long(origin),
            destination_coords: projector.project_lat_long(destination),
        };
        if best
            .as_ref()
            .is_none_or(|b| candidate.horizontal_span() < b.horizontal_span())
        {
            best = Some(candidate);
        }
    }
    best
}

/// Resolve every location-changing edge into transmissions.
///
/// Edges are visited in node order, then child order. The `n`th edge between
/// the same ordered location pair gets `extend = n`. Endpoints without
/// coordinates are reported in the returned [`Diagnostics`]; edges for which no
/// drawable candidate exists are silently left out.
pub fn resolve_transmissions<N: GeoNode>(
    tree: TreeState<'_, N>,
    resolution: &str,
    geo: &GeoTable,
    world_copies: WorldCopies,
    projector: &impl Projector,
    curves: &impl CurveService,
) -> (TransmissionLayer, Diagnostics) {
    let mut layer = TransmissionLayer::default();
    let mut diagnostics = Diagnostics::default();
    let mut pair_counts: HashMap<(&str, &str), u32> = HashMap::new();

    for edge in location_edges(tree, resolution) {
        let extend = {
            let n = pair_counts
                .entry((edge.origin, edge.destination))
                .or_insert(0);
            *n += 1;
            *n
        };
        let id = edge.id();

        let origin = geo.get(resolution, edge.origin);
        if origin.is_none() {
            diagnostics.record_missing_location(edge.origin, resolution);
        }
        let destination = geo.get(resolution, edge.destination);
        if destination.is_none() {
            diagnostics.record_missing_location(edge.destination, resolution);
        }
        let (Some(origin), Some(destination)) = (origin, destination) else {
            layer.unrendered.insert(id);
            continue;
        };

        let before = layer.transmissions.len();
        for &origin_offset in world_copies.offsets() {
            let Some(chosen) = closest_candidate(origin, destination, origin_offset, projector)
            else {
                continue;
            };
            let curve = curves.curve(chosen.origin_coords, chosen.destination_coords, extend);
            let origin_num_date = edge.parent.num_date();
            let destination_num_date = edge.child.num_date();
            layer.transmissions.push(Transmission {
                id,
                dates: interpolate_dates(curve.len(), origin_num_date, destination_num_date),
                curve,
                origin_name: edge.origin.into(),
                destination_name: edge.destination.into(),
                origin_coords: chosen.origin_coords,
                destination_coords: chosen.destination_coords,
                origin_lat_long: chosen.origin,
                destination_lat_long: chosen.destination,
                origin_num_date,
                destination_num_date,
                color: tree.color_of(edge.parent),
                visible: tree.visibility_of(edge.child),
                extend,
            });
        }
        if layer.transmissions.len() == before {
            layer.unrendered.insert(id);
        }
    }

    layer.indices = layer
        .transmissions
        .iter()
        .enumerate()
        .map(|(position, t)| (t.id, position))
        .collect();

    debug!(
        transmissions = layer.transmissions.len(),
        edges = layer.indices.len(),
        unrendered = layer.unrendered.len(),
        "resolved transmissions"
    );
    (layer, diagnostics)
}
