// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental updates of built layers.
//!
//! Both updates take the layers by value and hand back patched layers, leaving
//! lengths and index maps as they were. They are independent of one another and
//! may be applied in either order.

use tracing::debug;

use crate::aggregate::{aggregate_colors, visible_total};
use crate::deme::DemeLayer;
use crate::diagnostics::Diagnostics;
use crate::services::{ColorBlend, CurveService, PieLayout, Projector};
use crate::transmission::{TransmissionLayer, location_edges};
use crate::types::{GeoNode, TreeState};

/// Layers after an update, with anything that could not be patched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapUpdate {
    /// Patched demes.
    pub demes: DemeLayer,
    /// Patched transmissions.
    pub transmissions: TransmissionLayer,
    /// Stale index entries met while patching.
    pub diagnostics: Diagnostics,
}

/// Repaint demes and transmissions for new visibility and colors.
///
/// Counts are aggregated afresh. Each deme gets its new visible count and
/// either new arc angles or a new blended color, according to the visual it was
/// built with. Each transmission gets its parent's color and its child's
/// visibility. Positions and curves are left alone.
///
/// Returns `None` if either layer is missing.
pub fn update_visibility_and_colors<N: GeoNode>(
    demes: Option<DemeLayer>,
    transmissions: Option<TransmissionLayer>,
    tree: TreeState<'_, N>,
    resolution: &str,
    pie: &impl PieLayout,
    blend: &impl ColorBlend,
) -> Option<MapUpdate> {
    let (mut demes, mut transmissions) = (demes?, transmissions?);
    let mut diagnostics = Diagnostics::default();
    repaint_demes(&mut demes, tree, resolution, pie, blend, &mut diagnostics);
    restyle_transmissions(&mut transmissions, tree, resolution, &mut diagnostics);
    debug!(
        demes = demes.len(),
        transmissions = transmissions.len(),
        stale = diagnostics.stale_locations.len() + diagnostics.stale_transmissions.len(),
        "updated visibility and colors"
    );
    Some(MapUpdate {
        demes,
        transmissions,
        diagnostics,
    })
}

/// Re-project demes and transmissions after the viewport changed.
///
/// Deme and endpoint coordinates are recomputed from the stored raw positions
/// and curves are rebuilt with their stored `extend`. Dates are kept.
///
/// Returns `None` if either layer is missing.
pub fn update_projection(
    demes: Option<DemeLayer>,
    transmissions: Option<TransmissionLayer>,
    projector: &impl Projector,
    curves: &impl CurveService,
) -> Option<MapUpdate> {
    let (mut demes, mut transmissions) = (demes?, transmissions?);
    reproject_demes(&mut demes, projector);
    reproject_transmissions(&mut transmissions, projector, curves);
    debug!(
        demes = demes.len(),
        transmissions = transmissions.len(),
        "updated projection"
    );
    Some(MapUpdate {
        demes,
        transmissions,
        diagnostics: Diagnostics::default(),
    })
}

fn repaint_demes<N: GeoNode>(
    layer: &mut DemeLayer,
    tree: TreeState<'_, N>,
    resolution: &str,
    pie: &impl PieLayout,
    blend: &impl ColorBlend,
    diagnostics: &mut Diagnostics,
) {
    for (location, counts) in &aggregate_colors(tree, resolution) {
        let Some(positions) = layer.indices.get(location.as_str()) else {
            if !layer.unresolved.contains(location) {
                diagnostics.record_stale_location(location);
            }
            continue;
        };
        for &position in positions {
            let Some(deme) = layer.demes.get_mut(position) else {
                diagnostics.record_stale_location(location);
                continue;
            };
            deme.count = visible_total(counts);
            deme.visual.repaint(counts, position, pie, blend);
        }
    }
}

fn restyle_transmissions<N: GeoNode>(
    layer: &mut TransmissionLayer,
    tree: TreeState<'_, N>,
    resolution: &str,
    diagnostics: &mut Diagnostics,
) {
    for edge in location_edges(tree, resolution) {
        let id = edge.id();
        let Some(positions) = layer.indices.get(&id) else {
            if !layer.unrendered.contains(&id) {
                diagnostics.record_stale_transmission(id);
            }
            continue;
        };
        let color = tree.color_of(edge.parent);
        let visible = tree.visibility_of(edge.child);
        for &position in positions {
            let Some(transmission) = layer.transmissions.get_mut(position) else {
                diagnostics.record_stale_transmission(id);
                continue;
            };
            transmission.color = color;
            transmission.visible = visible;
        }
    }
}

fn reproject_demes(layer: &mut DemeLayer, projector: &impl Projector) {
    for deme in &mut layer.demes {
        deme.coords = projector.project_lat_long(deme.lat_long);
    }
}

fn reproject_transmissions(
    layer: &mut TransmissionLayer,
    projector: &impl Projector,
    curves: &impl CurveService,
) {
    for t in &mut layer.transmissions {
        t.origin_coords = projector.project_lat_long(t.origin_lat_long);
        t.destination_coords = projector.project_lat_long(t.destination_lat_long);
        t.curve = curves.curve(t.origin_coords, t.destination_coords, t.extend);
        debug_assert_eq!(
            t.curve.len(),
            t.dates.len(),
            "curve service changed its sample count"
        );
    }
}
