// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Demes: one aggregated marker per location and world copy.

use alloc::borrow::ToOwned;
use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use tracing::debug;

use crate::aggregate::{ColorCounts, LocationCounts, visible_total};
use crate::config::{DemeStyle, MapOptions, in_world_window};
use crate::diagnostics::Diagnostics;
use crate::index::DemeIndex;
use crate::services::{ColorBlend, PieLayout, Projector};
use crate::types::{Color, GeoTable, LatLong};

/// One pie slice of a deme.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DemeArc {
    /// Color this slice stands for.
    pub color: Color,
    /// Visible tips of that color.
    pub value: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// Always `0.0`: demes are full pies, not donuts.
    pub inner_radius: f64,
    /// Position of the owning deme in [`DemeLayer::demes`].
    pub deme_data_idx: usize,
}

/// How a deme is painted. Chosen once per build by [`DemeStyle`].
#[derive(Clone, Debug, PartialEq)]
pub enum DemeVisual {
    /// Slices in color order.
    Pie(Vec<DemeArc>),
    /// A single blended color.
    Blended(Color),
}

impl DemeVisual {
    /// Paint `counts` in the given style.
    pub(crate) fn new(
        style: DemeStyle,
        counts: &ColorCounts,
        deme_data_idx: usize,
        pie: &impl PieLayout,
        blend: &impl ColorBlend,
    ) -> Self {
        match style {
            DemeStyle::Pie => Self::Pie(pie_arcs(counts, deme_data_idx, pie)),
            DemeStyle::Blended => Self::Blended(blend.blend(counts)),
        }
    }

    /// Repaint from fresh counts, keeping the style.
    ///
    /// Arc angles are patched in place while the location's color set is
    /// unchanged; otherwise the arcs are regenerated in color order.
    pub(crate) fn repaint(
        &mut self,
        counts: &ColorCounts,
        deme_data_idx: usize,
        pie: &impl PieLayout,
        blend: &impl ColorBlend,
    ) {
        match self {
            Self::Pie(arcs) => {
                let same_colors = arcs.len() == counts.len()
                    && arcs.iter().zip(counts.keys()).all(|(a, c)| a.color == *c);
                if !same_colors {
                    *arcs = pie_arcs(counts, deme_data_idx, pie);
                    return;
                }
                let values: Vec<f64> = counts.values().map(|c| f64::from(c.n_visible)).collect();
                let slices = pie.pie(&values);
                debug_assert_eq!(slices.len(), arcs.len(), "pie layout changed slice count");
                for (arc, slice) in arcs.iter_mut().zip(slices) {
                    arc.value = slice.value;
                    arc.start_angle = slice.start_angle;
                    arc.end_angle = slice.end_angle;
                }
            }
            Self::Blended(color) => *color = blend.blend(counts),
        }
    }

    /// The arcs, if this is a pie.
    pub fn arcs(&self) -> Option<&[DemeArc]> {
        match self {
            Self::Pie(arcs) => Some(arcs),
            Self::Blended(_) => None,
        }
    }

    /// The blended color, if this is not a pie.
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Pie(_) => None,
            Self::Blended(color) => Some(*color),
        }
    }
}

fn pie_arcs(counts: &ColorCounts, deme_data_idx: usize, pie: &impl PieLayout) -> Vec<DemeArc> {
    let values: Vec<f64> = counts.values().map(|c| f64::from(c.n_visible)).collect();
    let slices = pie.pie(&values);
    debug_assert_eq!(
        slices.len(),
        values.len(),
        "pie layout must return one slice per value"
    );
    counts
        .keys()
        .zip(slices)
        .map(|(&color, slice)| DemeArc {
            color,
            value: slice.value,
            start_angle: slice.start_angle,
            end_angle: slice.end_angle,
            inner_radius: 0.0,
            deme_data_idx,
        })
        .collect()
}

/// An aggregated marker for one location in one world copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Deme {
    /// Location name.
    pub name: String,
    /// Visible tips at this location.
    pub count: u32,
    /// Raw position, longitude including the world-copy offset.
    pub lat_long: LatLong,
    /// Projected position.
    pub coords: Point,
    /// Pie slices or blended color.
    pub visual: DemeVisual,
}

/// The built deme collection and its location index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemeLayer {
    /// Demes in build order.
    pub demes: Vec<Deme>,
    /// Location → positions in `demes`.
    pub indices: DemeIndex,
    pub(crate) unresolved: BTreeSet<String>,
}

impl DemeLayer {
    /// Number of demes.
    pub fn len(&self) -> usize {
        self.demes.len()
    }

    /// True if there are no demes.
    pub fn is_empty(&self) -> bool {
        self.demes.is_empty()
    }

    /// Every deme drawn for `location`, one per world copy in range.
    pub fn for_location<'a>(&'a self, location: &str) -> impl Iterator<Item = &'a Deme> {
        self.indices
            .get(location)
            .unwrap_or_default()
            .iter()
            .filter_map(|&i| self.demes.get(i))
    }

    /// Locations that had counts but produced no deme when the layer was built:
    /// no coordinates, or every world copy outside the window.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().map(String::as_str)
    }
}

/// Build the deme collection for every location with counts.
///
/// World copies form the outer loop and locations (in name order) the inner
/// one, so repeated builds from equal inputs produce equal layers. A deme is
/// emitted only where the shifted longitude lies strictly inside
/// `(-360, 360)`. Locations without coordinates are reported, not emitted;
/// locations whose copies all fall outside the window are dropped silently.
pub fn build_demes(
    counts: &LocationCounts,
    geo: &GeoTable,
    resolution: &str,
    options: MapOptions,
    projector: &impl Projector,
    pie: &impl PieLayout,
    blend: &impl ColorBlend,
) -> (DemeLayer, Diagnostics) {
    let mut layer = DemeLayer::default();
    let mut diagnostics = Diagnostics::default();

    for &offset in options.world_copies.offsets() {
        for (location, color_counts) in counts {
            let Some(raw) = geo.get(resolution, location) else {
                diagnostics.record_missing_location(location, resolution);
                continue;
            };
            let lat_long = raw.shifted(offset);
            if !in_world_window(lat_long.longitude) {
                continue;
            }
            let position = layer.demes.len();
            layer.demes.push(Deme {
                name: location.to_owned(),
                count: visible_total(color_counts),
                lat_long,
                coords: projector.project_lat_long(lat_long),
                visual: DemeVisual::new(options.deme_style, color_counts, position, pie, blend),
            });
            layer.indices.push(location.clone(), position);
        }
    }
    for location in counts.keys() {
        if !layer.indices.contains(location.as_str()) {
            layer.unresolved.insert(location.clone());
        }
    }

    debug!(
        demes = layer.demes.len(),
        locations = layer.indices.len(),
        unresolved = layer.unresolved.len(),
        "built demes"
    );
    (layer, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_colors;
    use crate::config::WorldCopies;
    use crate::testing::{BLUE, RED, dominant, flat, geo, proportional_pie, two_location_tree};
    use crate::types::{TreeNode, TreeState, Visibility};
    use alloc::vec;
    use core::f64::consts::TAU;

    fn build(options: MapOptions) -> (DemeLayer, Diagnostics) {
        let (nodes, vis, colors) = two_location_tree();
        let counts = aggregate_colors(TreeState::new(&nodes, &vis, &colors), "country");
        build_demes(
            &counts,
            &geo(),
            "country",
            options,
            &flat(1.0, 0.0),
            &proportional_pie,
            &dominant,
        )
    }

    #[test]
    fn single_copy_blended_worked_example() {
        let (layer, diag) = build(MapOptions::new(WorldCopies::Single, DemeStyle::Blended));
        assert!(diag.is_empty());
        assert_eq!(layer.len(), 2);
        let a: Vec<_> = layer.for_location("A").collect();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].count, 1);
        // Blue has no visible tips, so red carries all the weight.
        assert_eq!(a[0].visual.color(), Some(RED));
        assert_eq!(a[0].coords, Point::new(0.0, -10.0));
        assert_eq!(layer.for_location("B").count(), 1);
    }

    #[test]
    fn pie_arcs_follow_color_order_with_back_references() {
        let (layer, _) = build(MapOptions::new(WorldCopies::Single, DemeStyle::Pie));
        let positions = layer.indices.get("A").expect("A indexed");
        let deme = &layer.demes[positions[0]];
        let arcs = deme.visual.arcs().expect("pie visual");
        assert_eq!(arcs.len(), 2);
        // BTreeMap color order: blue (0,0,255) sorts before red (255,0,0).
        assert_eq!(arcs[0].color, BLUE);
        assert_eq!(arcs[1].color, RED);
        assert_eq!(arcs[0].start_angle, arcs[0].end_angle);
        assert_eq!(arcs[1].end_angle - arcs[1].start_angle, TAU);
        assert!(arcs.iter().all(|a| a.inner_radius == 0.0));
        assert!(arcs.iter().all(|a| a.deme_data_idx == positions[0]));
    }

    #[test]
    fn triplicate_copies_are_clipped_to_the_window() {
        let (layer, _) = build(MapOptions::new(WorldCopies::Triplicate, DemeStyle::Pie));
        // A sits on 0 so both wrapped copies land exactly on ±360 and are dropped;
        // B sits on 10E so only its +360 copy falls outside.
        assert_eq!(layer.len(), 3);
        let longs: Vec<f64> = layer
            .for_location("B")
            .map(|d| d.lat_long.longitude)
            .collect();
        assert_eq!(longs, vec![-350.0, 10.0]);
        // Outer loop is the offset, so positions interleave locations.
        assert_eq!(layer.indices.get("B"), Some(&[0, 2][..]));
        assert_eq!(layer.indices.get("A"), Some(&[1][..]));
        let counts: Vec<u32> = layer.for_location("B").map(|d| d.count).collect();
        assert_eq!(counts, vec![1, 1]);
        for (i, deme) in layer.demes.iter().enumerate() {
            if let DemeVisual::Pie(arcs) = &deme.visual {
                assert!(arcs.iter().all(|a| a.deme_data_idx == i));
            }
        }
    }

    #[test]
    fn copies_outside_window_are_clipped() {
        let nodes = vec![TreeNode::new(0, 0.0).with_trait("country", "C")];
        let vis = [Visibility::Visible];
        let colors = [RED];
        let counts = aggregate_colors(TreeState::new(&nodes, &vis, &colors), "country");
        let (layer, _) = build_demes(
            &counts,
            &geo(),
            "country",
            MapOptions::new(WorldCopies::Triplicate, DemeStyle::Blended),
            &flat(1.0, 0.0),
            &proportional_pie,
            &dominant,
        );
        // C sits at 170E; the +360 copy would be at 530 and is dropped.
        let longs: Vec<f64> = layer.demes.iter().map(|d| d.lat_long.longitude).collect();
        assert_eq!(longs, vec![-190.0, 170.0]);
    }

    #[test]
    fn missing_geography_is_reported_not_fatal() {
        let nodes = vec![
            TreeNode::new(0, 0.0).with_trait("country", "A"),
            TreeNode::new(1, 0.0).with_trait("country", "Atlantis"),
        ];
        let vis = [Visibility::Visible; 2];
        let colors = [RED; 2];
        let counts = aggregate_colors(TreeState::new(&nodes, &vis, &colors), "country");
        let (layer, diag) = build_demes(
            &counts,
            &geo(),
            "country",
            MapOptions::new(WorldCopies::Triplicate, DemeStyle::Pie),
            &flat(1.0, 0.0),
            &proportional_pie,
            &dominant,
        );
        assert_eq!(layer.len(), 1);
        assert!(diag.missing_locations.contains("Atlantis"));
        assert_eq!(diag.missing_locations.len(), 1);
        assert_eq!(layer.unresolved().collect::<Vec<_>>(), vec!["Atlantis"]);
        assert!(layer.indices.get("Atlantis").is_none());
    }

    #[test]
    fn location_outside_every_copy_is_unresolved_not_missing() {
        let nodes = vec![
            TreeNode::new(0, 0.0).with_trait("country", "A"),
            TreeNode::new(1, 0.0).with_trait("country", "Z"),
        ];
        let vis = [Visibility::Visible; 2];
        let colors = [RED; 2];
        let counts = aggregate_colors(TreeState::new(&nodes, &vis, &colors), "country");
        let mut table = geo();
        table.insert("country", "Z", LatLong::new(0.0, 400.0));
        let (layer, diag) = build_demes(
            &counts,
            &table,
            "country",
            MapOptions::new(WorldCopies::Single, DemeStyle::Pie),
            &flat(1.0, 0.0),
            &proportional_pie,
            &dominant,
        );
        assert!(diag.is_empty());
        assert_eq!(layer.len(), 1);
        assert!(!layer.indices.contains("Z"));
        assert_eq!(layer.unresolved().collect::<Vec<_>>(), vec!["Z"]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let options = MapOptions::new(WorldCopies::Triplicate, DemeStyle::Pie);
        assert_eq!(build(options), build(options));
    }
}
