// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`MapData`]: both layers of a built map, kept together.

use crate::aggregate::aggregate_colors;
use crate::config::MapOptions;
use crate::deme::{DemeLayer, build_demes};
use crate::diagnostics::Diagnostics;
use crate::services::{ColorBlend, CurveService, PieLayout, Projector};
use crate::transmission::{TransmissionLayer, resolve_transmissions};
use crate::types::{GeoNode, GeoTable, TreeState};
use crate::update::{MapUpdate, update_projection, update_visibility_and_colors};

/// The external services a full build needs.
#[derive(Debug)]
pub struct Services<'s, P, C, L, B> {
    /// Screen projection.
    pub projector: &'s P,
    /// Curve sampling.
    pub curves: &'s C,
    /// Pie layout.
    pub pie: &'s L,
    /// Color blending.
    pub blend: &'s B,
}

impl<P, C, L, B> Clone for Services<'_, P, C, L, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C, L, B> Copy for Services<'_, P, C, L, B> {}

/// Demes and transmissions built from one tree, resolution and geography.
///
/// ```
/// use kurbo::Point;
/// use phylomap_core::{
///     Color, ColorCounts, DemeStyle, GeoTable, LatLong, MapData, MapOptions, PieSlice, Services,
///     TreeNode, TreeState, Visibility, WorldCopies,
/// };
///
/// let nodes = [
///     TreeNode::new(0, 2000.0).with_trait("region", "north").with_children([1]),
///     TreeNode::new(1, 2001.0).with_trait("region", "south"),
/// ];
/// let visibility = [Visibility::Visible; 2];
/// let colors = [Color::rgb(200, 40, 40); 2];
///
/// let mut geo = GeoTable::new();
/// geo.insert("region", "north", LatLong::new(50.0, 5.0));
/// geo.insert("region", "south", LatLong::new(-10.0, 20.0));
///
/// let projector = |lat: f64, long: f64| Point::new(long, -lat);
/// let curves = |a: Point, b: Point, _extend: u32| vec![a, b];
/// let pie = |values: &[f64]| -> Vec<PieSlice> {
///     values.iter().map(|&value| PieSlice { value, ..PieSlice::default() }).collect()
/// };
/// let blend = |_: &ColorCounts| Color::rgb(0, 0, 0);
/// let services = Services { projector: &projector, curves: &curves, pie: &pie, blend: &blend };
///
/// let (map, diagnostics) = MapData::build(
///     TreeState::new(&nodes, &visibility, &colors),
///     "region",
///     &geo,
///     MapOptions::new(WorldCopies::Single, DemeStyle::Pie),
///     services,
/// );
/// assert!(diagnostics.is_empty());
/// // Only tips are counted, so only "south" gets a deme.
/// assert_eq!(map.demes.len(), 1);
/// assert_eq!(map.transmissions.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapData {
    /// Aggregated markers per location and world copy.
    pub demes: DemeLayer,
    /// Curves per location-changing edge and world copy.
    pub transmissions: TransmissionLayer,
    /// Options the layers were built with.
    pub options: MapOptions,
}

impl MapData {
    /// Aggregate, build demes and resolve transmissions in one go.
    pub fn build<N, P, C, L, B>(
        tree: TreeState<'_, N>,
        resolution: &str,
        geo: &GeoTable,
        options: MapOptions,
        services: Services<'_, P, C, L, B>,
    ) -> (Self, Diagnostics)
    where
        N: GeoNode,
        P: Projector,
        C: CurveService,
        L: PieLayout,
        B: ColorBlend,
    {
        let counts = aggregate_colors(tree, resolution);
        let (demes, mut diagnostics) = build_demes(
            &counts,
            geo,
            resolution,
            options,
            services.projector,
            services.pie,
            services.blend,
        );
        let (transmissions, more) = resolve_transmissions(
            tree,
            resolution,
            geo,
            options.world_copies,
            services.projector,
            services.curves,
        );
        diagnostics.merge(more);
        let map = Self {
            demes,
            transmissions,
            options,
        };
        (map, diagnostics)
    }

    /// Repaint for new visibility and colors; see [`update_visibility_and_colors`].
    pub fn with_visibility_and_colors<N: GeoNode>(
        self,
        tree: TreeState<'_, N>,
        resolution: &str,
        pie: &impl PieLayout,
        blend: &impl ColorBlend,
    ) -> (Self, Diagnostics) {
        let options = self.options;
        let update = update_visibility_and_colors(
            Some(self.demes),
            Some(self.transmissions),
            tree,
            resolution,
            pie,
            blend,
        );
        Self::from_update(update, options)
    }

    /// Re-project for a new viewport; see [`update_projection`].
    pub fn with_projection(
        self,
        projector: &impl Projector,
        curves: &impl CurveService,
    ) -> (Self, Diagnostics) {
        let options = self.options;
        let update = update_projection(
            Some(self.demes),
            Some(self.transmissions),
            projector,
            curves,
        );
        Self::from_update(update, options)
    }

    fn from_update(update: Option<MapUpdate>, options: MapOptions) -> (Self, Diagnostics) {
        // Both layers are always passed in, so the update cannot be skipped.
        let MapUpdate {
            demes,
            transmissions,
            diagnostics,
        } = update.unwrap_or_default();
        let map = Self {
            demes,
            transmissions,
            options,
        };
        (map, diagnostics)
    }
}
