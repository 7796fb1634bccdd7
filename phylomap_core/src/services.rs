// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams to the external services: projection, curves, pie layout, and color blending.
//!
//! Each trait is also implemented for plain closures of the matching shape, so
//! callers can pass `|lat, long| ...` where a [`Projector`] is expected.

use alloc::vec::Vec;

use kurbo::Point;

use crate::aggregate::ColorCounts;
use crate::types::{Color, LatLong};

/// Maps a geographic position to a screen point under the current viewport.
///
/// Must be pure for a fixed viewport state.
pub trait Projector {
    /// Project `(latitude, longitude)` in degrees to screen space.
    fn project(&self, latitude: f64, longitude: f64) -> Point;

    /// Project a [`LatLong`].
    fn project_lat_long(&self, at: LatLong) -> Point {
        self.project(at.latitude, at.longitude)
    }
}

impl<F: Fn(f64, f64) -> Point> Projector for F {
    fn project(&self, latitude: f64, longitude: f64) -> Point {
        self(latitude, longitude)
    }
}

/// Samples a smooth path between two screen points.
///
/// `extend` counts how many edges already join the same pair of locations,
/// starting at 1; implementations use it to fan repeated edges apart.
/// The result must contain at least two points.
pub trait CurveService {
    /// Ordered samples from `origin` to `destination`.
    fn curve(&self, origin: Point, destination: Point, extend: u32) -> Vec<Point>;
}

impl<F: Fn(Point, Point, u32) -> Vec<Point>> CurveService for F {
    fn curve(&self, origin: Point, destination: Point, extend: u32) -> Vec<Point> {
        self(origin, destination, extend)
    }
}

/// One angular slice produced by a [`PieLayout`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PieSlice {
    /// The input magnitude.
    pub value: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
}

/// Partitions magnitudes into angular arcs.
///
/// The output matches the input in order and length.
pub trait PieLayout {
    /// Lay out one slice per value.
    fn pie(&self, values: &[f64]) -> Vec<PieSlice>;
}

impl<F: Fn(&[f64]) -> Vec<PieSlice>> PieLayout for F {
    fn pie(&self, values: &[f64]) -> Vec<PieSlice> {
        self(values)
    }
}

/// Reduces a location's color counts to a single display color.
pub trait ColorBlend {
    /// Blend `counts` into one color.
    fn blend(&self, counts: &ColorCounts) -> Color;
}

impl<F: Fn(&ColorCounts) -> Color> ColorBlend for F {
    fn blend(&self, counts: &ColorCounts) -> Color {
        self(counts)
    }
}
