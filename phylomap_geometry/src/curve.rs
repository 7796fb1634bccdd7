// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bowed transmission curves.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{ParamCurve, Point, QuadBez, Vec2};
use phylomap_core::CurveService;

/// Quadratic arcs that bow to the left of travel and fan out when repeated.
///
/// The control point sits on the perpendicular bisector of the chord, at a
/// height of `bulge * chord * (1 + spread * (extend - 1))`. The curve is
/// sampled uniformly in its parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcCurve {
    /// Number of samples, at least two.
    pub samples: usize,
    /// Control point height for the first edge, as a fraction of chord length.
    pub bulge: f64,
    /// Extra height per repeated edge, as a fraction of the first height.
    pub spread: f64,
}

impl Default for ArcCurve {
    fn default() -> Self {
        Self {
            samples: 15,
            bulge: 0.2,
            spread: 0.5,
        }
    }
}

impl ArcCurve {
    /// The Bézier this service samples for an edge.
    pub fn bezier(&self, origin: Point, destination: Point, extend: u32) -> QuadBez {
        let chord = destination - origin;
        let length = chord.hypot();
        let mid = origin.midpoint(destination);
        if length == 0.0 {
            return QuadBez::new(origin, mid, destination);
        }
        // Screen y grows downward, so (y, -x) points to the left of travel.
        let normal = Vec2::new(chord.y, -chord.x) / length;
        let repeats = f64::from(extend.saturating_sub(1));
        let height = self.bulge * length * (1.0 + self.spread * repeats);
        QuadBez::new(origin, mid + normal * height, destination)
    }
}

impl CurveService for ArcCurve {
    fn curve(&self, origin: Point, destination: Point, extend: u32) -> Vec<Point> {
        let n = self.samples.max(2);
        if origin == destination {
            return vec![origin; n];
        }
        let bez = self.bezier(origin, destination, extend);
        let last = (n - 1) as f64;
        let mut points: Vec<Point> = (0..n).map(|i| bez.eval(i as f64 / last)).collect();
        // Pin the ends so they match the projected endpoints bit for bit.
        points[0] = origin;
        points[n - 1] = destination;
        points
    }
}

/// Two-point curves: straight segments between the endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StraightCurve;

impl CurveService for StraightCurve {
    fn curve(&self, origin: Point, destination: Point, _extend: u32) -> Vec<Point> {
        vec![origin, destination]
    }
}
