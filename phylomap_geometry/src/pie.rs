// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proportional pie layout.

use alloc::vec::Vec;
use core::f64::consts::TAU;

use phylomap_core::{PieLayout, PieSlice};

/// Splits an angular range into slices proportional to the input values.
///
/// Slices follow input order without sorting or padding. Negative values count
/// as zero, and if nothing is left every slice collapses onto `start_angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularPie {
    /// Angle of the first slice's leading edge, in radians.
    pub start_angle: f64,
    /// Angle of the last slice's trailing edge, in radians.
    pub end_angle: f64,
}

impl Default for CircularPie {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: TAU,
        }
    }
}

impl PieLayout for CircularPie {
    fn pie(&self, values: &[f64]) -> Vec<PieSlice> {
        let sum: f64 = values.iter().map(|v| v.max(0.0)).sum();
        let span = self.end_angle - self.start_angle;
        let mut cumulative = 0.0;
        values
            .iter()
            .map(|&raw| {
                let value = raw.max(0.0);
                let start_angle = self.angle_at(cumulative, sum, span);
                cumulative += value;
                PieSlice {
                    value,
                    start_angle,
                    end_angle: self.angle_at(cumulative, sum, span),
                }
            })
            .collect()
    }
}

impl CircularPie {
    fn angle_at(&self, cumulative: f64, sum: f64, span: f64) -> f64 {
        if sum > 0.0 {
            self.start_angle + span * (cumulative / sum)
        } else {
            self.start_angle
        }
    }
}
