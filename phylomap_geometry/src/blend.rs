// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Count-weighted color averaging for blended demes.

use phylomap_core::{Color, ColorBlend, ColorCount, ColorCounts};

/// Averages colors channel by channel, weighted by tip counts.
///
/// Visible counts are the weights. When no tip at the location is visible the
/// total counts are used instead, so hidden demes keep a representative color.
/// An empty map yields `fallback`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedRgbBlend {
    /// Color for locations without any tips.
    pub fallback: Color,
}

impl Default for WeightedRgbBlend {
    fn default() -> Self {
        Self {
            fallback: Color::rgb(128, 128, 128),
        }
    }
}

impl WeightedRgbBlend {
    fn average(counts: &ColorCounts, weight: impl Fn(&ColorCount) -> u32) -> Option<Color> {
        let mut total = 0_u64;
        let mut sums = [0_u64; 4];
        for (color, count) in counts {
            let w = u64::from(weight(count));
            total += w;
            for (sum, channel) in sums.iter_mut().zip([color.r, color.g, color.b, color.a]) {
                *sum += u64::from(channel) * w;
            }
        }
        if total == 0 {
            return None;
        }
        // Rounded integer mean; never exceeds the largest input channel.
        let [r, g, b, a] = sums.map(|s| u8::try_from((s + total / 2) / total).unwrap_or(u8::MAX));
        Some(Color::rgba(r, g, b, a))
    }
}

impl ColorBlend for WeightedRgbBlend {
    fn blend(&self, counts: &ColorCounts) -> Color {
        Self::average(counts, |c| c.n_visible)
            .or_else(|| Self::average(counts, |c| c.n_total))
            .unwrap_or(self.fallback)
    }
}
