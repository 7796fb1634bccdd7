// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-location color counts over the tips of a tree.

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::types::{Color, GeoNode, TreeState};

/// Tip counts for one `(location, color)` pair.
///
/// `n_visible <= n_total` always holds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorCount {
    /// Tips of this color at this location that are currently visible.
    pub n_visible: u32,
    /// All tips of this color at this location.
    pub n_total: u32,
}

impl ColorCount {
    /// Whether the visible count does not exceed the total.
    pub const fn is_consistent(&self) -> bool {
        self.n_visible <= self.n_total
    }
}

/// Counts per color at one location, in color order.
pub type ColorCounts = BTreeMap<Color, ColorCount>;

/// Counts per location, in location order.
pub type LocationCounts = BTreeMap<String, ColorCounts>;

/// Sum of visible tips over every color at a location.
pub fn visible_total(counts: &ColorCounts) -> u32 {
    counts.values().map(|c| c.n_visible).sum()
}

/// Sum of all tips over every color at a location.
pub fn total(counts: &ColorCounts) -> u32 {
    counts.values().map(|c| c.n_total).sum()
}

/// Count visible and total tips per location and color.
///
/// Only tips contribute, and tips without a trait value at `resolution` are
/// skipped. The result does not depend on node order.
pub fn aggregate_colors<N: GeoNode>(tree: TreeState<'_, N>, resolution: &str) -> LocationCounts {
    let mut out = LocationCounts::new();
    for node in tree.nodes.iter().filter(|n| n.is_tip()) {
        let Some(location) = node.location(resolution) else {
            continue;
        };
        let count = out
            .entry(location.to_owned())
            .or_default()
            .entry(tree.color_of(node))
            .or_default();
        count.n_total += 1;
        if tree.visibility_of(node).is_visible() {
            count.n_visible += 1;
        }
    }
    out
}
