// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-side inputs: nodes, visibility, colors, and geographic coordinates.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Visibility state of a node, as stored in a visibility vector indexed by `array_idx`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Filtered out of both the tree and the map.
    #[default]
    NotVisible,
    /// Hidden in the tree view but still counted on the map.
    MapOnly,
    /// Shown everywhere.
    Visible,
}

impl Visibility {
    /// Whether a tip in this state contributes to visible counts.
    #[inline]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::NotVisible)
    }
}

/// An 8-bit sRGB color with alpha.
///
/// Colors are ordered so they can key the per-location color maps; the order
/// is the lexicographic order of `(r, g, b, a)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A raw geographic position in degrees.
///
/// Longitudes may lie outside `[-180, 180]` once a world-copy offset is applied.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LatLong {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LatLong {
    /// Create a position from latitude and longitude.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The same position moved by `offset` degrees of longitude.
    #[inline]
    pub fn shifted(self, offset: f64) -> Self {
        Self {
            latitude: self.latitude,
            longitude: self.longitude + offset,
        }
    }
}

/// Coordinates for every location, per geographic resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoTable {
    resolutions: BTreeMap<String, BTreeMap<String, LatLong>>,
}

impl GeoTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the coordinates of `location` at `resolution`.
    ///
    /// Returns the previous coordinates, if any.
    pub fn insert(
        &mut self,
        resolution: impl Into<String>,
        location: impl Into<String>,
        lat_long: LatLong,
    ) -> Option<LatLong> {
        self.resolutions
            .entry(resolution.into())
            .or_default()
            .insert(location.into(), lat_long)
    }

    /// Coordinates of `location` at `resolution`.
    pub fn get(&self, resolution: &str, location: &str) -> Option<LatLong> {
        self.resolutions.get(resolution)?.get(location).copied()
    }

    /// Whether any coordinates are known for `resolution`.
    pub fn has_resolution(&self, resolution: &str) -> bool {
        self.resolutions.contains_key(resolution)
    }

    /// Iterate the known locations of a resolution in name order.
    pub fn locations<'a>(&'a self, resolution: &str) -> impl Iterator<Item = (&'a str, LatLong)> {
        self.resolutions
            .get(resolution)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

/// Read-only view of a phylogeny node.
///
/// Nodes live in a dense array; `array_idx` is the node's position in that
/// array and `children` refers to other nodes by their `array_idx`.
pub trait GeoNode {
    /// Position of this node in the dense node array.
    fn array_idx(&self) -> usize;

    /// Value of the geographic trait at `resolution`, if defined.
    fn location(&self, resolution: &str) -> Option<&str>;

    /// Numeric date of the node (decimal years).
    fn num_date(&self) -> f64;

    /// `array_idx` of each child; empty for tips.
    fn children(&self) -> &[usize];

    /// Whether this node is a tip.
    fn is_tip(&self) -> bool {
        self.children().is_empty()
    }
}

/// A simple owned node for callers that do not have their own tree store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeNode {
    /// Position in the node array.
    pub array_idx: usize,
    /// Numeric date.
    pub num_date: f64,
    /// Trait values keyed by resolution.
    pub traits: BTreeMap<String, String>,
    /// Children by `array_idx`.
    pub children: Vec<usize>,
}

impl TreeNode {
    /// A tip with no traits.
    pub fn new(array_idx: usize, num_date: f64) -> Self {
        Self {
            array_idx,
            num_date,
            ..Self::default()
        }
    }

    /// Set the trait value for `resolution`.
    #[must_use]
    pub fn with_trait(mut self, resolution: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits.insert(resolution.into(), value.into());
        self
    }

    /// Replace the children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = usize>) -> Self {
        self.children = children.into_iter().collect();
        self
    }
}

impl GeoNode for TreeNode {
    fn array_idx(&self) -> usize {
        self.array_idx
    }

    fn location(&self, resolution: &str) -> Option<&str> {
        self.traits.get(resolution).map(String::as_str)
    }

    fn num_date(&self) -> f64 {
        self.num_date
    }

    fn children(&self) -> &[usize] {
        &self.children
    }
}

/// A consistent snapshot of the tree inputs: nodes plus per-node visibility and color.
///
/// `visibility` and `colors` are indexed by `array_idx`. Missing entries read as
/// [`Visibility::NotVisible`] and [`Color::default`].
#[derive(Debug)]
pub struct TreeState<'a, N> {
    /// Dense node array.
    pub nodes: &'a [N],
    /// Visibility per node.
    pub visibility: &'a [Visibility],
    /// Color per node.
    pub colors: &'a [Color],
}

impl<N> Clone for TreeState<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for TreeState<'_, N> {}

impl<'a, N: GeoNode> TreeState<'a, N> {
    /// Bundle a node array with its visibility and color vectors.
    pub const fn new(nodes: &'a [N], visibility: &'a [Visibility], colors: &'a [Color]) -> Self {
        Self {
            nodes,
            visibility,
            colors,
        }
    }

    /// Node at `array_idx`.
    pub fn node(&self, array_idx: usize) -> Option<&'a N> {
        self.nodes.get(array_idx)
    }

    /// Visibility of `node`.
    pub fn visibility_of(&self, node: &N) -> Visibility {
        self.visibility
            .get(node.array_idx())
            .copied()
            .unwrap_or_default()
    }

    /// Color of `node`.
    pub fn color_of(&self, node: &N) -> Color {
        self.colors.get(node.array_idx()).copied().unwrap_or_default()
    }

    /// Every `(parent, child)` edge, in node order then child order.
    ///
    /// Children whose index is out of range are skipped.
    pub fn edges(self) -> impl Iterator<Item = (&'a N, &'a N)> {
        let nodes = self.nodes;
        nodes.iter().flat_map(move |parent| {
            parent
                .children()
                .iter()
                .filter_map(move |&c| nodes.get(c).map(|child| (parent, child)))
        })
    }
}
