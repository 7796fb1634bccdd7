// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build-time options and the longitude window constants.

/// Degrees of longitude spanned by one copy of the world.
pub const WORLD_WIDTH: f64 = 360.0;

/// Largest longitude difference a transmission may span, exclusive.
pub const MAX_LONGITUDE_SPAN: f64 = 180.0;

/// Every world-copy offset, west to east.
///
/// Transmission destinations always try all three, whatever [`WorldCopies`] says.
pub const WRAP_OFFSETS: [f64; 3] = [-WORLD_WIDTH, 0.0, WORLD_WIDTH];

/// How many horizontal copies of the world the map lays out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorldCopies {
    /// One copy at offset 0.
    Single,
    /// Three copies at offsets -360, 0 and +360.
    #[default]
    Triplicate,
}

impl WorldCopies {
    /// The longitude offsets of each copy, west to east.
    pub const fn offsets(self) -> &'static [f64] {
        match self {
            Self::Single => &[0.0],
            Self::Triplicate => &WRAP_OFFSETS,
        }
    }
}

/// How a deme shows its color distribution.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DemeStyle {
    /// One pie slice per color, sized by visible count.
    #[default]
    Pie,
    /// A single color blended from the location's color counts.
    Blended,
}

/// Options fixed for the lifetime of a built data set.
///
/// Changing either field requires a full rebuild.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapOptions {
    /// World copies to lay out.
    pub world_copies: WorldCopies,
    /// Deme rendering mode.
    pub deme_style: DemeStyle,
}

impl MapOptions {
    /// Create options from both settings.
    pub const fn new(world_copies: WorldCopies, deme_style: DemeStyle) -> Self {
        Self {
            world_copies,
            deme_style,
        }
    }
}

/// Whether a shifted longitude falls strictly inside the drawable window.
#[inline]
pub(crate) fn in_world_window(longitude: f64) -> bool {
    longitude > -WORLD_WIDTH && longitude < WORLD_WIDTH
}
