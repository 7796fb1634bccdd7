// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Non-fatal problems found while building or updating map data.

use alloc::borrow::ToOwned;
use alloc::collections::BTreeSet;
use alloc::string::String;

use tracing::warn;

use crate::transmission::TransmissionId;

/// Batched summary of everything that was skipped.
///
/// Nothing recorded here stops a build or update; the affected entries are
/// simply left out (missing geography) or left unpatched (stale index).
/// Each problem is also logged once when first recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Locations with no coordinates at the active resolution.
    pub missing_locations: BTreeSet<String>,
    /// Locations an update expected in the deme index but did not find.
    pub stale_locations: BTreeSet<String>,
    /// Transmission ids an update expected in the transmission index but did not find.
    pub stale_transmissions: BTreeSet<TransmissionId>,
}

impl Diagnostics {
    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.missing_locations.is_empty()
            && self.stale_locations.is_empty()
            && self.stale_transmissions.is_empty()
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: Self) {
        self.missing_locations.extend(other.missing_locations);
        self.stale_locations.extend(other.stale_locations);
        self.stale_transmissions.extend(other.stale_transmissions);
    }

    pub(crate) fn record_missing_location(&mut self, location: &str, resolution: &str) {
        if !self.missing_locations.contains(location) {
            warn!(location, resolution, "no coordinates; skipping");
            self.missing_locations.insert(location.to_owned());
        }
    }

    pub(crate) fn record_stale_location(&mut self, location: &str) {
        if !self.stale_locations.contains(location) {
            warn!(location, "not in deme index; left unpatched");
            self.stale_locations.insert(location.to_owned());
        }
    }

    pub(crate) fn record_stale_transmission(&mut self, id: TransmissionId) {
        if self.stale_transmissions.insert(id) {
            warn!(%id, "not in transmission index; left unpatched");
        }
    }
}
