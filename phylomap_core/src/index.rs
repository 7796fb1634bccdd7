// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key → positions maps used to patch built collections without rescanning them.

use alloc::string::String;
use core::borrow::Borrow;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::transmission::TransmissionId;

/// Positions sharing one key. One per world copy at most, so three fit inline.
pub type Positions = SmallVec<[usize; 3]>;

/// Maps a key to every position in a collection that carries it.
///
/// Positions are recorded in insertion order, which is collection order when
/// the index is built by a single forward pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionIndex<K: Eq + Hash> {
    slots: HashMap<K, Positions>,
}

impl<K: Eq + Hash> Default for PositionIndex<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> PositionIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` occupies `position`.
    pub fn push(&mut self, key: K, position: usize) {
        self.slots.entry(key).or_default().push(position);
    }

    /// Positions for `key`, or `None` if the key was never recorded.
    pub fn get<Q>(&self, key: &Q) -> Option<&[usize]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.get(key).map(|p| p.as_slice())
    }

    /// Whether `key` has any positions.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no keys are recorded.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of recorded positions over all keys.
    pub fn position_count(&self) -> usize {
        self.slots.values().map(|p| p.len()).sum()
    }

    /// Iterate keys and their positions in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[usize])> {
        self.slots.iter().map(|(k, p)| (k, p.as_slice()))
    }
}

impl<K: Eq + Hash> FromIterator<(K, usize)> for PositionIndex<K> {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (key, position) in iter {
            index.push(key, position);
        }
        index
    }
}

/// Location name → deme positions across world copies.
pub type DemeIndex = PositionIndex<String>;

/// Transmission id → transmission positions across world copies.
pub type TransmissionIndex = PositionIndex<TransmissionId>;
