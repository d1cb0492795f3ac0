//! Ordered frontier over open nodes, keyed by corrected cost `fHat`.
//!
//! Besides min lookup and removal by id, the frontier carries a threshold
//! cursor: a logical rank boundary between nodes with `fHat <= threshold`
//! (the qualifying prefix) and the rest. [`OrderedFrontier::move_cursor`]
//! reports only the nodes that crossed the boundary since the previous call,
//! in `O(log n + k)` for `k` crossing nodes.

use std::collections::BTreeSet;
use std::ops::Bound;

use rustc_hash::FxHashMap;

use crate::node::{FHatKey, NodeId};

/// Which way the cursor moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorDirection {
    /// Threshold grew; `crossed` nodes entered the qualifying prefix.
    Advanced,
    /// Threshold shrank; `crossed` nodes left the qualifying prefix.
    Retreated,
    /// Threshold unchanged; nothing crossed.
    Unchanged,
}

/// Result of a cursor move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorMove {
    pub direction: CursorDirection,
    /// Crossing nodes in ascending key order.
    pub crossed: Vec<NodeId>,
}

/// `BTreeSet` of frontier keys plus an id → key index.
///
/// The cursor is the pair `(threshold, qualifying)`: `qualifying` is the rank
/// of the boundary and is adjusted on every insert and remove, so it always
/// equals the number of keys with `fHat <= threshold`.
#[derive(Debug, Default)]
pub struct OrderedFrontier {
    set: BTreeSet<FHatKey>,
    keys: FxHashMap<NodeId, FHatKey>,
    threshold: Option<f64>,
    qualifying: usize,
    high_water: usize,
}

impl OrderedFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns `false` if the id is already present.
    pub fn insert(&mut self, key: FHatKey) -> bool {
        if self.keys.contains_key(&key.id) {
            return false;
        }
        self.keys.insert(key.id, key);
        self.set.insert(key);
        if self.qualifies(&key) {
            self.qualifying += 1;
        }
        self.high_water = self.high_water.max(self.set.len());
        true
    }

    /// Remove a node from any position. Returns its key if it was present.
    pub fn remove(&mut self, id: NodeId) -> Option<FHatKey> {
        let key = self.keys.remove(&id)?;
        self.set.remove(&key);
        if self.qualifies(&key) {
            self.qualifying -= 1;
        }
        Some(key)
    }

    /// Node with the smallest `fHat`.
    #[must_use]
    pub fn min(&self) -> Option<FHatKey> {
        self.set.first().copied()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.keys.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Largest size the frontier reached.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Rank of the cursor boundary: number of qualifying nodes.
    #[must_use]
    pub fn qualifying_len(&self) -> usize {
        self.qualifying
    }

    /// Qualifying nodes in ascending key order.
    pub fn qualifying(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.set.iter().take(self.qualifying).map(|k| k.id)
    }

    /// All nodes in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &FHatKey> {
        self.set.iter()
    }

    /// Move the boundary to `threshold` and report the nodes that crossed it.
    ///
    /// The first call reports every node with `fHat <= threshold` as
    /// entering.
    pub fn move_cursor(&mut self, threshold: f64) -> CursorMove {
        let upper_new = FHatKey::upper_bound(threshold);
        let previous = self.threshold.replace(threshold);

        let (direction, crossed): (CursorDirection, Vec<NodeId>) = match previous {
            None => (
                CursorDirection::Advanced,
                self.set.range(..=upper_new).map(|k| k.id).collect(),
            ),
            Some(old) => {
                let upper_old = FHatKey::upper_bound(old);
                match upper_new.cmp(&upper_old) {
                    std::cmp::Ordering::Greater => (
                        CursorDirection::Advanced,
                        self.set
                            .range((Bound::Excluded(upper_old), Bound::Included(upper_new)))
                            .map(|k| k.id)
                            .collect(),
                    ),
                    std::cmp::Ordering::Less => (
                        CursorDirection::Retreated,
                        self.set
                            .range((Bound::Excluded(upper_new), Bound::Included(upper_old)))
                            .map(|k| k.id)
                            .collect(),
                    ),
                    std::cmp::Ordering::Equal => (CursorDirection::Unchanged, Vec::new()),
                }
            }
        };

        match direction {
            CursorDirection::Advanced => self.qualifying += crossed.len(),
            CursorDirection::Retreated => self.qualifying -= crossed.len(),
            CursorDirection::Unchanged => {}
        }
        tracing::trace!(
            threshold,
            ?direction,
            crossed = crossed.len(),
            qualifying = self.qualifying,
            "frontier cursor moved"
        );
        CursorMove { direction, crossed }
    }

    fn qualifies(&self, key: &FHatKey) -> bool {
        self.threshold
            .is_some_and(|t| *key <= FHatKey::upper_bound(t))
    }
}
