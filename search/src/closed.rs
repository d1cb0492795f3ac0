//! State → canonical node index.
//!
//! Every generated state maps to exactly one arena node, open or closed.
//! Lookups classify a new path to a state before the engine touches any
//! frontier structure.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::node::{NodeArena, NodeId};

/// How a newly generated path relates to what is already known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// State never generated before.
    Novel,
    /// Known state; the new path is not strictly cheaper.
    NotImproved(NodeId),
    /// Known open state; the new path is strictly cheaper.
    ImprovesOpen(NodeId),
    /// Known closed state; the new path is strictly cheaper (reopen).
    ImprovesClosed(NodeId),
}

#[derive(Debug)]
pub struct ClosedIndex<S> {
    map: FxHashMap<S, NodeId>,
}

impl<S: Eq + Hash> ClosedIndex<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn get(&self, state: &S) -> Option<NodeId> {
        self.map.get(state).copied()
    }

    /// Record the canonical node of a state. Returns the previous mapping.
    pub fn insert(&mut self, state: S, id: NodeId) -> Option<NodeId> {
        self.map.insert(state, id)
    }

    /// Classify a path of cost `g` to `state`.
    #[must_use]
    pub fn classify(&self, state: &S, g: f64, arena: &NodeArena<S>) -> PathClass {
        let Some(id) = self.get(state) else {
            return PathClass::Novel;
        };
        let existing = &arena[id];
        if g >= existing.g() {
            PathClass::NotImproved(id)
        } else if existing.is_open() {
            PathClass::ImprovesOpen(id)
        } else {
            PathClass::ImprovesClosed(id)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<S: Eq + Hash> Default for ClosedIndex<S> {
    fn default() -> Self {
        Self::new()
    }
}
