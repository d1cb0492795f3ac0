//! Identity-addressable binary min-heaps.
//!
//! The focal queue ([`SecondaryQueue`], by `dHat`) and the cleanup queue
//! ([`AdmissibleQueue`], by `f`) both need removal from arbitrary positions
//! and in-place re-keying, which `std::collections::BinaryHeap` cannot do.

use rustc_hash::FxHashMap;

use crate::node::{DHatKey, FKey, NodeId};

/// A heap key that names the node it orders.
pub trait QueueKey: Ord + Copy {
    fn node_id(&self) -> NodeId;
}

impl QueueKey for FKey {
    fn node_id(&self) -> NodeId {
        self.id
    }
}

impl QueueKey for DHatKey {
    fn node_id(&self) -> NodeId {
        self.id
    }
}

/// Open nodes that pass the envelope and probability test, by `dHat`.
pub type SecondaryQueue = IndexedQueue<DHatKey>;

/// Every open node, by admissible `f`.
pub type AdmissibleQueue = IndexedQueue<FKey>;

/// Binary min-heap with a node id → slot index.
#[derive(Debug)]
pub struct IndexedQueue<K> {
    heap: Vec<K>,
    slots: FxHashMap<NodeId, usize>,
}

impl<K: QueueKey> IndexedQueue<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    /// Push a key. Returns `false` if its node is already queued.
    pub fn push(&mut self, key: K) -> bool {
        let id = key.node_id();
        if self.slots.contains_key(&id) {
            return false;
        }
        let slot = self.heap.len();
        self.heap.push(key);
        self.slots.insert(id, slot);
        self.sift_up(slot);
        true
    }

    #[must_use]
    pub fn top(&self) -> Option<&K> {
        self.heap.first()
    }

    pub fn pop(&mut self) -> Option<K> {
        let id = self.heap.first()?.node_id();
        self.remove(id)
    }

    /// Remove a node from any position.
    pub fn remove(&mut self, id: NodeId) -> Option<K> {
        let slot = self.slots.remove(&id)?;
        let last = self.heap.len() - 1;
        if slot != last {
            self.heap.swap(slot, last);
            self.slots.insert(self.heap[slot].node_id(), slot);
        }
        let removed = self.heap.pop();
        if slot < self.heap.len() {
            self.sift_down(slot);
            self.sift_up(slot);
        }
        removed
    }

    /// Replace the key of an already queued node and restore heap order.
    ///
    /// Returns `false` if the node is not queued.
    pub fn update(&mut self, key: K) -> bool {
        let Some(&slot) = self.slots.get(&key.node_id()) else {
            return false;
        };
        self.heap[slot] = key;
        self.sift_down(slot);
        self.sift_up(slot);
        true
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Keys in heap (not sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.heap.iter()
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot] >= self.heap[parent] {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.heap[left] < self.heap[smallest] {
                smallest = left;
            }
            if right < len && self.heap[right] < self.heap[smallest] {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].node_id(), a);
        self.slots.insert(self.heap[b].node_id(), b);
    }
}

impl<K: QueueKey> Default for IndexedQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
