//! Min-priority frontier with remove-then-reinsert key updates.
//!
//! Entries are ordered by `(distance, sequence)`. The sequence number grows
//! with every insertion, so among equal distances the leaf inserted first is
//! extracted first.

use std::collections::{BTreeSet, HashMap};

use crate::types::NodeId;

/// Search frontier ordered by tentative distance.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    queue: BTreeSet<(usize, u64, NodeId)>,
    keys: HashMap<NodeId, (usize, u64)>,
    next_sequence: u64,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a leaf, replacing any entry it already has.
    pub(crate) fn push(&mut self, leaf: NodeId, distance: usize) {
        self.remove(leaf);
        let key = (distance, self.next_sequence);
        self.next_sequence += 1;
        self.queue.insert((key.0, key.1, leaf));
        self.keys.insert(leaf, key);
    }

    /// Remove a leaf's entry if present.
    pub(crate) fn remove(&mut self, leaf: NodeId) -> bool {
        match self.keys.remove(&leaf) {
            Some((distance, sequence)) => self.queue.remove(&(distance, sequence, leaf)),
            None => false,
        }
    }

    /// Extract the leaf with the smallest distance.
    pub(crate) fn pop(&mut self) -> Option<(NodeId, usize)> {
        let (distance, _, leaf) = self.queue.pop_first()?;
        self.keys.remove(&leaf);
        Some((leaf, distance))
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
