//! "Seen identity" sets
//!
//! Multi-line orders repeat the same `order_id`; every bucket that counts
//! orders keeps its own set, scoped to one aggregation call.

use std::collections::HashSet;
use std::hash::Hash;

/// Set of identities already counted by one bucket
#[derive(Debug)]
pub struct SeenSet<K> {
    seen: HashSet<K>,
}

impl<K: Eq + Hash> SeenSet<K> {
    pub fn new() -> Self {
        Self { seen: HashSet::new() }
    }

    /// Record `key`; `true` only the first time it is seen
    pub fn mark_seen_once(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl<K: Eq + Hash> Default for SeenSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
