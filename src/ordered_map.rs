//! OrderedMap: a key→value container with deterministic, positional
//! iteration order.
//!
//! Backed by a sorted vector rather than a hash map so that two maps built
//! from the same key set in any insertion order iterate pairs in the same
//! order — the collect/execute/expose protocol pairs an `inputs` dictionary
//! with an `in_ports` map *by position*, which only holds if both maps share
//! an ordering invariant. Ports are created only at graph-construction time,
//! so the O(n) insertion cost of a sorted vector is paid once, not per step.

use crate::error::{FlowstepError, Result};

/// A key→value associative container, sorted by key, that additionally
/// supports positional access via [`OrderedMap::index`] and
/// [`OrderedMap::key`].
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: Ord + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        OrderedMap {
            entries: Vec::new(),
        }
    }

    fn lower_bound(&self, key: &K) -> usize {
        self.entries.partition_point(|(k, _)| k < key)
    }

    /// Insert `key -> args()` if absent. Returns `(index, inserted)`; a no-op
    /// (returning `inserted = false`) when the key is already present,
    /// mirroring `sorted_map::try_emplace`.
    pub fn try_emplace(&mut self, key: K, make_value: impl FnOnce() -> V) -> (usize, bool) {
        let idx = self.lower_bound(&key);
        if idx < self.entries.len() && self.entries[idx].0 == key {
            return (idx, false);
        }
        self.entries.insert(idx, (key, make_value()));
        (idx, true)
    }

    /// Insert or overwrite `key -> value`.
    pub fn insert(&mut self, key: K, value: V) {
        let idx = self.lower_bound(&key);
        if idx < self.entries.len() && self.entries[idx].0 == key {
            self.entries[idx].1 = value;
        } else {
            self.entries.insert(idx, (key, value));
        }
    }

    /// Fails with [`FlowstepError::KeyNotFound`] if `key` is absent.
    pub fn at(&self, key: &K) -> Result<&V>
    where
        K: std::fmt::Display,
    {
        self.find(key)
            .ok_or_else(|| FlowstepError::KeyNotFound(key.to_string()))
    }

    /// Fails with [`FlowstepError::KeyNotFound`] if `key` is absent.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V>
    where
        K: std::fmt::Display,
    {
        let idx = self.lower_bound(key);
        if idx < self.entries.len() && &self.entries[idx].0 == key {
            Ok(&mut self.entries[idx].1)
        } else {
            Err(FlowstepError::KeyNotFound(key.to_string()))
        }
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        let idx = self.lower_bound(key);
        if idx < self.entries.len() && &self.entries[idx].0 == key {
            Some(&self.entries[idx].1)
        } else {
            None
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn erase(&mut self, key: &K) -> bool {
        let idx = self.lower_bound(key);
        if idx < self.entries.len() && &self.entries[idx].0 == key {
            self.entries.remove(idx);
            true
        } else {
            false
        }
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `i`-th key in sorted order.
    ///
    /// Fails with [`FlowstepError::IndexOutOfRange`] if `i >= size()`.
    pub fn key(&self, i: usize) -> Result<&K> {
        self.entries
            .get(i)
            .map(|(k, _)| k)
            .ok_or(FlowstepError::IndexOutOfRange {
                index: i,
                size: self.size(),
            })
    }

    /// The `i`-th value in key-sorted order.
    ///
    /// Fails with [`FlowstepError::IndexOutOfRange`] if `i >= size()`.
    pub fn index(&self, i: usize) -> Result<&V> {
        self.entries
            .get(i)
            .map(|(_, v)| v)
            .ok_or(FlowstepError::IndexOutOfRange {
                index: i,
                size: self.size(),
            })
    }

    /// Mutable positional access. Fails with
    /// [`FlowstepError::IndexOutOfRange`] if `i >= size()`.
    pub fn index_mut(&mut self, i: usize) -> Result<&mut V> {
        let size = self.entries.len();
        self.entries
            .get_mut(i)
            .map(|(_, v)| v)
            .ok_or(FlowstepError::IndexOutOfRange { index: i, size })
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<K: Ord + Clone, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
