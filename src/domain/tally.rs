//! Insertion-ordered counting
//!
//! Top-N and timeline outputs depend on first-seen order, so counts are kept
//! in an `IndexMap` and ranked with a stable sort.

use indexmap::IndexMap;
use std::hash::Hash;

/// Key → count map that remembers the order keys were first seen in
#[derive(Debug, Clone)]
pub struct OrderedTally<K: Eq + Hash> {
    counts: IndexMap<K, usize>,
}

impl<K: Eq + Hash> Default for OrderedTally<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> OrderedTally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in first-seen order
    pub fn in_order(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// The `n` most frequent keys, ties kept in first-seen order
    pub fn most_common(&self, n: usize) -> Vec<(K, usize)> {
        let mut entries: Vec<(K, usize)> = self
            .counts
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for OrderedTally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}
