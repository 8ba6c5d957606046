//! Insertion-ordered lookup table
//!
//! Capture and lift tables are iterated by codegen to declare fields and
//! constants, so their order must follow first use, not hash order.

use rustc_hash::FxHashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    index: FxHashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        OrderedMap {
            index: FxHashMap::default(),
            entries: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Return the existing value for `key`, or insert the one built by
    /// `make`. The flag is true when an insertion happened.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> (&V, bool) {
        if let Some(&i) = self.index.get(&key) {
            return (&self.entries[i].1, false);
        }
        let i = self.entries.len();
        self.index.insert(key.clone(), i);
        self.entries.push((key, make()));
        (&self.entries[i].1, true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
