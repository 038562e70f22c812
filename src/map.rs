//! Unique-key map facade over [`FixedHashTable`].
//!
//! Stores [`Pair<K, V>`] entries keyed by `K`. A thin adapter: all chain,
//! order-list, and lifecycle mechanics live in the table; this layer only
//! translates the slot-level API into a conventional map surface.
//!
//! # Example
//!
//! ```
//! use shmkit::map::ShmMap;
//!
//! let mut map: ShmMap<u64, &str, 8> = ShmMap::new();
//! map.insert(1, "one").unwrap();
//! map.insert(2, "two").unwrap();
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(map.insert(1, "ONE").unwrap(), Some("one"));
//! assert_eq!(map.remove(&2), Some("two"));
//! ```

use std::hash::{BuildHasher, Hash};
use std::mem;

use rustc_hash::FxBuildHasher;

use crate::ds::FixedHashTable;
use crate::error::{InsertError, InvariantError};
use crate::traits::Pair;

/// Fixed-capacity map with unique keys.
///
/// Reads through [`get`](ShmMap::get) honor LRU mode; updating an existing
/// key through [`insert`](ShmMap::insert) replaces the value in place and
/// leaves the entry's order-list position unchanged (only reads promote).
pub struct ShmMap<K, V, const N: usize, S = FxBuildHasher> {
    table: FixedHashTable<Pair<K, V>, N, S>,
}

impl<K: Hash + Eq, V, const N: usize, S: BuildHasher + Default> ShmMap<K, V, N, S> {
    /// Creates an owned, fully initialized map.
    pub fn new() -> Self {
        Self {
            table: FixedHashTable::new(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `true` if every slot is in use.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.table.is_full()
    }

    /// Inserts or replaces. Returns the previous value for an existing key,
    /// `None` for a fresh insert, or `Err((key, value))` when the map is
    /// full (nothing is lost and nothing changed).
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, (K, V)> {
        match self.table.insert_unique(Pair::new(key, value)) {
            Ok(_) => Ok(None),
            Err(InsertError::Duplicate { existing, rejected }) => {
                match self.table.get_mut(existing) {
                    Some(pair) => Ok(Some(mem::replace(&mut pair.value, rejected.value))),
                    // the slot went away between scan and access; surface as full
                    None => Err((rejected.key, rejected.value)),
                }
            }
            Err(InsertError::Full(pair)) | Err(InsertError::Uninitialized(pair)) => {
                Err((pair.key, pair.value))
            }
        }
    }

    /// Returns the value for `key`, promoting the entry in LRU mode.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = self.table.find(key)?;
        self.table.get(idx).map(|pair| &pair.value)
    }

    /// Returns the value for `key` without ever touching the order list.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = self.table.peek(key)?;
        self.table.get(idx).map(|pair| &pair.value)
    }

    /// Mutable access to the value for `key`, promoting in LRU mode.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.table.find(key)?;
        self.table.get_mut(idx).map(|pair| &mut pair.value)
    }

    /// Returns `true` if `key` is present. Never promotes.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.peek(key).is_some()
    }

    /// Removes `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.table.peek(key)?;
        self.table.erase_at(idx).map(|pair| pair.value)
    }

    /// Recycles every entry; the LRU toggle carries over.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Makes reads promote accessed entries to most-recently-used.
    pub fn enable_lru(&mut self) {
        self.table.enable_lru();
    }

    /// Stops reads from reordering entries.
    pub fn disable_lru(&mut self) {
        self.table.disable_lru();
    }

    /// Returns `true` if LRU access-order mode is on.
    #[inline]
    pub fn is_lru_enabled(&self) -> bool {
        self.table.is_lru_enabled()
    }

    /// The least recently inserted (or used, in LRU mode) entry, the
    /// eviction candidate. Never promotes.
    pub fn least_recent(&self) -> Option<(&K, &V)> {
        let idx = self.table.list_front()?;
        self.table.get(idx).map(|pair| (&pair.key, &pair.value))
    }

    /// Iterates entries in hash order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table.iter().map(|(_, pair)| (&pair.key, &pair.value))
    }

    /// Iterates entries in insertion (or LRU) order, oldest first.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table
            .iter_list()
            .map(|(_, pair)| (&pair.key, &pair.value))
    }

    /// Runs the underlying structural validator.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.table.validate()
    }
}

impl<K: Hash + Eq, V, const N: usize, S: BuildHasher + Default> Default for ShmMap<K, V, N, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_round_trip() {
        let mut map: ShmMap<u64, &str, 8> = ShmMap::new();
        assert_eq!(map.insert(1, "one").unwrap(), None);
        assert_eq!(map.insert(2, "two").unwrap(), None);
        assert_eq!(map.get(&1), Some(&"one"));
        assert_eq!(map.remove(&2), Some("two"));
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.len(), 1);
        map.validate().unwrap();
    }

    #[test]
    fn insert_replaces_and_returns_old_value() {
        let mut map: ShmMap<u64, &str, 8> = ShmMap::new();
        map.insert(1, "one").unwrap();
        assert_eq!(map.insert(1, "ONE").unwrap(), Some("one"));
        assert_eq!(map.get(&1), Some(&"ONE"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn full_map_hands_the_pair_back() {
        let mut map: ShmMap<u64, u64, 2> = ShmMap::new();
        map.insert(1, 10).unwrap();
        map.insert(2, 20).unwrap();
        assert_eq!(map.insert(3, 30), Err((3, 30)));
        assert_eq!(map.len(), 2);
        // replacing an existing key still works at capacity
        assert_eq!(map.insert(1, 11).unwrap(), Some(10));
    }

    #[test]
    fn lru_get_reorders_replace_does_not() {
        let mut map: ShmMap<u64, &str, 8> = ShmMap::new();
        map.insert(1, "a").unwrap();
        map.insert(2, "b").unwrap();
        map.insert(3, "c").unwrap();
        map.enable_lru();

        map.get(&1);
        let order: Vec<u64> = map.iter_ordered().map(|(k, _)| *k).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(map.least_recent(), Some((&2, &"b")));

        map.insert(2, "B").unwrap();
        let order: Vec<u64> = map.iter_ordered().map(|(k, _)| *k).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn peek_and_contains_never_promote() {
        let mut map: ShmMap<u64, &str, 8> = ShmMap::new();
        map.insert(1, "a").unwrap();
        map.insert(2, "b").unwrap();
        map.enable_lru();
        assert_eq!(map.peek(&1), Some(&"a"));
        assert!(map.contains_key(&1));
        let order: Vec<u64> = map.iter_ordered().map(|(k, _)| *k).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn clear_keeps_lru_mode() {
        let mut map: ShmMap<u64, &str, 4> = ShmMap::new();
        map.insert(1, "a").unwrap();
        map.enable_lru();
        map.clear();
        assert!(map.is_empty());
        assert!(map.is_lru_enabled());
    }
}
