//! Unique-key set facade over [`FixedHashTable`].
//!
//! Wraps each key in a private self-keyed entry so arbitrary `Hash + Eq`
//! key types work without implementing [`KeyOf`](crate::traits::KeyOf).

use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

use crate::ds::FixedHashTable;
use crate::error::{InsertError, InvariantError};
use crate::traits::KeyOf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
struct SetEntry<K>(K);

impl<K: Hash + Eq> KeyOf for SetEntry<K> {
    type Key = K;

    #[inline]
    fn key(&self) -> &K {
        &self.0
    }
}

/// Fixed-capacity set with unique keys.
///
/// # Example
///
/// ```
/// use shmkit::set::ShmSet;
///
/// let mut set: ShmSet<u64, 8> = ShmSet::new();
/// assert_eq!(set.insert(7), Ok(true));
/// assert_eq!(set.insert(7), Ok(false));
/// assert!(set.contains(&7));
/// assert!(set.remove(&7));
/// ```
pub struct ShmSet<K, const N: usize, S = FxBuildHasher> {
    table: FixedHashTable<SetEntry<K>, N, S>,
}

impl<K: Hash + Eq, const N: usize, S: BuildHasher + Default> ShmSet<K, N, S> {
    /// Creates an owned, fully initialized set.
    pub fn new() -> Self {
        Self {
            table: FixedHashTable::new(),
        }
    }

    /// Returns the number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set holds no keys.
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

    /// Inserts `key`. `Ok(true)` if it was absent, `Ok(false)` if already
    /// present, `Err(key)` when the set is full.
    pub fn insert(&mut self, key: K) -> Result<bool, K> {
        match self.table.insert_unique(SetEntry(key)) {
            Ok(_) => Ok(true),
            Err(InsertError::Duplicate { .. }) => Ok(false),
            Err(InsertError::Full(entry)) | Err(InsertError::Uninitialized(entry)) => Err(entry.0),
        }
    }

    /// Returns `true` if `key` is present. Never promotes.
    pub fn contains(&self, key: &K) -> bool {
        self.table.peek(key).is_some()
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.table.peek(key) {
            Some(idx) => self.table.erase_at(idx).is_some(),
            None => false,
        }
    }

    /// Recycles every key; the LRU toggle carries over.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Makes membership reads through [`touch`](ShmSet::touch) promote keys.
    pub fn enable_lru(&mut self) {
        self.table.enable_lru();
    }

    /// Stops reads from reordering keys.
    pub fn disable_lru(&mut self) {
        self.table.disable_lru();
    }

    /// Returns `true` if LRU access-order mode is on.
    #[inline]
    pub fn is_lru_enabled(&self) -> bool {
        self.table.is_lru_enabled()
    }

    /// Membership test that counts as a use in LRU mode.
    pub fn touch(&mut self, key: &K) -> bool {
        self.table.find(key).is_some()
    }

    /// Iterates keys in hash order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.table.iter().map(|(_, entry)| &entry.0)
    }

    /// Iterates keys in insertion (or LRU) order, oldest first.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &K> {
        self.table.iter_list().map(|(_, entry)| &entry.0)
    }

    /// Runs the underlying structural validator.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.table.validate()
    }
}

impl<K: Hash + Eq, const N: usize, S: BuildHasher + Default> Default for ShmSet<K, N, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_contains_remove() {
        let mut set: ShmSet<u64, 8> = ShmSet::new();
        assert_eq!(set.insert(1), Ok(true));
        assert_eq!(set.insert(1), Ok(false));
        assert!(set.contains(&1));
        assert!(set.remove(&1));
        assert!(!set.remove(&1));
        assert!(set.is_empty());
    }

    #[test]
    fn full_set_hands_the_key_back() {
        let mut set: ShmSet<u64, 2> = ShmSet::new();
        set.insert(1).unwrap();
        set.insert(2).unwrap();
        assert_eq!(set.insert(3), Err(3));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ordered_iteration_and_touch() {
        let mut set: ShmSet<u64, 8> = ShmSet::new();
        for k in [10u64, 20, 30] {
            set.insert(k).unwrap();
        }
        set.enable_lru();
        assert!(set.touch(&10));
        let order: Vec<u64> = set.iter_ordered().copied().collect();
        assert_eq!(order, vec![20, 30, 10]);
        set.validate().unwrap();
    }
}
