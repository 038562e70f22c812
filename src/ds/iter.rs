//! Traversal views over a [`FixedHashTable`].
//!
//! Two independent orders over the same arena: hash order (chain by chain,
//! ascending bucket index) and order-list order (insertion or LRU order).
//! All iterators are read-only and never trigger LRU reordering; each one
//! caps the number of yielded entries at the capacity so a damaged link
//! cycle degrades into early termination instead of an infinite loop.

use std::hash::BuildHasher;

use crate::ds::fixed_table::FixedHashTable;
use crate::ds::slot::SlotIndex;
use crate::traits::KeyOf;

/// Hash-order iterator: within a chain follows `hash_next`, at chain end
/// scans forward for the next non-empty bucket.
pub struct HashIter<'a, T, const N: usize, S> {
    table: &'a FixedHashTable<T, N, S>,
    bucket: usize,
    cur: SlotIndex,
    yielded: usize,
}

impl<'a, T: KeyOf, const N: usize, S: BuildHasher + Default> HashIter<'a, T, N, S> {
    pub(crate) fn new(table: &'a FixedHashTable<T, N, S>) -> Self {
        let mut bucket = 0usize;
        let mut cur = SlotIndex::INVALID;
        while bucket < N {
            let head = table.bucket_head[bucket];
            if head.is_valid() {
                cur = head;
                break;
            }
            bucket += 1;
        }
        Self {
            table,
            bucket,
            cur,
            yielded: 0,
        }
    }
}

impl<'a, T: KeyOf, const N: usize, S: BuildHasher + Default> Iterator for HashIter<'a, T, N, S> {
    type Item = (SlotIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cur.is_valid() || self.yielded >= N {
            return None;
        }
        let idx = self.cur;
        let slot = self.table.valid_slot(idx)?;
        // SAFETY: valid_slot confirmed the payload is live.
        let value = unsafe { slot.value_ref() };
        self.yielded += 1;

        let mut next = slot.hash_next;
        while !next.is_valid() {
            self.bucket += 1;
            if self.bucket >= N {
                break;
            }
            next = self.table.bucket_head[self.bucket];
        }
        self.cur = next;
        Some((idx, value))
    }
}

/// Order-list iterator: head (least recently inserted/used) to tail.
pub struct ListIter<'a, T, const N: usize, S> {
    table: &'a FixedHashTable<T, N, S>,
    cur: SlotIndex,
    yielded: usize,
}

impl<'a, T: KeyOf, const N: usize, S: BuildHasher + Default> ListIter<'a, T, N, S> {
    pub(crate) fn new(table: &'a FixedHashTable<T, N, S>) -> Self {
        Self {
            table,
            cur: table.list_head,
            yielded: 0,
        }
    }
}

impl<'a, T: KeyOf, const N: usize, S: BuildHasher + Default> Iterator for ListIter<'a, T, N, S> {
    type Item = (SlotIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cur.is_valid() || self.yielded >= N {
            return None;
        }
        let idx = self.cur;
        let slot = self.table.valid_slot(idx)?;
        // SAFETY: valid_slot confirmed the payload is live.
        let value = unsafe { slot.value_ref() };
        self.yielded += 1;
        self.cur = slot.list_next;
        Some((idx, value))
    }
}

/// Iterator over the contiguous equal-key run located by
/// [`FixedHashTable::equal_range`]. `last` marks the final run member; the
/// iterator stops after yielding it.
pub struct EqualRange<'a, T, const N: usize, S> {
    table: &'a FixedHashTable<T, N, S>,
    cur: SlotIndex,
    last: SlotIndex,
    yielded: usize,
}

impl<'a, T, const N: usize, S> EqualRange<'a, T, N, S> {
    pub(crate) fn new(table: &'a FixedHashTable<T, N, S>, first: SlotIndex, last: SlotIndex) -> Self {
        Self {
            table,
            cur: first,
            last,
            yielded: 0,
        }
    }

    pub(crate) fn empty(table: &'a FixedHashTable<T, N, S>) -> Self {
        Self {
            table,
            cur: SlotIndex::INVALID,
            last: SlotIndex::INVALID,
            yielded: 0,
        }
    }
}

impl<'a, T: KeyOf, const N: usize, S: BuildHasher + Default> Iterator for EqualRange<'a, T, N, S> {
    type Item = (SlotIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cur.is_valid() || self.yielded >= N {
            return None;
        }
        let idx = self.cur;
        let slot = self.table.valid_slot(idx)?;
        // SAFETY: valid_slot confirmed the payload is live.
        let value = unsafe { slot.value_ref() };
        self.yielded += 1;
        self.cur = if idx == self.last {
            SlotIndex::INVALID
        } else {
            slot.hash_next
        };
        Some((idx, value))
    }
}
