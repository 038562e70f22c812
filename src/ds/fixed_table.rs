//! Fixed-capacity hash table with an embedded insertion/LRU order list.
//!
//! One slot arena simultaneously backs hash-based lookup (separate chaining
//! via `hash_next`) and a doubly-linked order list (`list_prev`/`list_next`)
//! recording insertion order. All linkage is by [`SlotIndex`], never by
//! pointer, so the byte image of a table is valid at any mapping address and
//! survives process restarts.
//!
//! ## Architecture
//!
//! ```text
//!   bucket_head: [SlotIndex; N]        slots: [Slot<T>; N]
//!   ┌───────────┐                      ┌─────────────────────────────────┐
//!   │ bucket 0  │──► slot 4 ──► slot 1 │ value, valid, self_index,       │
//!   │ bucket 1  │──► INVALID           │ hash_next, list_prev, list_next │
//!   │  ...      │                      └─────────────────────────────────┘
//!   └───────────┘
//!
//!   free_head ──► slot 7 ──► slot 2 ──► INVALID      (threaded via hash_next)
//!   list_head ──► slot 1 ◄──► slot 4 ◄── list_tail   (insertion / LRU order)
//! ```
//!
//! ## Operations
//! - `insert_unique` / `insert_equal`: O(chain), splice chain + append tail
//! - `find` / `count` / `equal_range`: O(chain); promote to tail in LRU mode
//! - `erase` / `erase_at`: O(chain), unlink both structures, recycle slot
//! - `iter` (hash order) / `iter_list` (insertion or LRU order): O(n)
//!
//! ## Lifecycle
//!
//! Two mutually exclusive initialization paths: [`FixedHashTable::new`] (or
//! the create branch of [`FixedHashTable::init_in_place`]) zeroes all state
//! and builds the sequential free list; the resume branch leaves every index
//! and flag untouched so a process can reattach to a segment that already
//! holds live data from a prior run.
//!
//! Structural damage (out-of-range index, self-index mismatch, double
//! recycle, chain cycle) is detected at the point of use, logged with full
//! context, and converted into a safe sentinel return. The table never
//! panics on a fallible path and is never "repaired" silently.

use std::fmt;
use std::hash::BuildHasher;
use std::mem;

use rustc_hash::FxBuildHasher;

use crate::ds::iter::{EqualRange, HashIter, ListIter};
use crate::ds::slot::{Slot, SlotIndex};
use crate::error::{InitError, InsertError};
use crate::traits::KeyOf;

/// Marker written to `init_state` once create/resume has completed.
pub(crate) const READY: u32 = 0x5348_4D4B; // "SHMK"

/// Fixed-capacity hash table storing `N` values of type `T`.
///
/// The bucket count equals the capacity and never changes; there is no
/// rehashing, so the caller sizes `N` for the expected load. Entries with
/// equal keys are kept contiguous within their bucket chain, which is what
/// makes [`equal_range`](FixedHashTable::equal_range) a single forward scan.
///
/// The hasher `S` must be deterministic and seed-free ([`FxBuildHasher`] by
/// default): processes attached to the same segment must agree on bucket
/// placement. It must also be zero-sized, since it lives inside the shared
/// image.
///
/// # Example
///
/// ```
/// use shmkit::ds::FixedHashTable;
///
/// let mut table: FixedHashTable<u64, 8> = FixedHashTable::new();
/// let idx = table.insert_unique(42).unwrap();
/// assert_eq!(table.get(idx), Some(&42));
/// assert_eq!(table.find(&42), Some(idx));
/// assert_eq!(table.erase(&42), 1);
/// assert!(table.is_empty());
/// ```
#[repr(C)]
pub struct FixedHashTable<T, const N: usize, S = FxBuildHasher> {
    pub(crate) init_state: u32,
    pub(crate) lru_enabled: bool,
    pub(crate) len: u32,
    pub(crate) free_head: SlotIndex,
    pub(crate) list_head: SlotIndex,
    pub(crate) list_tail: SlotIndex,
    pub(crate) bucket_head: [SlotIndex; N],
    pub(crate) slots: [Slot<T>; N],
    pub(crate) hasher: S,
}

impl<T: KeyOf, const N: usize, S: BuildHasher + Default> FixedHashTable<T, N, S> {
    /// Creates an owned, fully initialized table (the create path).
    pub fn new() -> Self {
        let mut table = Self {
            init_state: 0,
            lru_enabled: false,
            len: 0,
            free_head: SlotIndex::INVALID,
            list_head: SlotIndex::INVALID,
            list_tail: SlotIndex::INVALID,
            bucket_head: [SlotIndex::INVALID; N],
            slots: std::array::from_fn(|i| Slot::vacant(i, SlotIndex::INVALID)),
            hasher: S::default(),
        };
        table.create();
        table
    }

    /// Initializes a table in caller-provided memory, e.g. a mapped shared
    /// segment.
    ///
    /// `first_attach` selects the path: `true` runs full create
    /// initialization (headers, free list, bucket array); `false` resumes a
    /// segment that already holds a table from a prior run, leaving every
    /// index and flag untouched after verifying the init marker.
    ///
    /// # Safety
    ///
    /// - `ptr` must be valid for reads and writes of `size_of::<Self>()`
    ///   bytes and properly aligned.
    /// - On first attach the memory must be zero-filled (freshly mapped
    ///   shared memory is); on resume it must hold a table produced by a
    ///   compatible build of this crate.
    /// - `T` must be address-independent: no pointers, references, or heap
    ///   handles inside the payload. Types with drop glue are rejected at
    ///   compile time.
    /// - The returned reference must be the only access path for its
    ///   lifetime; cross-process synchronization is the caller's problem.
    pub unsafe fn init_in_place<'a>(
        ptr: *mut Self,
        first_attach: bool,
    ) -> Result<&'a mut Self, InitError> {
        const {
            assert!(
                !mem::needs_drop::<T>(),
                "shared-memory payloads must not have drop glue"
            );
            assert!(
                mem::size_of::<S>() == 0 && !mem::needs_drop::<S>(),
                "the hasher must be a zero-sized, seed-free type"
            );
        }
        let table = &mut *ptr;
        if first_attach {
            table.create();
        } else {
            table.resume()?;
        }
        Ok(table)
    }

    fn create(&mut self) {
        self.format();
        self.lru_enabled = false;
        self.init_state = READY;
    }

    fn resume(&mut self) -> Result<(), InitError> {
        if self.init_state != READY {
            return Err(InitError::new(format!(
                "cannot resume: init marker {:#010x} does not match {:#010x}; \
                 segment was never created or belongs to another layout",
                self.init_state, READY
            )));
        }
        if self.len as usize > N {
            return Err(InitError::new(format!(
                "cannot resume: recorded size {} exceeds capacity {}",
                self.len, N
            )));
        }
        Ok(())
    }

    /// Rebuilds the vacant state: sequential free list 0→1→…→N-1, empty
    /// buckets, empty order list. Does not touch `lru_enabled` or
    /// `init_state`; does not drop payloads.
    fn format(&mut self) {
        for i in 0..N {
            let next_free = if i + 1 < N {
                SlotIndex::new(i + 1)
            } else {
                SlotIndex::INVALID
            };
            self.slots[i] = Slot::vacant(i, next_free);
        }
        for b in 0..N {
            self.bucket_head[b] = SlotIndex::INVALID;
        }
        self.free_head = if N > 0 {
            SlotIndex::new(0)
        } else {
            SlotIndex::INVALID
        };
        self.len = 0;
        self.list_head = SlotIndex::INVALID;
        self.list_tail = SlotIndex::INVALID;
    }

    // ------------------------------------------------------------------
    // Size and mode accessors
    // ------------------------------------------------------------------

    /// Returns the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the fixed capacity `N`.
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Returns `true` if every slot is in use.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len as usize == N
    }

    /// Makes subsequent reads (`find`, `count`, `equal_range`) promote the
    /// accessed entries to the tail of the order list. Write-path behavior
    /// is unaffected: inserts always append at the tail.
    pub fn enable_lru(&mut self) {
        if self.reject_uninitialized("enable_lru") {
            return;
        }
        self.lru_enabled = true;
    }

    /// Stops reads from reordering the order list.
    pub fn disable_lru(&mut self) {
        if self.reject_uninitialized("disable_lru") {
            return;
        }
        self.lru_enabled = false;
    }

    /// Returns `true` if LRU access-order mode is on.
    #[inline]
    pub fn is_lru_enabled(&self) -> bool {
        self.lru_enabled
    }

    /// Index of the least recently used entry (order-list head), if any.
    #[inline]
    pub fn list_front(&self) -> Option<SlotIndex> {
        self.list_head.is_valid().then_some(self.list_head)
    }

    /// Index of the most recently used entry (order-list tail), if any.
    #[inline]
    pub fn list_back(&self) -> Option<SlotIndex> {
        self.list_tail.is_valid().then_some(self.list_tail)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Returns the slot of the first entry with an equal key.
    ///
    /// In LRU mode the found entry is promoted to the order-list tail,
    /// which is why this takes `&mut self`; use [`peek`](Self::peek) for a
    /// read that never reorders.
    pub fn find(&mut self, key: &T::Key) -> Option<SlotIndex> {
        if self.reject_uninitialized("find") || N == 0 {
            return None;
        }
        let bucket = self.bucket_of(key);
        let found = self.chain_find_first(bucket, key)?;
        if self.lru_enabled {
            self.list_move_to_tail(found);
        }
        Some(found)
    }

    /// Like [`find`](Self::find) but never touches the order list, even in
    /// LRU mode.
    pub fn peek(&self, key: &T::Key) -> Option<SlotIndex> {
        if self.reject_uninitialized("peek") || N == 0 {
            return None;
        }
        let bucket = self.bucket_of(key);
        self.chain_find_first(bucket, key)
    }

    /// Returns the value stored in `idx`, or `None` if the slot is vacant,
    /// out of range, or fails its self-index check.
    pub fn get(&self, idx: SlotIndex) -> Option<&T> {
        let slot = self.valid_slot(idx)?;
        // SAFETY: valid_slot confirmed the slot holds a live payload.
        Some(unsafe { slot.value_ref() })
    }

    /// Mutable access to the value stored in `idx`.
    ///
    /// The value's key must compare equal before and after mutation; the
    /// bucket placement was fixed at insert time.
    pub fn get_mut(&mut self, idx: SlotIndex) -> Option<&mut T> {
        if self.valid_slot(idx).is_none() {
            return None;
        }
        let slot = &mut self.slots[idx.index()];
        // SAFETY: checked above.
        Some(unsafe { slot.value_mut() })
    }

    /// Counts entries with an equal key. In LRU mode every match is promoted
    /// to the tail; the last one processed ends up nearest the tail.
    pub fn count(&mut self, key: &T::Key) -> usize {
        if self.reject_uninitialized("count") || N == 0 {
            return 0;
        }
        let bucket = self.bucket_of(key);
        let mut cur = self.bucket_head[bucket];
        let mut steps = 0usize;
        let mut hits = 0usize;
        while cur.is_valid() {
            if steps >= N {
                log::error!("bucket {} chain exceeds capacity {}; cycle suspected", bucket, N);
                break;
            }
            steps += 1;
            let (next, is_match) = match self.valid_slot(cur) {
                Some(slot) => (slot.hash_next, unsafe { slot.value_ref() }.key() == key),
                None => {
                    log::error!("bucket {} chain references unusable slot {}", bucket, cur.0);
                    break;
                }
            };
            if is_match {
                hits += 1;
                if self.lru_enabled {
                    self.list_move_to_tail(cur);
                }
            }
            cur = next;
        }
        hits
    }

    /// Returns an iterator over the contiguous run of entries with an equal
    /// key, in chain order.
    ///
    /// In LRU mode every entry of the run is promoted to the order-list
    /// tail in visit order before the iterator is returned, so the run ends
    /// up re-appended at the tail in its chain order. This mirrors the
    /// behavior of `count`; list-order neighbors between duplicates are not
    /// preserved.
    pub fn equal_range(&mut self, key: &T::Key) -> EqualRange<'_, T, N, S> {
        if self.reject_uninitialized("equal_range") || N == 0 {
            return EqualRange::empty(self);
        }
        let bucket = self.bucket_of(key);
        let first = match self.chain_find_first(bucket, key) {
            Some(idx) => idx,
            None => return EqualRange::empty(self),
        };
        let last = self.chain_find_last_equal(bucket, key).unwrap_or(first);
        if self.lru_enabled {
            let mut cur = first;
            let mut steps = 0usize;
            loop {
                if steps >= N {
                    log::error!(
                        "bucket {} chain exceeds capacity {}; cycle suspected",
                        bucket,
                        N
                    );
                    break;
                }
                steps += 1;
                let next = self.slots[cur.index()].hash_next;
                self.list_move_to_tail(cur);
                if cur == last || !next.is_valid() {
                    break;
                }
                cur = next;
            }
        }
        EqualRange::new(self, first, last)
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Inserts `value` unless an entry with an equal key already exists.
    ///
    /// On success the new entry is spliced at the head of its bucket chain
    /// and appended to the order-list tail. On any failure the table is
    /// untouched and the value is handed back inside the error.
    pub fn insert_unique(&mut self, value: T) -> Result<SlotIndex, InsertError<T>> {
        if self.reject_uninitialized("insert_unique") {
            return Err(InsertError::Uninitialized(value));
        }
        if N == 0 {
            return Err(InsertError::Full(value));
        }
        let bucket = self.bucket_of(value.key());
        if let Some(existing) = self.chain_find_first(bucket, value.key()) {
            return Err(InsertError::Duplicate {
                existing,
                rejected: value,
            });
        }
        let idx = match self.allocate(value) {
            Ok(idx) => idx,
            Err(value) => return Err(InsertError::Full(value)),
        };
        let head = self.bucket_head[bucket];
        self.slots[idx.index()].hash_next = head;
        self.bucket_head[bucket] = idx;
        self.list_append_tail(idx);
        Ok(idx)
    }

    /// Inserts `value`, allowing duplicate keys.
    ///
    /// If entries with an equal key exist, the new one is spliced directly
    /// after the last of them, keeping equal keys contiguous in the chain;
    /// otherwise it goes to the chain head. Always appended to the
    /// order-list tail. Fails only when the table is full.
    pub fn insert_equal(&mut self, value: T) -> Result<SlotIndex, InsertError<T>> {
        if self.reject_uninitialized("insert_equal") {
            return Err(InsertError::Uninitialized(value));
        }
        if N == 0 {
            return Err(InsertError::Full(value));
        }
        let bucket = self.bucket_of(value.key());
        let anchor = self.chain_find_last_equal(bucket, value.key());
        let idx = match self.allocate(value) {
            Ok(idx) => idx,
            Err(value) => return Err(InsertError::Full(value)),
        };
        match anchor {
            Some(after) => {
                let next = self.slots[after.index()].hash_next;
                self.slots[idx.index()].hash_next = next;
                self.slots[after.index()].hash_next = idx;
            }
            None => {
                let head = self.bucket_head[bucket];
                self.slots[idx.index()].hash_next = head;
                self.bucket_head[bucket] = idx;
            }
        }
        self.list_append_tail(idx);
        Ok(idx)
    }

    // ------------------------------------------------------------------
    // Erasure
    // ------------------------------------------------------------------

    /// Removes every entry with an equal key, returning the count removed.
    pub fn erase(&mut self, key: &T::Key) -> usize {
        if self.reject_uninitialized("erase") || N == 0 {
            return 0;
        }
        let bucket = self.bucket_of(key);
        let mut removed = 0usize;
        let mut prev = SlotIndex::INVALID;
        let mut cur = self.bucket_head[bucket];
        let mut steps = 0usize;
        while cur.is_valid() {
            if steps >= N {
                log::error!("bucket {} chain exceeds capacity {}; cycle suspected", bucket, N);
                break;
            }
            steps += 1;
            let (next, is_match) = match self.valid_slot(cur) {
                Some(slot) => (slot.hash_next, unsafe { slot.value_ref() }.key() == key),
                None => {
                    log::error!("bucket {} chain references unusable slot {}", bucket, cur.0);
                    break;
                }
            };
            if is_match {
                if prev.is_valid() {
                    self.slots[prev.index()].hash_next = next;
                } else {
                    self.bucket_head[bucket] = next;
                }
                self.list_unlink(cur);
                let _ = self.recycle_unlinked(cur);
                removed += 1;
            } else {
                prev = cur;
            }
            cur = next;
        }
        removed
    }

    /// Removes the entry stored in `idx` and returns its value.
    ///
    /// Returns `None` (after logging) if the slot is vacant, out of range,
    /// or not reachable from the bucket chain its key hashes to.
    pub fn erase_at(&mut self, idx: SlotIndex) -> Option<T> {
        if self.reject_uninitialized("erase_at") {
            return None;
        }
        let slot = self.valid_slot(idx)?;
        // SAFETY: valid_slot confirmed the payload is live.
        let bucket = self.bucket_of(unsafe { slot.value_ref() }.key());
        let mut prev = SlotIndex::INVALID;
        let mut cur = self.bucket_head[bucket];
        let mut steps = 0usize;
        while cur.is_valid() && cur != idx {
            if steps >= N {
                log::error!("bucket {} chain exceeds capacity {}; cycle suspected", bucket, N);
                return None;
            }
            steps += 1;
            prev = cur;
            cur = self.slots[cur.index()].hash_next;
        }
        if cur != idx {
            log::error!(
                "slot {} not reachable from bucket {}; chain/list mismatch",
                idx.0,
                bucket
            );
            return None;
        }
        let next = self.slots[idx.index()].hash_next;
        if prev.is_valid() {
            self.slots[prev.index()].hash_next = next;
        } else {
            self.bucket_head[bucket] = next;
        }
        self.list_unlink(idx);
        self.recycle_unlinked(idx)
    }

    /// Recycles every entry and rebuilds the vacant state, behaving like a
    /// freshly created table except that the LRU toggle is carried over.
    pub fn clear(&mut self) {
        if self.reject_uninitialized("clear") {
            return;
        }
        if mem::needs_drop::<T>() {
            for slot in self.slots.iter_mut() {
                if slot.valid {
                    // SAFETY: valid flag guards the payload.
                    unsafe { slot.value.assume_init_drop() };
                    slot.valid = false;
                }
            }
        }
        self.format();
    }

    // ------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------

    /// Iterates all entries in hash order: within a chain, by `hash_next`;
    /// between chains, by ascending bucket index. Read-only; never triggers
    /// LRU reordering.
    pub fn iter(&self) -> HashIter<'_, T, N, S> {
        HashIter::new(self)
    }

    /// Iterates all entries in order-list order, least recently inserted
    /// (or used, in LRU mode) first. Read-only; never triggers LRU
    /// reordering.
    pub fn iter_list(&self) -> ListIter<'_, T, N, S> {
        ListIter::new(self)
    }

    // ------------------------------------------------------------------
    // Arena: allocation and recycling
    // ------------------------------------------------------------------

    /// Pops the free-list head and constructs `value` in place. Hands the
    /// value back if the free list is exhausted or structurally damaged.
    fn allocate(&mut self, value: T) -> Result<SlotIndex, T> {
        let idx = self.free_head;
        if !idx.is_valid() {
            return Err(value);
        }
        if idx.index() >= N {
            log::error!("free-list head {} out of range (capacity {})", idx.0, N);
            return Err(value);
        }
        let slot = &mut self.slots[idx.index()];
        if slot.valid || slot.self_index != idx {
            log::error!(
                "free-list head {} is corrupt (valid={}, self_index={})",
                idx.0,
                slot.valid,
                slot.self_index.0
            );
            return Err(value);
        }
        let next_free = slot.hash_next;
        slot.value = mem::MaybeUninit::new(value);
        slot.valid = true;
        slot.hash_next = SlotIndex::INVALID;
        slot.list_prev = SlotIndex::INVALID;
        slot.list_next = SlotIndex::INVALID;
        self.free_head = next_free;
        self.len += 1;
        Ok(idx)
    }

    /// Destroys the payload of a slot already unlinked from both the bucket
    /// chain and the order list, and pushes it onto the free-list head.
    fn recycle_unlinked(&mut self, idx: SlotIndex) -> Option<T> {
        if self.len == 0 {
            log::error!("recycle of slot {} while size is 0", idx.0);
            return None;
        }
        let free = self.free_head;
        let slot = &mut self.slots[idx.index()];
        if !slot.valid {
            log::error!("double recycle of slot {}", idx.0);
            return None;
        }
        // SAFETY: the valid flag guards the payload; cleared below.
        let value = unsafe { slot.value.assume_init_read() };
        slot.valid = false;
        slot.hash_next = free;
        slot.list_prev = SlotIndex::INVALID;
        slot.list_next = SlotIndex::INVALID;
        self.free_head = idx;
        self.len -= 1;
        Some(value)
    }

    /// Defensive slot accessor: checks range, the slot's self-index, and the
    /// valid flag, logging corruption and reporting "absent" instead of
    /// following a damaged reference.
    pub(crate) fn valid_slot(&self, idx: SlotIndex) -> Option<&Slot<T>> {
        if !idx.is_valid() || idx.index() >= N {
            log::error!("slot index {} out of range (capacity {})", idx.0, N);
            return None;
        }
        let slot = &self.slots[idx.index()];
        if slot.self_index != idx {
            log::error!(
                "slot {} self-index mismatch (stored {})",
                idx.index(),
                slot.self_index.0
            );
            return None;
        }
        if !slot.valid {
            return None;
        }
        Some(slot)
    }

    // ------------------------------------------------------------------
    // Hash index: bucket selection and chain scans
    // ------------------------------------------------------------------

    #[inline]
    pub(crate) fn bucket_of(&self, key: &T::Key) -> usize {
        debug_assert!(N > 0);
        (self.hasher.hash_one(key) % N as u64) as usize
    }

    /// First chain entry with an equal key, or `None`.
    fn chain_find_first(&self, bucket: usize, key: &T::Key) -> Option<SlotIndex> {
        let mut cur = self.bucket_head[bucket];
        let mut steps = 0usize;
        while cur.is_valid() {
            if steps >= N {
                log::error!("bucket {} chain exceeds capacity {}; cycle suspected", bucket, N);
                return None;
            }
            steps += 1;
            let slot = match self.valid_slot(cur) {
                Some(slot) => slot,
                None => {
                    log::error!("bucket {} chain references unusable slot {}", bucket, cur.0);
                    return None;
                }
            };
            // SAFETY: valid_slot confirmed the payload is live.
            if unsafe { slot.value_ref() }.key() == key {
                return Some(cur);
            }
            cur = slot.hash_next;
        }
        None
    }

    /// Last entry of the contiguous equal-key run, or `None` if there is no
    /// match. Used by `insert_equal` to keep duplicates contiguous.
    fn chain_find_last_equal(&self, bucket: usize, key: &T::Key) -> Option<SlotIndex> {
        let mut cur = self.chain_find_first(bucket, key)?;
        let mut steps = 0usize;
        while steps < N {
            steps += 1;
            let next = self.valid_slot(cur)?.hash_next;
            if !next.is_valid() {
                break;
            }
            let next_slot = match self.valid_slot(next) {
                Some(slot) => slot,
                None => break,
            };
            // SAFETY: valid_slot confirmed the payload is live.
            if unsafe { next_slot.value_ref() }.key() != key {
                break;
            }
            cur = next;
        }
        Some(cur)
    }

    // ------------------------------------------------------------------
    // Order list: append / unlink / move-to-tail
    // ------------------------------------------------------------------

    /// O(1) splice at the order-list tail. Every insert ends here.
    fn list_append_tail(&mut self, idx: SlotIndex) {
        let old_tail = self.list_tail;
        {
            let slot = &mut self.slots[idx.index()];
            slot.list_prev = old_tail;
            slot.list_next = SlotIndex::INVALID;
        }
        if old_tail.is_valid() {
            self.slots[old_tail.index()].list_next = idx;
        } else {
            self.list_head = idx;
        }
        self.list_tail = idx;
    }

    /// O(1) unlink, patching neighbors and the head/tail ends. Leaves the
    /// slot's own list links INVALID.
    fn list_unlink(&mut self, idx: SlotIndex) {
        let (prev, next) = {
            let slot = &self.slots[idx.index()];
            (slot.list_prev, slot.list_next)
        };
        if prev.is_valid() {
            self.slots[prev.index()].list_next = next;
        } else {
            self.list_head = next;
        }
        if next.is_valid() {
            self.slots[next.index()].list_prev = prev;
        } else {
            self.list_tail = prev;
        }
        let slot = &mut self.slots[idx.index()];
        slot.list_prev = SlotIndex::INVALID;
        slot.list_next = SlotIndex::INVALID;
    }

    /// LRU promotion: most recently used lives at the tail. No-op if `idx`
    /// already is the tail.
    fn list_move_to_tail(&mut self, idx: SlotIndex) {
        if self.list_tail == idx {
            return;
        }
        self.list_unlink(idx);
        self.list_append_tail(idx);
    }

    // ------------------------------------------------------------------
    // Lifecycle guard
    // ------------------------------------------------------------------

    #[inline]
    pub(crate) fn ready(&self) -> bool {
        self.init_state == READY
    }

    /// Logs and returns `true` if the table has not completed create/resume.
    fn reject_uninitialized(&self, op: &str) -> bool {
        if self.ready() {
            return false;
        }
        log::error!(
            "{} on uninitialized table (init_state {:#010x}, capacity {})",
            op,
            self.init_state,
            N
        );
        true
    }
}

impl<T: KeyOf, const N: usize, S: BuildHasher + Default> Default for FixedHashTable<T, N, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, S> fmt::Debug for FixedHashTable<T, N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedHashTable")
            .field("capacity", &N)
            .field("len", &self.len)
            .field("lru_enabled", &self.lru_enabled)
            .field("ready", &(self.init_state == READY))
            .finish_non_exhaustive()
    }
}

impl<T, const N: usize, S> Drop for FixedHashTable<T, N, S> {
    fn drop(&mut self) {
        if !mem::needs_drop::<T>() {
            return;
        }
        for slot in self.slots.iter_mut() {
            if slot.valid {
                // SAFETY: the valid flag guards the payload.
                unsafe { slot.value.assume_init_drop() };
            }
        }
    }
}
