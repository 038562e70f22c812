//! Slot cell and index types shared by the fixed-capacity containers.
//!
//! A [`SlotIndex`] is a raw `u32` with `u32::MAX` as the invalid sentinel,
//! never an `Option` and never a pointer. The niche-free representation keeps
//! the slot layout identical on every platform and at every mapping address,
//! which is the whole point of the crate.

use std::mem::MaybeUninit;

/// Index of a slot inside a fixed arena.
///
/// `SlotIndex::INVALID` (`u32::MAX`) terminates every chain and list, so a
/// table can hold at most `u32::MAX - 1` slots. Indices are only meaningful
/// for the table that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SlotIndex(pub(crate) u32);

impl SlotIndex {
    /// The sentinel index terminating chains and lists.
    pub const INVALID: SlotIndex = SlotIndex(u32::MAX);

    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize);
        SlotIndex(index as u32)
    }

    /// Returns the raw index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` if this is not the `INVALID` sentinel.
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// One fixed-size cell of a slot arena.
///
/// The link fields come first and the payload last; links are touched on
/// every chain or list operation, the payload only on access. The same
/// `hash_next` field threads the bucket chain while the slot is live and the
/// free list while it is vacant.
///
/// `#[repr(C)]` fixes the field order: the in-memory layout of a segment is
/// its "wire format", and slots written by one build must be readable by
/// another.
#[repr(C)]
pub(crate) struct Slot<T> {
    /// Next slot in the bucket chain (live) or in the free list (vacant).
    pub(crate) hash_next: SlotIndex,
    /// Previous slot in the order list, INVALID when unlinked.
    pub(crate) list_prev: SlotIndex,
    /// Next slot in the order list, INVALID when unlinked.
    pub(crate) list_next: SlotIndex,
    /// The slot's own position, checked on every dereference.
    pub(crate) self_index: SlotIndex,
    /// Whether `value` currently holds a live payload.
    pub(crate) valid: bool,
    pub(crate) value: MaybeUninit<T>,
}

impl<T> Slot<T> {
    /// A vacant slot at `index`, threaded into the free list via `next_free`.
    pub(crate) fn vacant(index: usize, next_free: SlotIndex) -> Self {
        Slot {
            hash_next: next_free,
            list_prev: SlotIndex::INVALID,
            list_next: SlotIndex::INVALID,
            self_index: SlotIndex::new(index),
            valid: false,
            value: MaybeUninit::uninit(),
        }
    }

    /// # Safety
    ///
    /// The slot must be `valid`.
    #[inline]
    pub(crate) unsafe fn value_ref(&self) -> &T {
        debug_assert!(self.valid);
        self.value.assume_init_ref()
    }

    /// # Safety
    ///
    /// The slot must be `valid`.
    #[inline]
    pub(crate) unsafe fn value_mut(&mut self) -> &mut T {
        debug_assert!(self.valid);
        self.value.assume_init_mut()
    }
}
