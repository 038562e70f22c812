//! Error types for the shmkit library.
//!
//! ## Key Components
//!
//! - [`InsertError`]: Returned by the insert operations; hands the rejected
//!   value back to the caller so nothing is lost on a full table.
//! - [`InitError`]: Returned when in-place initialization of a shared
//!   segment fails (e.g. resuming a segment that was never created).
//! - [`InvariantError`]: Returned by the structural validator when internal
//!   data-structure invariants are violated.
//!
//! No operation in this crate panics on a fallible path; every failure is
//! communicated through one of these types or an empty return.

use std::fmt;

use crate::ds::SlotIndex;

// ---------------------------------------------------------------------------
// InsertError
// ---------------------------------------------------------------------------

/// Error returned by [`FixedHashTable::insert_unique`] and
/// [`FixedHashTable::insert_equal`](crate::ds::FixedHashTable::insert_equal).
///
/// Every variant carries the rejected value back to the caller; a failed
/// insert never consumes the payload and never mutates the table.
///
/// [`FixedHashTable::insert_unique`]: crate::ds::FixedHashTable::insert_unique
#[derive(Debug, PartialEq, Eq)]
pub enum InsertError<T> {
    /// Every slot is in use; the table must be sized for the expected load.
    Full(T),
    /// An entry with an equal key already exists (unique inserts only).
    Duplicate {
        /// Slot of the existing entry.
        existing: SlotIndex,
        /// The value that was not inserted.
        rejected: T,
    },
    /// The table has not completed its create/resume lifecycle.
    Uninitialized(T),
}

impl<T> InsertError<T> {
    /// Returns `true` if the insert failed due to capacity exhaustion.
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, InsertError::Full(_))
    }

    /// Returns `true` if the insert was rejected as a duplicate key.
    #[inline]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertError::Duplicate { .. })
    }

    /// Recovers the rejected value.
    pub fn into_value(self) -> T {
        match self {
            InsertError::Full(value) => value,
            InsertError::Duplicate { rejected, .. } => rejected,
            InsertError::Uninitialized(value) => value,
        }
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::Full(_) => f.write_str("table is full"),
            InsertError::Duplicate { existing, .. } => {
                write!(f, "equal key already present in slot {}", existing.index())
            }
            InsertError::Uninitialized(_) => f.write_str("table is not initialized"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for InsertError<T> {}

// ---------------------------------------------------------------------------
// InitError
// ---------------------------------------------------------------------------

/// Error returned when in-place create/resume initialization fails.
///
/// Produced by
/// [`FixedHashTable::init_in_place`](crate::ds::FixedHashTable::init_in_place)
/// when asked to resume a segment whose contents do not look like a table
/// initialized by a prior run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitError(String);

impl InitError {
    /// Creates a new `InitError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InitError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal structural invariants are violated.
///
/// Produced by [`FixedHashTable::validate`](crate::ds::FixedHashTable::validate).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InsertError ------------------------------------------------------

    #[test]
    fn insert_full_recovers_value() {
        let err: InsertError<u64> = InsertError::Full(7);
        assert!(err.is_full());
        assert!(!err.is_duplicate());
        assert_eq!(err.into_value(), 7);
    }

    #[test]
    fn insert_duplicate_reports_existing_slot() {
        let err: InsertError<u64> = InsertError::Duplicate {
            existing: SlotIndex::new(3),
            rejected: 9,
        };
        assert!(err.is_duplicate());
        assert!(err.to_string().contains("slot 3"));
        assert_eq!(err.into_value(), 9);
    }

    #[test]
    fn insert_uninitialized_recovers_value() {
        let err: InsertError<&str> = InsertError::Uninitialized("x");
        assert!(err.to_string().contains("not initialized"));
        assert_eq!(err.into_value(), "x");
    }

    // -- InitError --------------------------------------------------------

    #[test]
    fn init_display_shows_message() {
        let err = InitError::new("segment was never created");
        assert_eq!(err.to_string(), "segment was never created");
        assert_eq!(err.message(), "segment was never created");
    }

    #[test]
    fn init_clone_and_eq() {
        let a = InitError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("free list length mismatch");
        assert_eq!(err.to_string(), "free list length mismatch");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
        assert_error::<InitError>();
        assert_error::<InsertError<u64>>();
    }
}
