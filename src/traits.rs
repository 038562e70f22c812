//! Key-extraction contract shared by every container in the crate.
//!
//! A table stores whole values and derives the lookup key from each value,
//! which lets one slot layout back maps (`Pair<K, V>` values keyed by `K`),
//! sets (self-keyed values), and anything in between. Hashing goes through
//! `std::hash::BuildHasher`; the default is `rustc_hash::FxBuildHasher`,
//! which is seed-free; two processes attached to the same segment must
//! compute identical buckets, so a randomly seeded hasher (e.g.
//! `RandomState`) must never be used here.

use std::hash::Hash;

/// Extracts the lookup key from a stored value.
///
/// The key a value reports must never change while the value is stored in a
/// table; the bucket placement is derived from it once at insert time.
pub trait KeyOf {
    /// The key type values of this type are indexed by.
    type Key: Hash + Eq;

    /// Returns the lookup key for this value.
    fn key(&self) -> &Self::Key;
}

/// A key/value entry for map-style containers.
///
/// `#[repr(C)]` so the layout is stable across the create/resume boundary,
/// like every other type that ends up inside a shared segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Pair<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Pair<K, V> {
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: Hash + Eq, V> KeyOf for Pair<K, V> {
    type Key = K;

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }
}

macro_rules! impl_self_keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl KeyOf for $ty {
                type Key = $ty;

                #[inline]
                fn key(&self) -> &$ty {
                    self
                }
            }
        )*
    };
}

impl_self_keyed!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, String,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_reports_its_key() {
        let p = Pair::new(42u64, "value");
        assert_eq!(*p.key(), 42);
        assert_eq!(p.value, "value");
    }

    #[test]
    fn primitives_are_self_keyed() {
        let n = 7u32;
        assert_eq!(*n.key(), 7);
        let s = String::from("k");
        assert_eq!(s.key(), "k");
    }
}
