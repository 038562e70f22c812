//! Diagnostic surface of [`FixedHashTable`]: a full structural validator
//! and a human-readable dump.
//!
//! Both are read-only and never touch the order list, so they are safe to
//! run against a live table between operations. The validator is a
//! diagnostic, not a hot-path guard; it allocates scratch bitmaps and walks
//! every chain and both list directions.

use std::fmt::Write;
use std::hash::BuildHasher;

use crate::ds::fixed_table::FixedHashTable;
use crate::error::InvariantError;
use crate::traits::KeyOf;

impl<T: KeyOf, const N: usize, S: BuildHasher + Default> FixedHashTable<T, N, S> {
    /// Checks every structural invariant and reports the first violation.
    ///
    /// Verified: size bookkeeping, free-list length (`capacity - len`),
    /// per-slot self-indices, single chain membership matching the key's
    /// hash, contiguity of equal keys within a chain, and a forward plus
    /// backward order-list walk that must agree with the recorded head,
    /// tail, and size, reaching every live slot exactly once.
    pub fn validate(&self) -> Result<(), InvariantError> {
        if !self.ready() {
            return Err(InvariantError::new("table is not initialized"));
        }
        if self.len() > N {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.len(),
                N
            )));
        }

        // slot-local state
        let mut valid_count = 0usize;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.self_index.index() != i {
                return Err(InvariantError::new(format!(
                    "slot {} self-index mismatch (stored {})",
                    i,
                    slot.self_index.0
                )));
            }
            if slot.valid {
                valid_count += 1;
            } else if slot.list_prev.is_valid() || slot.list_next.is_valid() {
                return Err(InvariantError::new(format!(
                    "vacant slot {} retains order-list links",
                    i
                )));
            }
        }
        if valid_count != self.len() {
            return Err(InvariantError::new(format!(
                "size {} disagrees with {} valid slots",
                self.len(),
                valid_count
            )));
        }

        // free list
        let mut free = 0usize;
        let mut cur = self.free_head;
        while cur.is_valid() {
            if free > N {
                return Err(InvariantError::new("free list contains a cycle"));
            }
            if cur.index() >= N {
                return Err(InvariantError::new(format!(
                    "free list references out-of-range slot {}",
                    cur.0
                )));
            }
            let slot = &self.slots[cur.index()];
            if slot.valid {
                return Err(InvariantError::new(format!(
                    "free list contains live slot {}",
                    cur.index()
                )));
            }
            free += 1;
            cur = slot.hash_next;
        }
        if free != N - self.len() {
            return Err(InvariantError::new(format!(
                "free list holds {} slots, expected {}",
                free,
                N - self.len()
            )));
        }

        // bucket chains
        let mut in_chain = vec![false; N];
        let mut chained = 0usize;
        for bucket in 0..N {
            let mut cur = self.bucket_head[bucket];
            let mut steps = 0usize;
            let mut finished_keys: Vec<&T::Key> = Vec::new();
            let mut run_key: Option<&T::Key> = None;
            while cur.is_valid() {
                if steps > N {
                    return Err(InvariantError::new(format!(
                        "bucket {} chain contains a cycle",
                        bucket
                    )));
                }
                steps += 1;
                if cur.index() >= N {
                    return Err(InvariantError::new(format!(
                        "bucket {} chain references out-of-range slot {}",
                        bucket, cur.0
                    )));
                }
                let slot = &self.slots[cur.index()];
                if !slot.valid {
                    return Err(InvariantError::new(format!(
                        "bucket {} chain references vacant slot {}",
                        bucket,
                        cur.index()
                    )));
                }
                if in_chain[cur.index()] {
                    return Err(InvariantError::new(format!(
                        "slot {} reachable from more than one chain position",
                        cur.index()
                    )));
                }
                in_chain[cur.index()] = true;
                // SAFETY: valid flag checked above.
                let key = unsafe { slot.value_ref() }.key();
                let home = self.bucket_of(key);
                if home != bucket {
                    return Err(InvariantError::new(format!(
                        "slot {} chained in bucket {} but hashes to bucket {}",
                        cur.index(),
                        bucket,
                        home
                    )));
                }
                match run_key {
                    Some(prev) if prev == key => {}
                    _ => {
                        if finished_keys.iter().any(|finished| *finished == key) {
                            return Err(InvariantError::new(format!(
                                "equal keys not contiguous in bucket {} (slot {})",
                                bucket,
                                cur.index()
                            )));
                        }
                        if let Some(prev) = run_key {
                            finished_keys.push(prev);
                        }
                        run_key = Some(key);
                    }
                }
                chained += 1;
                cur = slot.hash_next;
            }
        }
        if chained != self.len() {
            return Err(InvariantError::new(format!(
                "{} slots reachable from chains, expected {}",
                chained,
                self.len()
            )));
        }

        // order list, forward
        let mut in_list = vec![false; N];
        let mut forward = 0usize;
        let mut prev = crate::ds::SlotIndex::INVALID;
        let mut cur = self.list_head;
        while cur.is_valid() {
            if forward > N {
                return Err(InvariantError::new("order list contains a cycle"));
            }
            if cur.index() >= N {
                return Err(InvariantError::new(format!(
                    "order list references out-of-range slot {}",
                    cur.0
                )));
            }
            let slot = &self.slots[cur.index()];
            if !slot.valid {
                return Err(InvariantError::new(format!(
                    "order list references vacant slot {}",
                    cur.index()
                )));
            }
            if slot.list_prev != prev {
                return Err(InvariantError::new(format!(
                    "order list prev mismatch at slot {} (stored {}, walked from {})",
                    cur.index(),
                    slot.list_prev.0,
                    prev.0
                )));
            }
            if in_list[cur.index()] {
                return Err(InvariantError::new(format!(
                    "slot {} appears twice in the order list",
                    cur.index()
                )));
            }
            in_list[cur.index()] = true;
            forward += 1;
            prev = cur;
            cur = slot.list_next;
        }
        if prev != self.list_tail {
            return Err(InvariantError::new(format!(
                "recorded tail {} disagrees with forward walk end {}",
                self.list_tail.0, prev.0
            )));
        }
        if forward != self.len() {
            return Err(InvariantError::new(format!(
                "forward order-list walk reached {} slots, expected {}",
                forward,
                self.len()
            )));
        }

        // order list, backward
        let mut backward = 0usize;
        let mut cur = self.list_tail;
        while cur.is_valid() {
            if backward > N {
                return Err(InvariantError::new("backward order-list walk contains a cycle"));
            }
            if cur.index() >= N {
                return Err(InvariantError::new(format!(
                    "order list references out-of-range slot {}",
                    cur.0
                )));
            }
            backward += 1;
            cur = self.slots[cur.index()].list_prev;
        }
        if backward != self.len() {
            return Err(InvariantError::new(format!(
                "backward order-list walk reached {} slots, expected {}",
                backward,
                self.len()
            )));
        }

        for i in 0..N {
            if self.slots[i].valid && !in_list[i] {
                return Err(InvariantError::new(format!(
                    "valid slot {} unreachable from the order list",
                    i
                )));
            }
        }

        Ok(())
    }

    /// Renders the bucket chains, free list, and order list as text.
    ///
    /// Prints slot indices only, so it works for any payload type. Walks
    /// are capped at the capacity to stay safe on a damaged table.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "FixedHashTable capacity={} len={} lru_enabled={} ready={}",
            N,
            self.len(),
            self.lru_enabled,
            self.ready()
        );

        let _ = writeln!(out, "buckets:");
        for bucket in 0..N {
            let mut cur = self.bucket_head[bucket];
            if !cur.is_valid() {
                continue;
            }
            let _ = write!(out, "  [{}]", bucket);
            let mut steps = 0usize;
            while cur.is_valid() && steps <= N {
                let _ = write!(out, " -> {}", cur.index());
                if cur.index() >= N {
                    let _ = write!(out, " (out of range)");
                    break;
                }
                cur = self.slots[cur.index()].hash_next;
                steps += 1;
            }
            let _ = writeln!(out);
        }

        let _ = write!(out, "free:");
        let mut cur = self.free_head;
        let mut steps = 0usize;
        while cur.is_valid() && steps <= N {
            let _ = write!(out, " -> {}", cur.index());
            if cur.index() >= N {
                let _ = write!(out, " (out of range)");
                break;
            }
            cur = self.slots[cur.index()].hash_next;
            steps += 1;
        }
        let _ = writeln!(out);

        let _ = write!(out, "order:");
        let mut cur = self.list_head;
        let mut steps = 0usize;
        while cur.is_valid() && steps <= N {
            let _ = write!(out, " -> {}", cur.index());
            if cur.index() >= N {
                let _ = write!(out, " (out of range)");
                break;
            }
            cur = self.slots[cur.index()].list_next;
            steps += 1;
        }
        let _ = writeln!(out);

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::ds::FixedHashTable;

    #[test]
    fn validate_accepts_populated_table() {
        let mut table: FixedHashTable<u64, 16> = FixedHashTable::new();
        for k in 0u64..12 {
            table.insert_unique(k).unwrap();
        }
        table.erase(&3);
        table.erase(&7);
        table.enable_lru();
        table.find(&5).unwrap();
        table.validate().unwrap();
    }

    #[test]
    fn validate_accepts_empty_and_full_tables() {
        let mut table: FixedHashTable<u64, 4> = FixedHashTable::new();
        table.validate().unwrap();
        for k in 0u64..4 {
            table.insert_unique(k).unwrap();
        }
        table.validate().unwrap();
    }

    #[test]
    fn dump_lists_all_sections() {
        let mut table: FixedHashTable<u64, 8> = FixedHashTable::new();
        table.insert_unique(1).unwrap();
        table.insert_unique(2).unwrap();
        let dump = table.dump();
        assert!(dump.contains("capacity=8"));
        assert!(dump.contains("buckets:"));
        assert!(dump.contains("free:"));
        assert!(dump.contains("order:"));
    }

    #[test]
    fn dump_does_not_promote() {
        let mut table: FixedHashTable<u64, 8> = FixedHashTable::new();
        for k in 1u64..=3 {
            table.insert_unique(k).unwrap();
        }
        table.enable_lru();
        let _ = table.dump();
        table.validate().unwrap();
        let order: Vec<u64> = table.iter_list().map(|(_, v)| *v).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}
