// ==============================================
// CROSS-MODULE INVARIANT TESTS (integration)
// ==============================================
//
// Exercises the fixed table and its facades through whole workflows:
// randomized operation sequences checked against a reference model,
// create/resume over one backing buffer, and a bounded-cache scenario.

use std::mem::MaybeUninit;

use proptest::prelude::*;

use shmkit::ds::FixedHashTable;
use shmkit::error::InsertError;
use shmkit::map::ShmMap;
use shmkit::traits::KeyOf;

// ==============================================
// Reference-model property test
// ==============================================
//
// A Vec-based model replays every operation: entries carry a unique seq so
// list order can be compared exactly, including LRU promotions. Duplicates
// of one key stay in seq order within their chain run (insert_equal splices
// after the last equal entry), so chain-order promotion is derivable from
// the model: the run's entries promote in ascending seq order.

const CAP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rec {
    k: u8,
    seq: u32,
}

impl KeyOf for Rec {
    type Key = u8;

    fn key(&self) -> &u8 {
        &self.k
    }
}

#[derive(Debug, Clone)]
enum Op {
    InsertUnique(u8),
    InsertEqual(u8),
    Erase(u8),
    Find(u8),
    Count(u8),
    EqualRange(u8),
    Clear,
    EnableLru,
    DisableLru,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6).prop_map(Op::InsertUnique),
        (0u8..6).prop_map(Op::InsertEqual),
        (0u8..6).prop_map(Op::Erase),
        (0u8..6).prop_map(Op::Find),
        (0u8..6).prop_map(Op::Count),
        (0u8..6).prop_map(Op::EqualRange),
        Just(Op::Clear),
        Just(Op::EnableLru),
        Just(Op::DisableLru),
    ]
}

#[derive(Default)]
struct Model {
    entries: Vec<Rec>,
    lru: bool,
    seq: u32,
}

impl Model {
    fn count_key(&self, k: u8) -> usize {
        self.entries.iter().filter(|e| e.k == k).count()
    }

    /// Position of the entry with key `k` and the smallest seq, the first
    /// chain match, since duplicate runs stay in seq order.
    fn first_chain_match(&self, k: u8) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.k == k)
            .min_by_key(|(_, e)| e.seq)
            .map(|(pos, _)| pos)
    }

    fn move_to_back(&mut self, pos: usize) {
        let e = self.entries.remove(pos);
        self.entries.push(e);
    }

    /// Promotes every entry with key `k`, in ascending seq order.
    fn promote_run(&mut self, k: u8) {
        let mut seqs: Vec<u32> = self
            .entries
            .iter()
            .filter(|e| e.k == k)
            .map(|e| e.seq)
            .collect();
        seqs.sort_unstable();
        for seq in seqs {
            let pos = self.entries.iter().position(|e| e.seq == seq).unwrap();
            self.move_to_back(pos);
        }
    }
}

fn apply(table: &mut FixedHashTable<Rec, CAP>, model: &mut Model, op: &Op) {
    match *op {
        Op::InsertUnique(k) => {
            let rec = Rec { k, seq: model.seq };
            let res = table.insert_unique(rec);
            if model.entries.iter().any(|e| e.k == k) {
                assert!(matches!(res, Err(InsertError::Duplicate { .. })));
            } else if model.entries.len() == CAP {
                assert!(res.unwrap_err().is_full());
            } else {
                res.unwrap();
                model.entries.push(rec);
                model.seq += 1;
            }
        }
        Op::InsertEqual(k) => {
            let rec = Rec { k, seq: model.seq };
            let res = table.insert_equal(rec);
            if model.entries.len() == CAP {
                assert!(res.unwrap_err().is_full());
            } else {
                res.unwrap();
                model.entries.push(rec);
                model.seq += 1;
            }
        }
        Op::Erase(k) => {
            let removed = table.erase(&k);
            assert_eq!(removed, model.count_key(k));
            model.entries.retain(|e| e.k != k);
        }
        Op::Find(k) => {
            let res = table.find(&k);
            match model.first_chain_match(k) {
                Some(pos) => {
                    assert!(res.is_some());
                    if model.lru {
                        model.move_to_back(pos);
                    }
                }
                None => assert!(res.is_none()),
            }
        }
        Op::Count(k) => {
            assert_eq!(table.count(&k), model.count_key(k));
            if model.lru {
                model.promote_run(k);
            }
        }
        Op::EqualRange(k) => {
            let got: Vec<u32> = table.equal_range(&k).map(|(_, e)| e.seq).collect();
            let mut want: Vec<u32> = model
                .entries
                .iter()
                .filter(|e| e.k == k)
                .map(|e| e.seq)
                .collect();
            want.sort_unstable();
            assert_eq!(got, want);
            if model.lru {
                model.promote_run(k);
            }
        }
        Op::Clear => {
            table.clear();
            model.entries.clear();
        }
        Op::EnableLru => {
            table.enable_lru();
            model.lru = true;
        }
        Op::DisableLru => {
            table.disable_lru();
            model.lru = false;
        }
    }
}

proptest! {
    #[test]
    fn random_op_sequences_preserve_invariants(
        ops in proptest::collection::vec(op_strategy(), 1..64)
    ) {
        let mut table: FixedHashTable<Rec, CAP> = FixedHashTable::new();
        let mut model = Model::default();

        for op in &ops {
            apply(&mut table, &mut model, op);

            table.validate().unwrap();
            prop_assert_eq!(table.len(), model.entries.len());
            prop_assert_eq!(table.is_lru_enabled(), model.lru);

            let order: Vec<(u8, u32)> =
                table.iter_list().map(|(_, e)| (e.k, e.seq)).collect();
            let want: Vec<(u8, u32)> =
                model.entries.iter().map(|e| (e.k, e.seq)).collect();
            prop_assert_eq!(order, want);

            let mut hash_view: Vec<u32> = table.iter().map(|(_, e)| e.seq).collect();
            hash_view.sort_unstable();
            let mut all: Vec<u32> = model.entries.iter().map(|e| e.seq).collect();
            all.sort_unstable();
            prop_assert_eq!(hash_view, all);
        }
    }
}

// ==============================================
// Create / resume over one backing buffer
// ==============================================

type RestartTable = FixedHashTable<u64, 8>;

#[test]
fn create_then_resume_preserves_contents() {
    let mut backing: Box<MaybeUninit<RestartTable>> = Box::new(MaybeUninit::zeroed());
    let ptr = backing.as_mut_ptr();

    // first process: create, populate, touch
    {
        let table = unsafe { RestartTable::init_in_place(ptr, true) }.unwrap();
        for k in [11u64, 22, 33] {
            table.insert_unique(k).unwrap();
        }
        table.enable_lru();
        table.find(&11).unwrap();
    }

    // "restart": reattach to the same bytes without reinitializing
    {
        let table = unsafe { RestartTable::init_in_place(ptr, false) }.unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.is_lru_enabled());
        let order: Vec<u64> = table.iter_list().map(|(_, v)| *v).collect();
        assert_eq!(order, vec![22, 33, 11]);
        table.validate().unwrap();

        table.insert_unique(44).unwrap();
        assert_eq!(table.len(), 4);
        table.validate().unwrap();
    }
}

#[test]
fn resume_of_uncreated_segment_is_rejected() {
    let mut backing: Box<MaybeUninit<RestartTable>> = Box::new(MaybeUninit::zeroed());
    let err = unsafe { RestartTable::init_in_place(backing.as_mut_ptr(), false) }.unwrap_err();
    assert!(err.message().contains("never created"));
}

// ==============================================
// Bounded-cache workflow through the map facade
// ==============================================

#[test]
fn shm_map_as_bounded_lru_cache() {
    let mut map: ShmMap<u64, u64, 4> = ShmMap::new();
    map.enable_lru();
    for k in 0u64..4 {
        map.insert(k, k * 10).unwrap();
    }
    assert!(map.is_full());

    // a hit protects key 0; key 1 becomes the victim
    map.get(&0);
    let victim = *map.least_recent().unwrap().0;
    assert_eq!(victim, 1);

    map.remove(&victim).unwrap();
    map.insert(4, 40).unwrap();

    assert!(map.contains_key(&0));
    assert!(!map.contains_key(&1));
    assert!(map.contains_key(&4));
    map.validate().unwrap();
}
