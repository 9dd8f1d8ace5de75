#![cfg(test)]

// Property tests for OrderedMap kept inside the crate so they can check the
// slot-level helpers (`find`, `slot_key`, `slot_value`) the default maps are
// built on alongside the public API.

use crate::ordered_map::{InsertError, OrderedMap};
use proptest::prelude::*;
use std::cell::Cell;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    TryInsert(usize, i32),
    GetOrInsertWith(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::TryInsert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::GetOrInsertWith(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            2 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Ordered model: a Vec of pairs in first-insertion order.
fn model_pos(model: &[(Key, i32)], k: &Key) -> Option<usize> {
    model.iter().position(|(mk, _)| mk == k)
}

fn run_state_machine<S: BuildHasher>(
    mut sut: OrderedMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(Key, i32)> = Vec::new();
    let default_calls = Cell::new(0);

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                let prev = sut.insert(k.clone(), v);
                match model_pos(&model, &k) {
                    Some(p) => {
                        prop_assert_eq!(prev, Some(model[p].1));
                        model[p].1 = v;
                    }
                    None => {
                        prop_assert_eq!(prev, None);
                        model.push((k, v));
                    }
                }
            }
            OpI::TryInsert(i, v) => {
                let k = key_from(pool, i);
                let already = model_pos(&model, &k).is_some();
                match sut.try_insert(k.clone(), v) {
                    Ok(slot) => {
                        prop_assert!(!already, "try_insert must fail on duplicate");
                        prop_assert_eq!(*slot, v);
                        model.push((k, v));
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                }
            }
            OpI::GetOrInsertWith(i, v) => {
                let k = key_from(pool, i);
                let before = default_calls.get();
                let got = *sut.get_or_insert_with(k.clone(), |_| {
                    default_calls.set(default_calls.get() + 1);
                    v
                });
                match model_pos(&model, &k) {
                    Some(p) => {
                        prop_assert_eq!(default_calls.get(), before, "default must not run when present");
                        prop_assert_eq!(got, model[p].1);
                    }
                    None => {
                        prop_assert_eq!(default_calls.get(), before + 1, "default must run exactly once");
                        prop_assert_eq!(got, v);
                        model.push((k, v));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let removed = sut.remove_entry(&k);
                match model_pos(&model, &k) {
                    Some(p) => {
                        let expected = model.remove(p);
                        prop_assert_eq!(removed, Some(expected));
                    }
                    None => prop_assert_eq!(removed, None),
                }
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                let expected = model_pos(&model, &k).map(|p| &model[p].1);
                prop_assert_eq!(sut.get(&k), expected);
                // The slot the default maps materialize through agrees with get.
                let slot = sut.find(k.0.as_str());
                prop_assert_eq!(slot.map(|s| sut.slot_value(s)), expected);
                if let Some(s) = slot {
                    prop_assert_eq!(sut.slot_key(s), &k);
                }
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.iter().any(|(k, _)| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                if let Some(vr) = sut.get_mut(&k) {
                    *vr = vr.saturating_add(d);
                    let p = model_pos(&model, &k).expect("model tracks live key");
                    model[p].1 = model[p].1.saturating_add(d);
                } else {
                    prop_assert!(model_pos(&model, &k).is_none());
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        // 1) Every view walks the model's order
        let entries: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&entries, &model);
        let keys: Vec<&Key> = sut.keys().collect();
        prop_assert_eq!(keys, model.iter().map(|(k, _)| k).collect::<Vec<_>>());
        let values: Vec<i32> = sut.values().copied().collect();
        prop_assert_eq!(values, model.iter().map(|(_, v)| *v).collect::<Vec<_>>());
        // 2) Size parity and ends of the order
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.first().map(|(k, _)| k), model.first().map(|(k, _)| k));
        prop_assert_eq!(sut.last().map(|(k, _)| k), model.last().map(|(k, _)| k));
    }
    Ok(())
}

// Property: State-machine equivalence against an insertion-ordered model.
// Invariants exercised across random operation sequences:
// - `insert` appends new keys and updates existing ones in place.
// - `try_insert` rejects duplicates; `get_or_insert_with` runs its closure
//   exactly when the key is absent.
// - `remove_entry` returns the model's pair and keeps the rest in order.
// - `iter`/`keys`/`values` all agree with the model after every step.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(OrderedMap::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, under worst-case
// collision behavior (constant hasher).
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(OrderedMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
