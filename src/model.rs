//! Model-based equivalence checks between [`BstMap`] and the standard library collections.
//!
//! The same operation sequences drive the `proptest` suite and the `cargo fuzz` targets.

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::BstMap;

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue, u32),
    AtOrInsert(ItemValue),
    Get(ItemValue),
    Remove(ItemValue),
    First,
    Last,
    DeepClone,
    MoveOut,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item, value) => FinalOp::Insert(get_value(sorted, item), value),
            Op::AtOrInsert(item) => FinalOp::AtOrInsert(get_value(sorted, item)),
            Op::Get(item) => FinalOp::Get(get_value(sorted, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
            Op::DeepClone => FinalOp::DeepClone,
            Op::MoveOut => FinalOp::MoveOut,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32, u32),
    AtOrInsert(u32),
    Get(u32),
    Remove(u32),
    First,
    Last,
    DeepClone,
    MoveOut,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        (value_strategy(), 0u32..100).prop_map(|(item, value)| Op::Insert(item, value)),
        value_strategy().prop_map(Op::AtOrInsert),
        value_strategy().prop_map(Op::Get),
        value_strategy().prop_map(Op::Remove),
        Just(Op::First),
        Just(Op::Last),
        Just(Op::DeepClone),
        Just(Op::MoveOut),
    ]
}

/// Replays `ops` against a [`BstMap`] and a [`BTreeMap`], asserting after every step that both
/// hold the same entries in the same order and that the tree's invariants hold.
pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut sorted_keys = Vec::with_capacity(ops.len());
    let mut btree = BTreeMap::new();
    let mut bst: BstMap<u32, u32> = BstMap::new();

    fn insert_sorted(v: &mut Vec<u32>, key: u32) {
        if let Err(idx) = v.binary_search(&key) {
            v.insert(idx, key);
        }
    }

    fn remove_sorted(v: &mut Vec<u32>, key: u32) {
        if let Ok(idx) = v.binary_search(&key) {
            v.remove(idx);
        }
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_keys);

        match final_op {
            FinalOp::Insert(key, value) => {
                insert_sorted(&mut sorted_keys, key);

                let from_btree = btree.insert(key, value);
                let from_bst = bst.insert(key, value);

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::AtOrInsert(key) => {
                insert_sorted(&mut sorted_keys, key);

                let from_btree = *btree.entry(key).or_default();
                let len_before = bst.len();
                let from_bst = *bst.at_or_insert(key);

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {final_op:?}");
                assert!(bst.len() - len_before <= 1);
            }

            FinalOp::Get(key) => {
                let from_btree = btree.get(&key);
                let from_bst = bst.get(&key);
                let from_find = bst.find(&key).value();

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_bst, from_find, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(key) => {
                remove_sorted(&mut sorted_keys, key);

                let from_btree = btree.remove(&key);
                let from_bst = bst.find_mut(&key).erase().map(|(_, value)| value);

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {final_op:?}");
                assert!(bst.find(&key).is_end());
            }

            FinalOp::First => {
                let from_btree = btree.first_key_value();
                let from_bst = bst.first_key_value();

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.last_key_value();
                let from_bst = bst.last_key_value();

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::DeepClone => {
                let copy = bst.clone();
                copy.assert_invariants();
                assert_eq!(copy, bst, "FinalOp #{op_id}: {final_op:?}");

                // Continue with the copy so later steps exercise the cloned links.
                bst = copy;
            }

            FinalOp::MoveOut => {
                let moved = bst.take();
                assert!(bst.is_empty());
                assert_eq!(bst.len(), 0);

                bst = moved;
            }
        }

        bst.assert_invariants();
        assert_eq!(btree.len(), bst.len());
        assert!(btree.iter().eq(bst.iter()), "FinalOp #{op_id}: {final_op:?}");
        assert!(btree.iter().rev().eq(bst.iter().rev()), "FinalOp #{op_id}: {final_op:?}");
    }
}

#[derive(Clone, Debug, Arbitrary)]
pub enum CursorOp {
    // Get is not an operation as it's executed on every loop iteration to check equivalence.
    MovePrev,
    MoveNext,
    PeekNext,
    PeekPrev,
    Erase,
    EraseMovePrev,
}

pub fn cursor_op_strategy() -> impl Strategy<Value = CursorOp> {
    proptest::prop_oneof![
        Just(CursorOp::MovePrev),
        Just(CursorOp::MoveNext),
        Just(CursorOp::PeekNext),
        Just(CursorOp::PeekPrev),
        Just(CursorOp::Erase),
        Just(CursorOp::EraseMovePrev),
    ]
}

#[derive(Clone, Debug)]
pub struct CursorEquivalenceInput {
    pub values: Vec<u32>,
    pub ops: Vec<CursorOp>,
}

impl<'a> arbitrary::Arbitrary<'a> for CursorEquivalenceInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        fn value(u: &mut arbitrary::Unstructured<'_>) -> u32 {
            u32::arbitrary(u).unwrap_or(0)
        }

        fn op(u: &mut arbitrary::Unstructured<'_>) -> CursorOp {
            CursorOp::arbitrary(u).unwrap_or(CursorOp::MoveNext)
        }

        let num_values = u8::arbitrary(u)? % 100;
        let num_ops = u16::arbitrary(u)? % 1000;

        let values = core::iter::repeat_with(|| value(u))
            .take(num_values.into())
            .collect();

        let ops = core::iter::repeat_with(|| op(u))
            .take(num_ops.into())
            .collect();

        Ok(CursorEquivalenceInput { values, ops })
    }
}

/// Replays cursor movements and erasures against a [`BstMap`] and a sorted `Vec` holding the same
/// keys, where the `Vec` cursor is an optional index and `None` is the end position.
///
/// `values` are inserted in the given order, so the tree's shape follows it.
pub fn run_cursor_equivalence(values: Vec<u32>, ops: Vec<CursorOp>) {
    let mut bst: BstMap<u32, ()> = BstMap::new();
    for &val in &values {
        bst.at_or_insert(val);
    }

    let mut vec = values;
    vec.sort_unstable();
    vec.dedup();

    fn vec_curs_prev(v: &[u32], curs: Option<usize>) -> Option<usize> {
        match curs {
            Some(i) => i.checked_sub(1),
            None => v.len().checked_sub(1),
        }
    }

    fn vec_curs_next(v: &[u32], curs: Option<usize>) -> Option<usize> {
        curs.and_then(|i| i.checked_add(1)).filter(|&i| i < v.len())
    }

    let mut vec_curs = (!vec.is_empty()).then_some(0);
    let mut bst_curs = bst.begin_mut();

    // Check that the initial states are equivalent.
    {
        let v = vec_curs.map(|i| &vec[i]);
        let b = bst_curs.get().map(|(key, _)| key);

        assert_eq!(v, b);
    }

    for op in ops {
        match op {
            CursorOp::MoveNext => {
                vec_curs = vec_curs_next(&vec, vec_curs);
                bst_curs.move_next();
            }

            CursorOp::MovePrev => {
                vec_curs = vec_curs_prev(&vec, vec_curs);
                bst_curs.move_prev();
            }

            CursorOp::PeekNext => {
                let v = vec_curs_next(&vec, vec_curs).map(|i| &vec[i]);
                let b = bst_curs.peek_next().map(|(key, _)| key);

                assert_eq!(v, b);
            }

            CursorOp::PeekPrev => {
                let v = vec_curs_prev(&vec, vec_curs).map(|i| &vec[i]);
                let b = bst_curs.peek_prev().map(|(key, _)| key);

                assert_eq!(v, b);
            }

            CursorOp::Erase => {
                let v = vec_curs.map(|i| vec.remove(i));

                if vec_curs == Some(vec.len()) {
                    vec_curs = None;
                }

                let b = bst_curs.erase().map(|(key, _)| key);

                assert_eq!(v, b);
            }

            CursorOp::EraseMovePrev => {
                let new_v_curs = vec_curs.is_some().then(|| vec_curs_prev(&vec, vec_curs));
                let v = vec_curs.map(|i| vec.remove(i));

                if let Some(vc) = new_v_curs {
                    vec_curs = vc;
                }

                let b = bst_curs.erase_and_move_prev().map(|(key, _)| key);

                assert_eq!(v, b);
            }
        }

        let v = vec_curs.map(|i| &vec[i]);
        let b = bst_curs.get().map(|(key, _)| key);

        assert_eq!(v, b);
    }

    drop(bst_curs);
    bst.assert_invariants();
    assert_eq!(bst.len(), vec.len());
    assert!(bst.keys().eq(vec.iter()));
}
