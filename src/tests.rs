use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn insert_find_all(keys: &[u32]) {
    let mut map: BstMap<u32, u32> = BstMap::new();

    for &key in keys {
        *map.at_or_insert(key) = key * 10;
        map.assert_invariants();
    }

    for key in keys {
        let curs = map.find(key);
        assert_eq!(curs.get(), Some((key, &(key * 10))));
    }

    assert_eq!(map.len(), keys.len());
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

// Every ordering of `0..n`, generated by Heap's algorithm.
fn permutations(n: u32) -> Vec<Vec<u32>> {
    fn heap(k: usize, keys: &mut [u32], out: &mut Vec<Vec<u32>>) {
        if k <= 1 {
            out.push(keys.to_vec());
            return;
        }

        for i in 0..k - 1 {
            heap(k - 1, keys, out);
            if k % 2 == 0 {
                keys.swap(i, k - 1);
            } else {
                keys.swap(0, k - 1);
            }
        }
        heap(k - 1, keys, out);
    }

    let mut keys: Vec<u32> = (0..n).collect();
    let mut out = Vec::new();
    heap(keys.len(), &mut keys, &mut out);
    out
}

#[test]
fn four_elems_find() {
    let all = permutations(4);
    assert_eq!(all.len(), 24);

    for keys in all {
        insert_find_all(&keys);
    }
}

fn insert_remove_all(keys: &[u32]) {
    let mut map: BstMap<u32, u32> = BstMap::new();

    for &key in keys {
        map.insert(key, key);
        map.assert_invariants();
    }

    for (removed, key) in keys.iter().enumerate() {
        assert_eq!(map.find_mut(key).erase(), Some((*key, *key)));
        map.assert_invariants();
        assert!(map.find(key).is_end());
        assert_eq!(map.len(), keys.len() - removed - 1);

        for rest in &keys[removed + 1..] {
            assert_eq!(map.get(rest), Some(rest));
        }
    }

    for &key in keys {
        map.insert(key, key);
        map.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(map.remove(key), Some(*key));
        map.assert_invariants();
    }

    assert!(map.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    for keys in permutations(3) {
        insert_remove_all(&keys);
    }
}

#[test]
fn remove_four() {
    for keys in permutations(4) {
        insert_remove_all(&keys);
    }
}

#[test]
fn remove_five() {
    for keys in permutations(5) {
        insert_remove_all(&keys);
    }
}

#[test]
fn concrete_insert_and_erase_scenario() {
    let mut map: BstMap<u32, &str> = BstMap::new();
    for (key, value) in [(5, "e"), (3, "c"), (8, "h"), (1, "a"), (4, "d")] {
        *map.at_or_insert(key) = value;
    }

    let entries: Vec<(u32, &str)> = map.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(entries, [(1, "a"), (3, "c"), (4, "d"), (5, "e"), (8, "h")]);

    let mut curs = map.find_mut(&3);
    assert_eq!(curs.erase(), Some((3, "c")));
    // The cursor moved on to the erased entry's successor.
    assert_eq!(curs.get(), Some((&4, &"d")));

    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 4, 5, 8]);
    assert_eq!(map.len(), 4);
    assert!(map.find(&3) == map.end());
    map.assert_invariants();
}

#[test]
fn empty_map() {
    let map: BstMap<u32, u32> = BstMap::new();

    assert!(map.begin() == map.end());
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.height(), None);
    assert!(map.find(&7).is_end());
    assert_eq!(map.first_key_value(), None);
    assert_eq!(map.last_key_value(), None);
    map.assert_invariants();
}

#[test]
fn erase_end_is_noop() {
    let mut map: BstMap<u32, u32> = [(1, 1), (2, 2)].into_iter().collect();

    let mut end = map.end_mut();
    assert_eq!(end.erase(), None);
    assert!(end.is_end());
    assert_eq!(map.len(), 2);

    assert_eq!(map.find_mut(&9).erase(), None);
    assert_eq!(map.remove(&9), None);
    assert_eq!(map.len(), 2);
}

#[test]
fn repeated_access_keeps_slot() {
    let mut map: BstMap<&str, Vec<u32>> = BstMap::new();

    map.at_or_insert("a").push(1);
    assert_eq!(map.len(), 1);

    map.at_or_insert("a").push(2);
    assert_eq!(map.len(), 1);
    assert_eq!(map["a"], [1, 2]);
}

#[test]
fn insert_replaces_value() {
    let mut map = BstMap::new();

    assert_eq!(map.insert(1, "one"), None);
    assert_eq!(map.insert(1, "uno"), Some("one"));
    assert_eq!(map.get(&1), Some(&"uno"));
    assert_eq!(map.len(), 1);
}

#[test]
fn copy_is_independent() {
    let mut a: BstMap<u32, String> = BstMap::new();
    for key in [4, 2, 6, 1, 3] {
        *a.at_or_insert(key) = key.to_string();
    }

    let mut b = a.clone();
    b.assert_invariants();

    a.at_or_insert(2).push('!');
    assert_eq!(b.find(&2).value().map(String::as_str), Some("2"));

    *b.at_or_insert(6) = "six".into();
    assert_eq!(a.get(&6).map(String::as_str), Some("6"));

    a.remove(&4);
    assert!(b.contains_key(&4));
    assert_eq!(b.len(), 5);

    let mut c = BstMap::new();
    c.insert(100, "stale".to_string());
    c.clone_from(&b);
    assert_eq!(c, b);
    assert!(!c.contains_key(&100));
}

#[test]
fn move_empties_source() {
    let mut a: BstMap<u32, u32> = (0..10).map(|k| (k, k * k)).collect();
    let before: Vec<(u32, u32)> = a.iter().map(|(&k, &v)| (k, v)).collect();

    let b = std::mem::take(&mut a);
    assert_eq!(a.len(), 0);
    assert!(a.is_empty());
    assert!(a.begin() == a.end());
    assert_eq!(b.into_iter().collect::<Vec<_>>(), before);

    let mut c: BstMap<u32, u32> = [(1, 1)].into_iter().collect();
    let d = c.take();
    assert!(c.is_empty());
    assert_eq!(d.len(), 1);
}

#[test]
fn cursor_walks_both_directions() {
    let map: BstMap<u32, ()> = [7, 3, 9, 1, 5, 8, 10].into_iter().map(|k| (k, ())).collect();

    let mut curs = map.begin();
    let mut forward = Vec::new();
    while let Some(key) = curs.key() {
        forward.push(*key);
        curs.move_next();
    }
    assert_eq!(forward, [1, 3, 5, 7, 8, 9, 10]);

    // Incrementing the end cursor does nothing.
    curs.move_next();
    assert!(curs.is_end());

    let mut backward = Vec::new();
    curs.move_prev();
    while let Some(key) = curs.key() {
        backward.push(*key);
        curs.move_prev();
    }
    assert_eq!(backward, [10, 9, 8, 7, 5, 3, 1]);
    assert!(curs == map.end());
}

#[test]
fn cursor_peeks() {
    let map: BstMap<u32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();

    let curs = map.find(&2);
    assert_eq!(curs.peek_next(), Some((&3, &'c')));
    assert_eq!(curs.peek_prev(), Some((&1, &'a')));

    let end = map.end();
    assert_eq!(end.peek_next(), None);
    assert_eq!(end.peek_prev(), Some((&3, &'c')));
}

#[test]
fn cursor_mut_edits_values() {
    let mut map: BstMap<u32, u32> = (1..=5).map(|k| (k, 0)).collect();

    let mut curs = map.begin_mut();
    while let Some((key, value)) = curs.get_mut() {
        *value = key * 2;
        curs.move_next();
    }

    assert_eq!(map.values().copied().collect::<Vec<_>>(), [2, 4, 6, 8, 10]);

    if let Some(value) = map.find_mut(&3).into_value_mut() {
        *value = 33;
    }
    assert_eq!(map[&3], 33);
}

#[test]
fn cursor_erase_and_move_prev() {
    let mut map: BstMap<u32, ()> = [2, 1, 3].into_iter().map(|k| (k, ())).collect();

    let mut curs = map.find_mut(&2);
    assert_eq!(curs.erase_and_move_prev(), Some((2, ())));
    assert_eq!(curs.get(), Some((&1, &())));

    assert_eq!(curs.erase_and_move_prev(), Some((1, ())));
    assert!(curs.is_end());

    map.assert_invariants();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3]);
}

#[test]
fn erase_everything_through_one_cursor() {
    let mut map: BstMap<u32, u32> = [50, 30, 70, 20, 40, 60, 80, 35, 45, 65]
        .into_iter()
        .map(|k| (k, k))
        .collect();

    let mut curs = map.begin_mut();
    let mut erased = Vec::new();
    while let Some((key, _)) = curs.erase() {
        erased.push(key);
    }

    assert_eq!(erased, [20, 30, 35, 40, 45, 50, 60, 65, 70, 80]);
    assert!(map.is_empty());
    map.assert_invariants();
}

#[test]
fn iterators_agree() {
    let mut map: BstMap<i32, i32> = [(3, 30), (-1, -10), (8, 80), (0, 0)].into_iter().collect();

    assert_eq!(map.iter().len(), 4);
    assert_eq!(map.keys().rev().copied().collect::<Vec<_>>(), [8, 3, 0, -1]);

    for (_, value) in map.iter_mut() {
        *value += 1;
    }
    for value in map.values_mut().rev() {
        *value *= 2;
    }

    let mut both_ends = map.iter();
    assert_eq!(both_ends.next(), Some((&-1, &-18)));
    assert_eq!(both_ends.next_back(), Some((&8, &162)));
    assert_eq!(both_ends.len(), 2);
    assert_eq!(both_ends.next(), Some((&0, &2)));
    assert_eq!(both_ends.next_back(), Some((&3, &62)));
    assert_eq!(both_ends.next(), None);
    assert_eq!(both_ends.next_back(), None);

    let borrowed: Vec<i32> = (&map).into_iter().map(|(k, _)| *k).collect();
    assert_eq!(borrowed, [-1, 0, 3, 8]);

    let owned: Vec<(i32, i32)> = map.into_iter().rev().collect();
    assert_eq!(owned, [(8, 162), (3, 62), (0, 2), (-1, -18)]);
}

#[test]
fn debug_formats_as_map() {
    let map: BstMap<u32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
    assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
}

#[test]
fn clear_resets() {
    let mut map: BstMap<u32, u32> = (0..20).map(|k| (k, k)).collect();
    map.clear();

    assert!(map.is_empty());
    assert_eq!(map.iter().next(), None);

    map.insert(5, 5);
    assert_eq!(map.len(), 1);
    map.assert_invariants();
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map: BstMap<u32, u32> = BstMap::new();
    let _ = map[&1];
}

#[test]
fn sanity_check_accepts_valid_trees() {
    let mut map: BstMap<u32, u32> = BstMap::new();
    assert_eq!(map.sanity_check(), Ok(()));

    for key in [10, 5, 15, 3, 7, 12, 20, 6, 8] {
        map.insert(key, key);
        assert_eq!(map.sanity_check(), Ok(()));
    }

    map.remove(&5);
    map.remove(&10);
    assert_eq!(map.sanity_check(), Ok(()));
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }

    #[test]
    fn cursor_equivalence(
        values in proptest::collection::vec(0u32..500, 0..100),
        ops in proptest::collection::vec(model::cursor_op_strategy(), FUZZ_RANGE),
    ) {
        model::run_cursor_equivalence(values, ops);
    }

    #[test]
    fn in_order_walk_is_sorted(keys in proptest::collection::vec(any::<i64>(), 0..200)) {
        let map: BstMap<i64, ()> = keys.iter().map(|&k| (k, ())).collect();

        let mut curs = map.begin();
        let mut prev = None;
        while let Some(key) = curs.key() {
            prop_assert!(prev < Some(key));
            prev = Some(key);
            curs.move_next();
        }
    }

    #[test]
    fn erase_removes_exactly_one_key(
        keys in proptest::collection::btree_set(0u32..1000, 1..100),
        pick in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<u32> = keys.into_iter().collect();
        let mut map: BstMap<u32, u32> = keys.iter().map(|&k| (k, k + 1)).collect();
        let victim = keys[pick.index(keys.len())];

        prop_assert!(map.find_mut(&victim).erase().is_some());
        prop_assert!(map.find(&victim) == map.end());
        prop_assert_eq!(map.len(), keys.len() - 1);
        for &key in keys.iter().filter(|&&k| k != victim) {
            prop_assert_eq!(map.get(&key), Some(&(key + 1)));
        }
        prop_assert_eq!(map.sanity_check(), Ok(()));
    }
}
