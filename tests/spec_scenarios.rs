// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Concrete end-to-end scenarios a unit test inside `src/` can't express
//! cleanly: fixed small slot counts to force splits/merges at predictable
//! sizes, deterministic pseudo-random key sequences, and a full
//! dump/restore round trip through a real byte buffer.

use bptree::core::config::PageConfig;
use bptree::{BTree, BTreeTraits, DefaultComparator};
use rand::Rng;
use rand::SeedableRng;

/// `S_l = S_i = 8` for `i32` keys and values: `target_page_size = 64`
/// makes both `leaf_slots` (`64 / (4 + 4)`) and `inner_slots`
/// (`64 / (4 + 4)`, the child handle being a 4-byte `NodeId`) come out to
/// exactly 8.
struct Slots8;

impl BTreeTraits for Slots8 {
    const SELFVERIFY: bool = true;

    fn page_config() -> PageConfig {
        PageConfig::new(64)
    }
}

/// `S_l = S_i = 4`, for the underflow stress scenario: `target_page_size
/// = 32` halves both slot counts from [`Slots8`].
struct Slots4;

impl BTreeTraits for Slots4 {
    const SELFVERIFY: bool = true;

    fn page_config() -> PageConfig {
        PageConfig::new(32)
    }
}

fn seeded_keys(seed: u64, count: usize, modulus: i32) -> Vec<i32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..modulus)).collect()
}

#[test]
fn scenario_1_ordered_insert_and_iteration() {
    type T = BTree<i32, i32, DefaultComparator, Slots8, false>;
    let mut t = T::new();
    let keys = [10, 20, 30, 40, 50, 60, 70, 80, 90, 15, 25, 35, 45, 55, 65, 75, 85, 95];
    for &k in &keys {
        t.insert(k, k);
    }

    assert_eq!(t.size(), 18);
    let iterated: Vec<i32> = t.iter().map(|(k, _)| k).collect();
    let mut expected = keys.to_vec();
    expected.sort();
    assert_eq!(iterated, expected);
    assert_eq!(t.stats().levels, 2);
    assert!(t.verify().is_ok());
}

#[test]
fn scenario_2_multimap_insert_then_erase_one_by_one() {
    type T = BTree<i32, i32, DefaultComparator, Slots8, true>;
    let mut t = T::new();
    let keys = seeded_keys(34234235, 320, 100);

    for &k in &keys {
        t.insert(k, k);
    }
    assert_eq!(t.size(), 320);
    assert!(t.verify().is_ok());

    for (i, &k) in keys.iter().enumerate() {
        let before = t.size();
        assert!(t.erase_one(&k));
        assert_eq!(t.size(), before - 1);
        assert_eq!(t.size(), 320 - i - 1);
    }
    assert!(t.empty());
}

#[test]
fn scenario_3_bulk_load_of_one_thousand_squares() {
    type T = BTree<i64, i64, DefaultComparator, Slots8, false>;
    let mut t = T::new();
    let items: Vec<(i64, i64)> = (1..=1000).map(|i| (i, i * i)).collect();
    t.bulk_load(items).unwrap();

    assert_eq!(t.size(), 1000);
    assert!(t.verify().is_ok());

    let cursor = t.lower_bound(&500);
    assert_eq!(cursor.key(), Some(&500));

    let forward: Vec<i64> = t.lower_bound(&500).map(|(k, _)| k).collect();
    let expected: Vec<i64> = (500..=1000).collect();
    assert_eq!(forward, expected);
}

#[test]
fn scenario_4_dump_restore_round_trip_and_cross_instantiation_failure() {
    type T = BTree<i32, i32, DefaultComparator, Slots8, true>;
    let mut t = T::new();
    let keys = seeded_keys(34234235, 3200, 100);
    for &k in &keys {
        t.insert(k, k);
    }
    assert_eq!(t.size(), 3200);

    let bytes = bptree::btree::dump(&t).unwrap();
    let restored: T = bptree::btree::restore(&bytes).unwrap();
    assert_eq!(restored.size(), 3200);
    for &k in &keys {
        assert!(restored.exists(&k));
    }

    // A different value size (i64 vs i32) must be rejected cleanly.
    let cross = bptree::btree::restore::<i32, i64, DefaultComparator, Slots8, true>(&bytes);
    assert!(cross.is_err());
}

#[test]
fn scenario_5_six_way_erase_stress_with_small_slots() {
    type T = BTree<i32, i32, DefaultComparator, Slots4, false>;
    let mut t = T::new();

    // Build and tear down across several overlapping ranges so that
    // shifts from both sides, same-parent merges, and root collapse all
    // occur at a slot count small enough (4) to make them frequent.
    for i in 0..300 {
        t.insert(i, i);
        assert!(t.verify().is_ok());
    }
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xbadc0de);
    let mut remaining: Vec<i32> = (0..300).collect();
    while !remaining.is_empty() {
        let idx = rng.gen_range(0..remaining.len());
        let key = remaining.swap_remove(idx);
        assert!(t.erase_one(&key));
        assert!(t.verify().is_ok());
    }
    assert!(t.empty());
}

#[test]
fn scenario_6_forward_and_reverse_iterator_semantics() {
    type T = BTree<i32, i32, DefaultComparator, Slots8, false>;
    let mut t = T::new();
    for i in 0..=999 {
        t.insert(i, i);
    }

    let forward: Vec<i32> = t.iter().map(|(k, _)| k).collect();
    assert_eq!(forward, (0..=999).collect::<Vec<_>>());

    let mut reverse: Vec<i32> = t.rbegin().map(|(k, _)| k).collect();
    assert_eq!(reverse.len(), 1000);
    reverse.reverse();
    assert_eq!(reverse, forward);

    let mut end_cursor = t.end();
    end_cursor.retreat();
    assert_eq!(end_cursor.key(), Some(&999));

    let mut past_end = t.end();
    past_end.advance();
    assert_eq!(past_end, t.end());
}
