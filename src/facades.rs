// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Set, multiset, map and multimap facades over [`BTree`] (§4.10).
//!
//! Each facade fixes the `DUPLICATES` const generic and, for the set
//! variants, the value type: a set stores `()` as its value, so its
//! leaves carry an empty second array rather than a real payload.

use crate::btree::{BTree, Cursor, DefaultComparator, KeyComparator};
use crate::core::config::{BTreeTraits, DefaultTraits};
use crate::error::BTreeResult;

/// An ordered map, unique keys: a second `insert` of an existing key
/// updates its value in place and returns the one it replaced.
pub struct BTreeMap<K, V, C = DefaultComparator, Traits = DefaultTraits>(BTree<K, V, C, Traits, false>)
where
    Traits: BTreeTraits;

/// An ordered map, duplicate keys allowed: every `insert` adds a new
/// element, kept in insertion order among its equal-key run.
pub struct BTreeMultiMap<K, V, C = DefaultComparator, Traits = DefaultTraits>(BTree<K, V, C, Traits, true>)
where
    Traits: BTreeTraits;

/// An ordered set, unique keys.
pub struct BTreeSet<K, C = DefaultComparator, Traits = DefaultTraits>(BTree<K, (), C, Traits, false>)
where
    Traits: BTreeTraits;

/// An ordered set, duplicate keys allowed.
pub struct BTreeMultiSet<K, C = DefaultComparator, Traits = DefaultTraits>(BTree<K, (), C, Traits, true>)
where
    Traits: BTreeTraits;

macro_rules! common_map_api {
    ($ty:ident, $dup:literal) => {
        impl<K, V, C, Traits> $ty<K, V, C, Traits>
        where
            C: KeyComparator<K> + Default,
            Traits: BTreeTraits,
        {
            pub fn new() -> Self {
                $ty(BTree::new())
            }
        }

        impl<K, V, C, Traits> Default for $ty<K, V, C, Traits>
        where
            C: KeyComparator<K> + Default,
            Traits: BTreeTraits,
        {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<K, V, C, Traits> $ty<K, V, C, Traits>
        where
            C: KeyComparator<K>,
            Traits: BTreeTraits,
        {
            pub fn with_comparator(compare: C) -> Self {
                $ty(BTree::with_comparator(compare))
            }

            pub fn len(&self) -> usize {
                self.0.size()
            }

            pub fn is_empty(&self) -> bool {
                self.0.empty()
            }

            pub fn clear(&mut self) {
                self.0.clear()
            }

            pub fn contains_key(&self, key: &K) -> bool {
                self.0.exists(key)
            }

            pub fn get(&self, key: &K) -> Option<&V> {
                self.0.find(key).value()
            }

            pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
                self.0.get_mut(key)
            }

            pub fn stats(&self) -> crate::btree::BTreeStats {
                self.0.stats()
            }

            pub fn verify(&self) -> BTreeResult<()>
            where
                K: Clone,
            {
                self.0.verify()
            }

            pub fn dump(&self) -> BTreeResult<Vec<u8>>
            where
                K: serde::Serialize + Clone,
                V: serde::Serialize + Clone,
            {
                crate::btree::dump(&self.0)
            }

            pub fn iter(&self) -> Cursor<'_, K, V, C, Traits, $dup>
            where
                K: Clone,
                V: Clone,
            {
                self.0.iter()
            }
        }
    };
}

common_map_api!(BTreeMap, false);
common_map_api!(BTreeMultiMap, true);

impl<K, V, C, Traits> BTreeMap<K, V, C, Traits>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
    K: Clone,
    V: Clone,
{
    /// Inserts `(key, value)`. If `key` already existed, its value is
    /// replaced (via [`BTree::get_mut`], not erase+reinsert) and the
    /// replaced value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.0.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.0.insert(key, value);
        None
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.0.erase_one(key)
    }

    pub fn bulk_load(&mut self, items: Vec<(K, V)>) -> BTreeResult<()> {
        self.0.bulk_load(items)
    }
}

impl<K, V, C, Traits> BTreeMultiMap<K, V, C, Traits>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
    K: Clone,
    V: Clone,
{
    /// Always adds a new element, even if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) {
        self.0.insert(key, value);
    }

    pub fn count(&self, key: &K) -> usize {
        self.0.count(key)
    }

    /// Removes one element equal to `key`.
    pub fn remove_one(&mut self, key: &K) -> bool {
        self.0.erase_one(key)
    }

    /// Removes every element equal to `key`, returning how many were
    /// removed.
    pub fn remove_all(&mut self, key: &K) -> usize {
        self.0.erase_all(key)
    }

    pub fn bulk_load(&mut self, items: Vec<(K, V)>) -> BTreeResult<()> {
        self.0.bulk_load(items)
    }
}

macro_rules! common_set_api {
    ($ty:ident, $dup:literal) => {
        impl<K, C, Traits> $ty<K, C, Traits>
        where
            C: KeyComparator<K> + Default,
            Traits: BTreeTraits,
        {
            pub fn new() -> Self {
                $ty(BTree::new())
            }
        }

        impl<K, C, Traits> Default for $ty<K, C, Traits>
        where
            C: KeyComparator<K> + Default,
            Traits: BTreeTraits,
        {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<K, C, Traits> $ty<K, C, Traits>
        where
            C: KeyComparator<K>,
            Traits: BTreeTraits,
        {
            pub fn with_comparator(compare: C) -> Self {
                $ty(BTree::with_comparator(compare))
            }

            pub fn len(&self) -> usize {
                self.0.size()
            }

            pub fn is_empty(&self) -> bool {
                self.0.empty()
            }

            pub fn clear(&mut self) {
                self.0.clear()
            }

            pub fn contains(&self, key: &K) -> bool {
                self.0.exists(key)
            }

            pub fn stats(&self) -> crate::btree::BTreeStats {
                self.0.stats()
            }

            pub fn verify(&self) -> BTreeResult<()>
            where
                K: Clone,
            {
                self.0.verify()
            }

            /// Keys in ascending order. A set has no values worth handing
            /// back, so this yields bare keys rather than `(K, ())` pairs.
            pub fn iter(&self) -> impl Iterator<Item = K> + '_
            where
                K: Clone,
            {
                self.0.iter().map(|(k, _)| k)
            }
        }
    };
}

common_set_api!(BTreeSet, false);
common_set_api!(BTreeMultiSet, true);

impl<K, C, Traits> BTreeSet<K, C, Traits>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
    K: Clone,
{
    pub fn insert(&mut self, key: K) -> bool {
        self.0.insert(key, ()).1
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.0.erase_one(key)
    }

    pub fn bulk_load(&mut self, keys: Vec<K>) -> BTreeResult<()> {
        self.0.bulk_load(keys.into_iter().map(|k| (k, ())).collect())
    }
}

impl<K, C, Traits> BTreeMultiSet<K, C, Traits>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
    K: Clone,
{
    pub fn insert(&mut self, key: K) {
        self.0.insert(key, ());
    }

    pub fn count(&self, key: &K) -> usize {
        self.0.count(key)
    }

    pub fn remove_one(&mut self, key: &K) -> bool {
        self.0.erase_one(key)
    }

    pub fn remove_all(&mut self, key: &K) -> usize {
        self.0.erase_all(key)
    }

    pub fn bulk_load(&mut self, keys: Vec<K>) -> BTreeResult<()> {
        self.0.bulk_load(keys.into_iter().map(|k| (k, ())).collect())
    }
}
