// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The tree handle: construction, the lookup API, and the small
//! whole-tree operations (`clear`, `swap`, `stats`, lexicographic
//! comparison) that don't belong to insert, erase, bulk-load or dump.
//!
//! ## Input
//! A [`KeyComparator`] (defaults to [`DefaultComparator`], i.e. `Ord`) and a
//! [`BTreeTraits`] instantiation picking the target page size and whether
//! self-verification runs after every mutation.
//!
//! ## Output
//! An ordered key -> value container whose iteration order always follows
//! the comparator; `DUPLICATES` (a compile-time flag, mirroring the
//! original's `allow_duplicates` template parameter) decides whether a
//! second insert of an existing key is rejected or appended after its
//! equal-key run.
//!
//! ## Performance
//! Lookups are `O(log n)`; mutations are `O(log n)` amortized (occasional
//! split/merge chains bounded by tree height).

use super::cursor::Cursor;
use super::node::{Arena, NodeId, NodeKind};
use super::types::{DefaultComparator, KeyComparator};
use crate::core::config::{BTreeTraits, DefaultTraits};
use std::marker::PhantomData;

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;

use super::types::BTreeStats;

/// The B+-Tree itself.
///
/// `DUPLICATES` plays the role of the original's compile-time duplicates
/// flag: `false` gives set/map semantics (equal-key insert is rejected),
/// `true` gives multiset/multimap semantics (equal keys are kept in
/// insertion order as distinct elements). The facade types in
/// [`crate::facades`] simply fix this parameter (and `V`) for callers who
/// don't want to spell out the base type.
pub struct BTree<K, V, C = DefaultComparator, Traits = DefaultTraits, const DUPLICATES: bool = false>
where
    Traits: BTreeTraits,
{
    pub(crate) arena: Arena<K, V>,
    pub(crate) root: Option<NodeId>,
    pub(crate) head_leaf: Option<NodeId>,
    pub(crate) tail_leaf: Option<NodeId>,
    pub(crate) item_count: usize,
    pub(crate) leaves: usize,
    pub(crate) inner_nodes: usize,
    pub(crate) levels: usize,
    pub(crate) leaf_slots: usize,
    pub(crate) inner_slots: usize,
    pub(crate) min_leaf: usize,
    pub(crate) min_inner: usize,
    pub(crate) compare: C,
    pub(crate) _traits: PhantomData<Traits>,
}

impl<K, V, C, Traits, const DUPLICATES: bool> BTree<K, V, C, Traits, DUPLICATES>
where
    C: KeyComparator<K> + Default,
    Traits: BTreeTraits,
{
    /// Builds an empty tree using the default comparator (`Ord`) and the
    /// slot counts `Traits::page_config()` derives for `(K, V)`.
    pub fn new() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C, Traits, const DUPLICATES: bool> Default for BTree<K, V, C, Traits, DUPLICATES>
where
    C: KeyComparator<K> + Default,
    Traits: BTreeTraits,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, Traits, const DUPLICATES: bool> BTree<K, V, C, Traits, DUPLICATES>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
{
    /// Builds an empty tree with an explicit comparator, e.g. to get
    /// reverse order without touching `K`'s own `Ord` impl.
    pub fn with_comparator(compare: C) -> Self {
        let page = Traits::page_config();
        let leaf_slots = page.leaf_slots::<K, V>();
        let inner_slots = page.inner_slots::<K>();
        BTree {
            arena: Arena::new(),
            root: None,
            head_leaf: None,
            tail_leaf: None,
            item_count: 0,
            leaves: 0,
            inner_nodes: 0,
            levels: 0,
            leaf_slots,
            inner_slots,
            min_leaf: leaf_slots / 2,
            min_inner: inner_slots / 2,
            compare,
            _traits: PhantomData,
        }
    }

    /// Number of stored elements (for multimaps, each inserted duplicate
    /// counts separately).
    pub fn size(&self) -> usize {
        self.item_count
    }

    pub fn empty(&self) -> bool {
        self.item_count == 0
    }

    /// Upper bound on the number of elements a tree of this key/value size
    /// could theoretically index with a `u32` node handle.
    pub fn max_size(&self) -> usize {
        u32::MAX as usize * self.leaf_slots.max(1)
    }

    pub fn stats(&self) -> BTreeStats {
        BTreeStats {
            items: self.item_count,
            leaves: self.leaves,
            inner_nodes: self.inner_nodes,
            levels: self.levels,
            leaf_slots: self.leaf_slots,
            inner_slots: self.inner_slots,
        }
    }

    /// Removes every element, freeing all nodes. The tree reverts to the
    /// state [`Self::new`] would produce (slot counts and comparator are
    /// untouched).
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.head_leaf = None;
        self.tail_leaf = None;
        self.item_count = 0;
        self.leaves = 0;
        self.inner_nodes = 0;
        self.levels = 0;
    }

    /// Swaps the entire contents (including slot counts and comparator)
    /// of two trees, mirroring `std::btree::swap`. `O(1)`: only the
    /// struct's own fields move, no node is touched.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// `0` for a leaf, `1 + max child level` for an inner node — read
    /// directly off the node rather than recomputed, since every node
    /// carries its own `level` field (§3).
    pub(crate) fn node_level(&self, id: NodeId) -> u16 {
        match self.arena.get(id) {
            NodeKind::Leaf(_) => 0,
            NodeKind::Inner(inner) => inner.level,
        }
    }

    pub fn begin(&self) -> Cursor<'_, K, V, C, Traits, DUPLICATES> {
        match self.head_leaf {
            Some(leaf) => Cursor::new(self, leaf, 0),
            None => self.end(),
        }
    }

    /// The end sentinel: `(tail_leaf, tail_leaf.slot_use)`, or an empty
    /// cursor when the tree has no leaves at all. Per §9's resolved open
    /// question, `begin() == end()` on an empty tree.
    pub fn end(&self) -> Cursor<'_, K, V, C, Traits, DUPLICATES> {
        match self.tail_leaf {
            Some(leaf) => {
                let slot_use = self.arena.leaf(leaf).keys.len();
                Cursor::new(self, leaf, slot_use)
            }
            None => Cursor::empty(self),
        }
    }

    /// Forward iterator over `(key, value)` pairs in ascending order.
    /// [`Cursor`] already implements [`Iterator`]; this is just `begin()`
    /// under a name callers expect from a standard container.
    pub fn iter(&self) -> Cursor<'_, K, V, C, Traits, DUPLICATES> {
        self.begin()
    }

    pub fn rbegin(&self) -> super::cursor::ReverseCursor<'_, K, V, C, Traits, DUPLICATES> {
        super::cursor::ReverseCursor::new(self.end())
    }

    pub fn rend(&self) -> super::cursor::ReverseCursor<'_, K, V, C, Traits, DUPLICATES> {
        super::cursor::ReverseCursor::new(self.begin())
    }

    /// `slot = find_lower(node, key)` at every inner level; returns the
    /// leaf that would hold `key` plus the slot within it.
    pub(crate) fn descend_lower(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut current = self.root?;
        loop {
            match self.arena.get(current) {
                NodeKind::Inner(inner) => {
                    let slot = super::search::find_lower(&inner.keys, key, &self.compare, Traits::SELFVERIFY);
                    current = inner.children[slot];
                }
                NodeKind::Leaf(leaf) => {
                    let slot = super::search::find_lower(&leaf.keys, key, &self.compare, Traits::SELFVERIFY);
                    return Some((current, slot));
                }
            }
        }
    }

    /// Same descent, but using `find_upper` at every level.
    pub(crate) fn descend_upper(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut current = self.root?;
        loop {
            match self.arena.get(current) {
                NodeKind::Inner(inner) => {
                    let slot = super::search::find_upper(&inner.keys, key, &self.compare, Traits::SELFVERIFY);
                    current = inner.children[slot];
                }
                NodeKind::Leaf(leaf) => {
                    let slot = super::search::find_upper(&leaf.keys, key, &self.compare, Traits::SELFVERIFY);
                    return Some((current, slot));
                }
            }
        }
    }

    pub fn exists(&self, key: &K) -> bool {
        self.find(key).is_dereferenceable()
    }

    /// Direct mutable access to the value stored at `key`, for callers
    /// who want to update a value in place without an erase+reinsert
    /// round trip. This, not a `DerefMut` on [`Cursor`], is the
    /// in-place-mutation path described in §9: a cursor only ever
    /// borrows the tree immutably, so it cannot hand out a `&mut`
    /// alongside other live cursors.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (leaf, slot) = self.descend_lower(key)?;
        let found = {
            let l = self.arena.leaf(leaf);
            slot < l.keys.len() && self.compare.equal(key, &l.keys[slot])
        };
        if !found {
            return None;
        }
        Some(&mut self.arena.leaf_mut(leaf).values[slot])
    }

    pub fn find(&self, key: &K) -> Cursor<'_, K, V, C, Traits, DUPLICATES> {
        match self.descend_lower(key) {
            Some((leaf, slot)) => {
                let found = {
                    let l = self.arena.leaf(leaf);
                    slot < l.keys.len() && self.compare.equal(key, &l.keys[slot])
                };
                if found {
                    Cursor::new(self, leaf, slot)
                } else {
                    self.end()
                }
            }
            None => self.end(),
        }
    }

    /// Number of elements equal to `key`. Linear in the size of the
    /// equal-key run (bounded by `item_count`), walking the leaf chain
    /// past leaf boundaries when a run straddles two leaves.
    pub fn count(&self, key: &K) -> usize {
        let Some((mut leaf, mut slot)) = self.descend_lower(key) else {
            return 0;
        };
        let mut n = 0usize;
        loop {
            let (next, keys_len) = {
                let l = self.arena.leaf(leaf);
                if slot >= l.keys.len() || !self.compare.equal(key, &l.keys[slot]) {
                    return n;
                }
                n += 1;
                (l.next, l.keys.len())
            };
            slot += 1;
            if slot >= keys_len {
                match next {
                    Some(next_leaf) => {
                        leaf = next_leaf;
                        slot = 0;
                    }
                    None => return n,
                }
            }
        }
    }

    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, V, C, Traits, DUPLICATES> {
        match self.descend_lower(key) {
            Some((leaf, slot)) => Cursor::new(self, leaf, slot),
            None => self.end(),
        }
    }

    pub fn upper_bound(&self, key: &K) -> Cursor<'_, K, V, C, Traits, DUPLICATES> {
        match self.descend_upper(key) {
            Some((leaf, slot)) => Cursor::new(self, leaf, slot),
            None => self.end(),
        }
    }

    pub fn equal_range(
        &self,
        key: &K,
    ) -> (Cursor<'_, K, V, C, Traits, DUPLICATES>, Cursor<'_, K, V, C, Traits, DUPLICATES>) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Lexicographic comparison of two trees by iterating both in
    /// lock-step, the same relation `PartialOrd`/`PartialEq` expose on the
    /// facade types (§6.1).
    pub fn lexicographic_cmp(&self, other: &Self) -> std::cmp::Ordering
    where
        K: Ord,
        V: Ord,
    {
        let mut a = self.begin();
        let mut b = other.begin();
        loop {
            match (a.is_dereferenceable(), b.is_dereferenceable()) {
                (false, false) => return std::cmp::Ordering::Equal,
                (false, true) => return std::cmp::Ordering::Less,
                (true, false) => return std::cmp::Ordering::Greater,
                (true, true) => {
                    let ak = a.key().unwrap();
                    let bk = b.key().unwrap();
                    match ak.cmp(bk) {
                        std::cmp::Ordering::Equal => {
                            let av = a.value().unwrap();
                            let bv = b.value().unwrap();
                            match av.cmp(bv) {
                                std::cmp::Ordering::Equal => {}
                                ord => return ord,
                            }
                        }
                        ord => return ord,
                    }
                }
            }
            a.advance();
            b.advance();
        }
    }
}

/// Lock-step lexicographic comparison (§6.1: "Comparison operators on
/// whole trees implement lexicographic ordering using iterator pairs").
/// Delegates to [`BTree::lexicographic_cmp`], which is also usable
/// directly when `K`/`V` don't satisfy these bounds (e.g. `V` without
/// `Ord`, where a full ordering can't be determined at all).
impl<K, V, C, Traits, const DUPLICATES: bool> PartialEq for BTree<K, V, C, Traits, DUPLICATES>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
    K: Ord,
    V: Ord,
{
    fn eq(&self, other: &Self) -> bool {
        self.lexicographic_cmp(other) == std::cmp::Ordering::Equal
    }
}

impl<K, V, C, Traits, const DUPLICATES: bool> PartialOrd for BTree<K, V, C, Traits, DUPLICATES>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
    K: Ord,
    V: Ord,
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.lexicographic_cmp(other))
    }
}
