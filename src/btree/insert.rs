// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Insertion: recursive descent with split-on-the-way-back-up (§4.4).
//!
//! Both leaf and inner splits are implemented by building the combined
//! (old contents + new entry) array and then slicing it at the midpoint,
//! rather than "split first, then shift the remainder". The two are
//! equivalent — the combined-array form just makes it impossible to get
//! the "insertion slot crossed into the new sibling" retargeting wrong,
//! since the midpoint is always chosen *after* the new entry is already
//! logically in place.

use super::cursor::Cursor;
use super::node::{InnerNode, LeafNode, NodeId};
use super::search::{find_lower, find_upper};
use super::tree::BTree;
use super::types::KeyComparator;
use crate::core::config::BTreeTraits;

#[cfg(test)]
#[path = "insert_test.rs"]
mod insert_test;

/// Result of inserting into a subtree rooted at some node.
struct InsertOutcome<K> {
    /// Leaf the key now lives in (for positioning the returned cursor),
    /// valid whether or not `inserted` is true.
    leaf: NodeId,
    slot: usize,
    inserted: bool,
    /// `Some((separator, new_right_sibling))` when the node at this level
    /// split and the caller (one level up) must link the new sibling in.
    split: Option<(K, NodeId)>,
}

impl<K, V, C, Traits, const DUPLICATES: bool> BTree<K, V, C, Traits, DUPLICATES>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
    K: Clone,
    V: Clone,
{
    /// Inserts `(key, value)`. Returns a cursor at the element's position
    /// and whether an insertion actually happened (always `true` for a
    /// `DUPLICATES = true` tree; `false` when `key` already existed in a
    /// unique-key tree, in which case the cursor points at the existing
    /// element and nothing was mutated).
    pub fn insert(&mut self, key: K, value: V) -> (Cursor<'_, K, V, C, Traits, DUPLICATES>, bool) {
        if self.root.is_none() {
            let id = self.arena.alloc_leaf(LeafNode::new());
            self.root = Some(id);
            self.head_leaf = Some(id);
            self.tail_leaf = Some(id);
            self.leaves = 1;
            self.levels = 1;
        }
        let root = self.root.unwrap();
        let outcome = self.insert_recursive(root, key, value);

        if let Some((separator, right)) = outcome.split {
            let mut new_root = InnerNode::new(self.node_level(root) + 1);
            new_root.keys.push(separator);
            new_root.children.push(root);
            new_root.children.push(right);
            let new_root_id = self.arena.alloc_inner(new_root);
            self.root = Some(new_root_id);
            self.inner_nodes += 1;
            self.levels += 1;
        }
        if outcome.inserted {
            self.item_count += 1;
        }
        if Traits::SELFVERIFY {
            self.verify().expect("self-verify: insert violated an invariant");
        }
        (Cursor::new(self, outcome.leaf, outcome.slot), outcome.inserted)
    }

    /// Inserts every `(key, value)` pair from an arbitrary (not
    /// necessarily sorted) source one at a time. `bulk_load` (§4.6) is
    /// the sorted-input fast path; this is the general one (§6.1's
    /// `insert_range`).
    pub fn insert_range<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }

    fn insert_recursive(&mut self, node: NodeId, key: K, value: V) -> InsertOutcome<K> {
        if self.arena.is_leaf(node) {
            self.insert_into_leaf(node, key, value)
        } else {
            self.insert_into_inner(node, key, value)
        }
    }

    fn insert_into_leaf(&mut self, leaf_id: NodeId, key: K, value: V) -> InsertOutcome<K> {
        let insert_slot = if DUPLICATES {
            let l = self.arena.leaf(leaf_id);
            find_upper(&l.keys, &key, &self.compare, Traits::SELFVERIFY)
        } else {
            let l = self.arena.leaf(leaf_id);
            let slot = find_lower(&l.keys, &key, &self.compare, Traits::SELFVERIFY);
            if slot < l.keys.len() && self.compare.equal(&key, &l.keys[slot]) {
                return InsertOutcome { leaf: leaf_id, slot, inserted: false, split: None };
            }
            slot
        };
        self.insert_leaf_at(leaf_id, insert_slot, key, value)
    }

    fn insert_leaf_at(&mut self, leaf_id: NodeId, slot: usize, key: K, value: V) -> InsertOutcome<K> {
        let full = self.arena.leaf(leaf_id).keys.len() >= self.leaf_slots;
        if !full {
            let l = self.arena.leaf_mut(leaf_id);
            l.keys.insert(slot, key);
            l.values.insert(slot, value);
            return InsertOutcome { leaf: leaf_id, slot, inserted: true, split: None };
        }

        let (mut keys, mut values, old_next) = {
            let l = self.arena.leaf(leaf_id);
            (l.keys.clone(), l.values.clone(), l.next)
        };
        keys.insert(slot, key);
        values.insert(slot, value);

        let mid = keys.len() / 2;
        let right_keys = keys.split_off(mid);
        let right_values = values.split_off(mid);

        let mut right = LeafNode::new();
        right.keys = right_keys;
        right.values = right_values;
        right.next = old_next;
        let right_id = self.arena.alloc_leaf(right);

        {
            let l = self.arena.leaf_mut(leaf_id);
            l.keys = keys;
            l.values = values;
            l.next = Some(right_id);
        }
        self.arena.leaf_mut(right_id).prev = Some(leaf_id);
        if let Some(next_id) = old_next {
            self.arena.leaf_mut(next_id).prev = Some(right_id);
        } else {
            self.tail_leaf = Some(right_id);
        }
        self.leaves += 1;

        let separator = self.arena.leaf(leaf_id).keys.last().unwrap().clone();
        let (target_leaf, target_slot) = if slot < mid { (leaf_id, slot) } else { (right_id, slot - mid) };
        InsertOutcome { leaf: target_leaf, slot: target_slot, inserted: true, split: Some((separator, right_id)) }
    }

    fn insert_into_inner(&mut self, node_id: NodeId, key: K, value: V) -> InsertOutcome<K> {
        let slot = {
            let n = self.arena.inner(node_id);
            find_lower(&n.keys, &key, &self.compare, Traits::SELFVERIFY)
        };
        let child = self.arena.inner(node_id).children[slot];
        let child_outcome = self.insert_recursive(child, key, value);

        if !child_outcome.inserted {
            return InsertOutcome { leaf: child_outcome.leaf, slot: child_outcome.slot, inserted: false, split: None };
        }
        let Some((separator, right_child)) = child_outcome.split else {
            return InsertOutcome { leaf: child_outcome.leaf, slot: child_outcome.slot, inserted: true, split: None };
        };

        let full = self.arena.inner(node_id).keys.len() >= self.inner_slots;
        if !full {
            let n = self.arena.inner_mut(node_id);
            n.keys.insert(slot, separator);
            n.children.insert(slot + 1, right_child);
            return InsertOutcome { leaf: child_outcome.leaf, slot: child_outcome.slot, inserted: true, split: None };
        }

        let level = self.arena.inner(node_id).level;
        let (mut keys, mut children) = {
            let n = self.arena.inner(node_id);
            (n.keys.clone(), n.children.clone())
        };
        keys.insert(slot, separator);
        children.insert(slot + 1, right_child);

        let mid = keys.len() / 2;
        let promoted = keys[mid].clone();
        let right_keys = keys.split_off(mid + 1);
        keys.truncate(mid);
        let right_children = children.split_off(mid + 1);

        let mut right = InnerNode::new(level);
        right.keys = right_keys;
        right.children = right_children;
        let right_id = self.arena.alloc_inner(right);

        {
            let n = self.arena.inner_mut(node_id);
            n.keys = keys;
            n.children = children;
        }
        self.inner_nodes += 1;

        InsertOutcome {
            leaf: child_outcome.leaf,
            slot: child_outcome.slot,
            inserted: true,
            split: Some((promoted, right_id)),
        }
    }
}
