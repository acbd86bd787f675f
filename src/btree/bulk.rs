// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Bulk-load (§4.6): build a tree directly from a sorted sequence, with
//! no split/merge rebalancing at all.
//!
//! Leaves are packed left-to-right, each exactly `leaf_slots` full except
//! possibly the last, and chained as they're produced. Then each
//! subsequent level groups the level below into nodes of `inner_slots + 1`
//! children, using the recorded last key of every child but the final
//! one in each group as its separator, until a level contains a single
//! node: the new root. The result is already maximally packed and
//! satisfies every invariant without a single call into `insert`.

use super::node::{Arena, InnerNode, LeafNode, NodeId};
use super::tree::BTree;
use super::types::KeyComparator;
use crate::core::config::BTreeTraits;
use crate::error::{BTreeError, BTreeResult};

#[cfg(test)]
#[path = "bulk_test.rs"]
mod bulk_test;

impl<K, V, C, Traits, const DUPLICATES: bool> BTree<K, V, C, Traits, DUPLICATES>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
    K: Clone,
    V: Clone,
{
    /// Replaces the tree's contents with `items`, built directly rather
    /// than through repeated `insert` calls. `items` must already be
    /// sorted ascending by key (non-decreasing when `DUPLICATES` is
    /// true); returns [`BTreeError::UnsortedBulkInput`] naming the first
    /// out-of-order index otherwise, leaving the tree unchanged.
    pub fn bulk_load(&mut self, items: Vec<(K, V)>) -> BTreeResult<()> {
        if let Some(at) = self.first_unsorted(&items) {
            return Err(BTreeError::UnsortedBulkInput { at_index: at });
        }

        let mut arena = Arena::new();
        let item_count = items.len();

        if items.is_empty() {
            self.arena = arena;
            self.root = None;
            self.head_leaf = None;
            self.tail_leaf = None;
            self.item_count = 0;
            self.leaves = 0;
            self.inner_nodes = 0;
            self.levels = 0;
            return Ok(());
        }

        // Level 0: pack leaves, each full except possibly the last.
        let mut leaf_ids = Vec::new();
        let mut separators: Vec<K> = Vec::new();
        let mut remaining = items;
        let mut prev_leaf: Option<NodeId> = None;
        while !remaining.is_empty() {
            let take = remaining.len().min(self.leaf_slots);
            let rest = remaining.split_off(take);
            let chunk = std::mem::replace(&mut remaining, rest);
            let (keys, values): (Vec<K>, Vec<V>) = chunk.into_iter().unzip();
            separators.push(keys.last().unwrap().clone());
            let mut leaf = LeafNode::new();
            leaf.keys = keys;
            leaf.values = values;
            leaf.prev = prev_leaf;
            let id = arena.alloc_leaf(leaf);
            if let Some(prev) = prev_leaf {
                arena.leaf_mut(prev).next = Some(id);
            }
            prev_leaf = Some(id);
            leaf_ids.push(id);
        }
        let head_leaf = leaf_ids[0];
        let tail_leaf = *leaf_ids.last().unwrap();
        let leaf_count = leaf_ids.len();

        // Levels 1..: group the level below into inner nodes of up to
        // `inner_slots + 1` children, one level at a time, until a
        // single node remains.
        let mut level_nodes: Vec<NodeId> = leaf_ids;
        let mut level_separators = separators;
        let mut level: u16 = 0;
        let mut inner_count = 0usize;
        while level_nodes.len() > 1 {
            level += 1;
            let group_size = self.inner_slots + 1;
            let mut next_nodes = Vec::new();
            let mut next_separators = Vec::new();

            // Distribute children across groups as evenly as possible
            // rather than packing each group to `group_size` and leaving
            // the remainder in an undersized final group: a trailing
            // group of size 1 would violate min_inner.
            let n = level_nodes.len();
            let num_groups = n.div_ceil(group_size);
            let base = n / num_groups;
            let extra = n % num_groups;

            let mut idx = 0;
            for g in 0..num_groups {
                let this_size = base + if g < extra { 1 } else { 0 };
                let end = idx + this_size;
                let children: Vec<NodeId> = level_nodes[idx..end].to_vec();
                // separators for this group: the recorded last key of
                // every child but the final one in the group.
                let keys: Vec<K> = level_separators[idx..end - 1].to_vec();
                let group_max = level_separators[end - 1].clone();

                let mut node = InnerNode::new(level);
                node.keys = keys;
                node.children = children;
                let id = arena.alloc_inner(node);
                inner_count += 1;
                next_nodes.push(id);
                next_separators.push(group_max);
                idx = end;
            }
            level_nodes = next_nodes;
            level_separators = next_separators;
        }

        let root = level_nodes[0];

        self.arena = arena;
        self.root = Some(root);
        self.head_leaf = Some(head_leaf);
        self.tail_leaf = Some(tail_leaf);
        self.item_count = item_count;
        self.leaves = leaf_count;
        self.inner_nodes = inner_count;
        self.levels = (level as usize) + 1;

        if Traits::SELFVERIFY {
            self.verify().expect("self-verify: bulk_load produced an invalid tree");
        }
        Ok(())
    }

    fn first_unsorted(&self, items: &[(K, V)]) -> Option<usize> {
        for i in 1..items.len() {
            let (prev, cur) = (&items[i - 1].0, &items[i].0);
            let ok = if DUPLICATES { self.compare.less_equal(prev, cur) } else { self.compare.less(prev, cur) };
            if !ok {
                return Some(i);
            }
        }
        None
    }
}
