// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Invariant verifier (§4.8).
//!
//! Walks the whole tree once, checking every invariant from §3: sorted
//! keys within a node, `children.len() == keys.len() + 1` for inner
//! nodes, separator keys matching each child's actual maximum, min-fill
//! everywhere but the root, uniform leaf depth, and a leaf chain whose
//! `prev`/`next` links agree with the in-order traversal and whose total
//! length matches the cached counters. Used both by `Traits::SELFVERIFY`
//! (after every mutation, in debug-style builds) and as a public API for
//! callers who restored a dump from an untrusted source.

use super::node::NodeId;
use super::tree::BTree;
use super::types::KeyComparator;
use crate::core::config::BTreeTraits;
use crate::error::{BTreeError, BTreeResult};

#[cfg(test)]
#[path = "verify_test.rs"]
mod verify_test;

impl<K, V, C, Traits, const DUPLICATES: bool> BTree<K, V, C, Traits, DUPLICATES>
where
    C: KeyComparator<K>,
    Traits: BTreeTraits,
{
    /// Checks every structural invariant, returning `Err(CorruptedTree)`
    /// with a description of the first violation found.
    pub fn verify(&self) -> BTreeResult<()>
    where
        K: Clone,
    {
        let Some(root) = self.root else {
            return self.verify_empty();
        };

        let mut leaf_count = 0usize;
        let mut inner_count = 0usize;
        let mut item_count = 0usize;
        let mut leaf_depth: Option<usize> = None;

        self.verify_node(root, true, 0, &mut leaf_count, &mut inner_count, &mut item_count, &mut leaf_depth)?;

        if item_count != self.item_count {
            return corrupt(format!(
                "cached item_count {} does not match {item_count} items actually reachable",
                self.item_count
            ));
        }
        if leaf_count != self.leaves {
            return corrupt(format!("cached leaves {} does not match {leaf_count} leaves walked", self.leaves));
        }
        if inner_count != self.inner_nodes {
            return corrupt(format!(
                "cached inner_nodes {} does not match {inner_count} inner nodes walked",
                self.inner_nodes
            ));
        }

        self.verify_leaf_chain(leaf_count)?;
        Ok(())
    }

    fn verify_empty(&self) -> BTreeResult<()> {
        if self.item_count != 0 || self.leaves != 0 || self.inner_nodes != 0 {
            return corrupt("root is absent but a counter is nonzero".to_string());
        }
        if self.head_leaf.is_some() || self.tail_leaf.is_some() {
            return corrupt("root is absent but head_leaf/tail_leaf is set".to_string());
        }
        Ok(())
    }

    /// Returns the `(min, max)` key of the subtree rooted at `node`, or
    /// `None` if it's empty (which is itself a violation for any non-root
    /// node, caught by the caller).
    #[allow(clippy::too_many_arguments)]
    fn verify_node(
        &self,
        node: NodeId,
        is_root: bool,
        depth: usize,
        leaf_count: &mut usize,
        inner_count: &mut usize,
        item_count: &mut usize,
        leaf_depth: &mut Option<usize>,
    ) -> BTreeResult<Option<(K, K)>>
    where
        K: Clone,
    {
        if self.arena.is_leaf(node) {
            let l = self.arena.leaf(node);
            *leaf_count += 1;
            *item_count += l.keys.len();

            if !is_root && l.keys.len() < self.min_leaf {
                return corrupt(format!("leaf {node:?} underflows min_leaf={}: has {}", self.min_leaf, l.keys.len()));
            }
            if l.keys.len() > self.leaf_slots {
                return corrupt(format!("leaf {node:?} overflows leaf_slots={}: has {}", self.leaf_slots, l.keys.len()));
            }
            if !is_sorted::<K, C, DUPLICATES>(&l.keys, &self.compare) {
                return corrupt(format!("leaf {node:?} keys are not sorted ascending"));
            }
            match leaf_depth {
                Some(d) if *d != depth => {
                    return corrupt(format!("leaf {node:?} is at depth {depth}, expected {d} (unbalanced tree)"));
                }
                None => *leaf_depth = Some(depth),
                _ => {}
            }
            return Ok(l.keys.first().cloned().zip(l.keys.last().cloned()));
        }

        let (keys_len, children_len, level) = {
            let n = self.arena.inner(node);
            (n.keys.len(), n.children.len(), n.level)
        };
        *inner_count += 1;

        if children_len != keys_len + 1 {
            return corrupt(format!(
                "inner node {node:?} has {children_len} children but {keys_len} keys (expected children = keys + 1)"
            ));
        }
        if !is_root && children_len < self.min_inner {
            return corrupt(format!("inner node {node:?} underflows min_inner={}: has {children_len}", self.min_inner));
        }
        if children_len > self.inner_slots {
            return corrupt(format!("inner node {node:?} overflows inner_slots={}: has {children_len}", self.inner_slots));
        }
        if !is_sorted::<K, C, DUPLICATES>(&self.arena.inner(node).keys, &self.compare) {
            return corrupt(format!("inner node {node:?} keys are not sorted ascending"));
        }

        let children: Vec<NodeId> = self.arena.inner(node).children.clone();
        let keys: Vec<K> = self.arena.inner(node).keys.clone();
        let mut subtree_min: Option<K> = None;
        let mut last_max: Option<K> = None;
        for (i, &child) in children.iter().enumerate() {
            if !self.arena.is_leaf(child) {
                let child_level = self.arena.inner(child).level;
                if child_level + 1 != level {
                    return corrupt(format!(
                        "inner node {node:?} at level {level} has child {child:?} at level {child_level}"
                    ));
                }
            }
            let child_bounds = self.verify_node(child, false, depth + 1, leaf_count, inner_count, item_count, leaf_depth)?;
            let Some((child_min, child_max)) = child_bounds else {
                return corrupt(format!("child {child:?} of {node:?} is empty"));
            };

            // §4.8 / §8 testable property 3: every child but the first
            // must have a minimum key that is >= (strictly > for
            // unique-key trees) the separator immediately to its left —
            // catches entries misrouted below where they belong even
            // when the child's own keys are internally sorted and its
            // max matches the separator to its right.
            if i > 0 {
                let preceding = &keys[i - 1];
                let violates = if DUPLICATES {
                    self.compare.less(&child_min, preceding)
                } else {
                    self.compare.less_equal(&child_min, preceding)
                };
                if violates {
                    return corrupt(format!(
                        "inner node {node:?}: child {child:?}'s minimum key is not past separator at slot {}",
                        i - 1
                    ));
                }
            }
            if i < keys.len() {
                if !self.compare.equal(&child_max, &keys[i]) {
                    return corrupt(format!(
                        "inner node {node:?} separator at slot {i} does not match child {child:?}'s actual max"
                    ));
                }
            }
            if i == 0 {
                subtree_min = Some(child_min);
            }
            last_max = Some(child_max);
        }
        Ok(subtree_min.zip(last_max))
    }

    /// Walks `head_leaf -> next -> ... -> tail_leaf`, checking that the
    /// `prev` links agree with `next` and that the chain visits exactly
    /// `expected_leaves` leaves in strictly ascending key order.
    fn verify_leaf_chain(&self, expected_leaves: usize) -> BTreeResult<()>
    where
        K: Clone,
    {
        let Some(head) = self.head_leaf else {
            return if expected_leaves == 0 {
                Ok(())
            } else {
                corrupt("head_leaf is None but leaves were found during descent".to_string())
            };
        };

        let mut seen = 0usize;
        let mut current = head;
        let mut prev_id: Option<NodeId> = None;
        let mut running_max: Option<K> = None;
        loop {
            let l = self.arena.leaf(current);
            if l.prev != prev_id {
                return corrupt(format!("leaf {current:?}.prev does not match the chain's actual predecessor"));
            }
            if let (Some(max), Some(first)) = (&running_max, l.keys.first()) {
                let violates = if DUPLICATES { self.compare.greater(max, first) } else { self.compare.greater_equal(max, first) };
                if violates {
                    return corrupt("leaf chain is not ascending across a leaf boundary".to_string());
                }
            }
            running_max = l.keys.last().cloned().or(running_max);
            seen += 1;
            prev_id = Some(current);
            match l.next {
                Some(next) => current = next,
                None => break,
            }
        }

        if seen != expected_leaves {
            return corrupt(format!("leaf chain visits {seen} leaves but the tree has {expected_leaves}"));
        }
        match self.tail_leaf {
            Some(tail) if tail == current => {}
            _ => return corrupt("tail_leaf does not match the chain's actual last leaf".to_string()),
        }
        Ok(())
    }
}

fn is_sorted<K, C: KeyComparator<K>, const DUPLICATES: bool>(keys: &[K], cmp: &C) -> bool {
    if DUPLICATES {
        keys.windows(2).all(|w| cmp.less_equal(&w[0], &w[1]))
    } else {
        keys.windows(2).all(|w| cmp.less(&w[0], &w[1]))
    }
}

fn corrupt<T>(reason: String) -> BTreeResult<T> {
    Err(BTreeError::CorruptedTree { reason })
}
