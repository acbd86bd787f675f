// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Node capacity derivation, mirroring `stx::btree_default_map_traits`.
//!
//! A tree's leaf and inner slot counts are not picked by hand: they fall out
//! of a target in-memory node size, the same way the original C++ traits
//! struct computes `MAX(8, 256 / sizeof(...))`. [`PageConfig`] reproduces
//! that formula; [`BTreeTraits`] is the small, `const`-only configuration
//! knob a caller plugs in at construction time to choose a page size and
//! turn on self-verification.

use std::mem::size_of;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Target size, in bytes, of a single node used to derive slot counts when no
/// explicit [`PageConfig`] is given. Matches the original's documented
/// target of "about 256 bytes" per node.
pub const DEFAULT_TARGET_PAGE_SIZE: usize = 256;

/// Lower bound on slot counts regardless of how large `K`/`V` are. A node
/// with fewer than this many slots forces very tall trees and defeats the
/// point of wide fan-out, so the formula clamps up to this floor.
pub const MIN_SLOTS: usize = 8;

/// Derives leaf and inner slot counts from a target per-node byte budget.
///
/// The formulas mirror `btree_default_map_traits` exactly:
/// `leafslots = MAX(8, page / (sizeof(key) + sizeof(value)))` and
/// `innerslots = MAX(8, page / (sizeof(key) + sizeof(handle)))`, where
/// `handle` stands in for the original's `void*` child pointer — here a
/// [`crate::btree::node::NodeId`], which is pointer-sized in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    pub target_page_size: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig { target_page_size: DEFAULT_TARGET_PAGE_SIZE }
    }
}

impl PageConfig {
    pub fn new(target_page_size: usize) -> Self {
        PageConfig { target_page_size }
    }

    /// Slot count for leaf nodes, which store one key and one value per slot.
    pub fn leaf_slots<K, V>(&self) -> usize {
        Self::slots_for_item_size(self.target_page_size, size_of::<K>() + size_of::<V>())
    }

    /// Slot count for inner nodes, which store one key and one child handle
    /// per slot (plus a trailing child with no key, as usual for B-trees).
    pub fn inner_slots<K>(&self) -> usize {
        Self::slots_for_item_size(self.target_page_size, size_of::<K>() + size_of::<u32>())
    }

    fn slots_for_item_size(page: usize, item: usize) -> usize {
        let item = item.max(1);
        (page / item).max(MIN_SLOTS)
    }
}

/// Configuration knobs a tree instantiation is built from, analogous to the
/// original's `btree_default_map_traits` template parameter.
///
/// `page_config()` is read once, at construction time (see
/// `BTree::with_comparator`), and the slot counts it derives are copied
/// into plain fields on the tree itself — so every method on
/// `btree::tree` works with plain `usize` fan-out numbers instead of
/// recomputing them from `Traits` on every call.
pub trait BTreeTraits {
    /// If true, the tree re-runs [`crate::btree::verify`] after every
    /// mutating operation and panics on the first violated invariant.
    const SELFVERIFY: bool;

    /// Target page size used to derive slot counts.
    fn page_config() -> PageConfig;
}

/// The default traits: no self-verification, 256-byte target node size.
pub struct DefaultTraits;

impl BTreeTraits for DefaultTraits {
    const SELFVERIFY: bool = false;

    fn page_config() -> PageConfig {
        PageConfig::default()
    }
}

/// Traits used by the crate's own stress tests: self-verification turned on
/// so a broken invariant panics immediately at the operation that caused it,
/// rather than surfacing later as a confusing lookup failure.
pub struct DebugTraits;

impl BTreeTraits for DebugTraits {
    const SELFVERIFY: bool = true;

    fn page_config() -> PageConfig {
        PageConfig::default()
    }
}
