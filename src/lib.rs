// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! An in-memory B+-Tree ordered map/set.
//!
//! A drop-in replacement for a red-black tree: a shallow, wide, multi-way
//! search tree where keys live in both inner and leaf nodes but values live
//! only in leaves, and all leaves are chained into a doubly-linked sequence
//! for fast ordered iteration and range scans.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ BTree<K, V, C>                                  │
//! ├─────────────────────────────────────────────────┤
//! │ - arena: Arena<K, V>      (slab of nodes)        │
//! │ - root, head_leaf, tail_leaf: Option<NodeId>     │
//! │ - item_count, leaves, inner_nodes, levels        │
//! │ - leaf_slots, inner_slots, min_leaf, min_inner    │
//! │ - compare: C                                     │
//! └─────────────────────────────────────────────────┘
//!        │
//!        │ inner nodes route searches; leaves hold data
//!        ▼
//! ┌──────────────┐   next   ┌──────────────┐   next   ┌──────────────┐
//! │ Leaf         │ ───────► │ Leaf         │ ───────► │ Leaf         │
//! │ [k1,k2,...]  │ ◄─────── │ [k5,k6,...]  │ ◄─────── │ [k9,...]     │
//! └──────────────┘   prev   └──────────────┘   prev   └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bptree::BTreeMap;
//!
//! let mut map = BTreeMap::new();
//! map.insert("page.title".to_string(), vec![1, 2, 3]);
//! map.insert("page.description".to_string(), vec![4, 5, 6]);
//!
//! assert_eq!(map.get(&"page.title".to_string()), Some(&vec![1, 2, 3]));
//!
//! for (key, value) in map.iter() {
//!     println!("{key}: {value:?}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: shared configuration (traits struct / page-size derived slot
//!   counts).
//! - [`btree`]: the tree core — node layout, search, insert, erase,
//!   bulk-load, the leaf iterator, the invariant verifier and dump/restore.
//! - [`error`]: crate error type.
//! - facades: [`BTreeSet`], [`BTreeMultiSet`], [`BTreeMap`], [`BTreeMultiMap`].

pub mod btree;
pub mod core;
pub mod error;
mod facades;

pub use btree::{BTree, BTreeStats, Cursor, DefaultComparator, KeyComparator};
pub use core::config::{BTreeTraits, DebugTraits, DefaultTraits, PageConfig};
pub use error::{BTreeError, BTreeResult};
pub use facades::{BTreeMap, BTreeMultiMap, BTreeMultiSet, BTreeSet};
