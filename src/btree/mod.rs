// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The B+-Tree core: node layout, search, insertion, erasure, bulk-load,
//! the leaf iterator, the invariant verifier and binary dump/restore.

mod bulk;
mod cursor;
mod dump;
mod erase;
mod insert;
pub mod node;
mod search;
mod tree;
pub mod types;
mod verify;

pub use cursor::Cursor;
pub use dump::{restore, restore_with_traits, dump, DUMP_MAGIC, DUMP_VERSION};
pub use node::NodeId;
pub use tree::BTree;
pub use types::{BTreeStats, DefaultComparator, KeyComparator};
