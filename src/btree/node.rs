// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Arena-backed node storage.
//!
//! Nodes are never heap-allocated individually and never referenced through
//! `Rc<RefCell<_>>` or raw pointers. Instead every node lives in a slab
//! (`Arena`) and is addressed by a small `Copy` handle, `NodeId`. This keeps
//! the whole tree in safe Rust: the leaf chain's `prev`/`next` links, a
//! node's children, and the root pointer are all just `NodeId`s, resolved
//! back into a `&`/`&mut` node through the arena at the point of use.
//!
//! ## Input
//! Construction takes no arguments; nodes are allocated through
//! [`Arena::alloc_leaf`] / [`Arena::alloc_inner`] as the tree grows.
//!
//! ## Output
//! [`Arena::get`]/[`Arena::get_mut`] and the `leaf`/`inner` accessor pairs
//! return references scoped to the arena's own lifetime, never owned copies.
//!
//! ## Performance
//! `alloc` is O(1) amortized (a free list absorbs node churn from merges and
//! splits); `free` is O(1); `get`/`get_mut` are O(1) index operations.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

/// A non-owning handle to a node living in an [`Arena`].
///
/// Deliberately small and `Copy` so it can be stored freely in parent/child
/// and leaf-chain links without any borrow-checker friction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An inner (routing) node: `keys.len() + 1 == children.len()`, and
/// `children[i]`'s subtree holds only keys `<= keys[i]` (and `> keys[i-1]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnerNode<K> {
    /// Height above the leaf level; leaves are level 0.
    pub level: u16,
    pub keys: Vec<K>,
    pub children: Vec<NodeId>,
}

impl<K> InnerNode<K> {
    pub fn new(level: u16) -> Self {
        InnerNode { level, keys: Vec::new(), children: Vec::new() }
    }
}

/// A leaf node: parallel `keys`/`values` arrays plus links to its immediate
/// neighbors in the global key-ordered leaf chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafNode<K, V> {
    pub keys: Vec<K>,
    pub values: Vec<V>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

impl<K, V> LeafNode<K, V> {
    pub fn new() -> Self {
        LeafNode { keys: Vec::new(), values: Vec::new(), prev: None, next: None }
    }
}

impl<K, V> Default for LeafNode<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Either kind of node a [`NodeId`] may resolve to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind<K, V> {
    Inner(InnerNode<K>),
    Leaf(LeafNode<K, V>),
}

/// A slab of nodes addressed by [`NodeId`], with a free list so that the
/// churn of splits and merges reuses slots instead of growing unboundedly.
#[derive(Debug, Clone)]
pub struct Arena<K, V> {
    slots: Vec<Option<NodeKind<K, V>>>,
    free: Vec<u32>,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Self {
        Arena { slots: Vec::new(), free: Vec::new() }
    }

    pub fn alloc_leaf(&mut self, leaf: LeafNode<K, V>) -> NodeId {
        self.alloc(NodeKind::Leaf(leaf))
    }

    pub fn alloc_inner(&mut self, inner: InnerNode<K>) -> NodeId {
        self.alloc(NodeKind::Inner(inner))
    }

    fn alloc(&mut self, node: NodeKind<K, V>) -> NodeId {
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(node);
            NodeId(idx)
        } else {
            self.slots.push(Some(node));
            NodeId((self.slots.len() - 1) as u32)
        }
    }

    /// Frees a node's slot for reuse. The caller must have already unlinked
    /// `id` from every parent/child/leaf-chain reference; a dangling
    /// [`NodeId`] used afterwards panics on next access.
    pub fn free(&mut self, id: NodeId) {
        self.slots[id.index()] = None;
        self.free.push(id.0);
    }

    pub fn get(&self, id: NodeId) -> &NodeKind<K, V> {
        self.slots[id.index()].as_ref().expect("dangling NodeId")
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeKind<K, V> {
        self.slots[id.index()].as_mut().expect("dangling NodeId")
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.get(id), NodeKind::Leaf(_))
    }

    pub fn leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        match self.get(id) {
            NodeKind::Leaf(l) => l,
            NodeKind::Inner(_) => panic!("NodeId {id:?} does not refer to a leaf"),
        }
    }

    pub fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        match self.get_mut(id) {
            NodeKind::Leaf(l) => l,
            NodeKind::Inner(_) => panic!("NodeId {id:?} does not refer to a leaf"),
        }
    }

    pub fn inner(&self, id: NodeId) -> &InnerNode<K> {
        match self.get(id) {
            NodeKind::Inner(n) => n,
            NodeKind::Leaf(_) => panic!("NodeId {id:?} does not refer to an inner node"),
        }
    }

    pub fn inner_mut(&mut self, id: NodeId) -> &mut InnerNode<K> {
        match self.get_mut(id) {
            NodeKind::Inner(n) => n,
            NodeKind::Leaf(_) => panic!("NodeId {id:?} does not refer to an inner node"),
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
