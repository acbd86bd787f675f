// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Binary dump / restore (§4.9, §6.2).
//!
//! The wire format is a fixed header (magic, version, the sizes and slot
//! counts of the instantiation that produced it, the duplicates flag and
//! the total item count) followed by a CRC32 of the payload and the
//! payload itself: a `bincode`-encoded pre-order traversal of the tree.
//! Inner nodes don't persist their children's [`NodeId`]s — a dump and
//! the arena that produced it can disagree on which indices are free, so
//! a restored [`NodeId`] wouldn't mean anything — instead each inner
//! node's image carries only its key count, and restore reconstructs
//! child links purely from pre-order position, exactly mirroring how the
//! tree was walked to produce the dump.

use serde::{Deserialize, Serialize};

use super::node::{Arena, InnerNode, LeafNode, NodeId};
use super::tree::BTree;
use super::types::KeyComparator;
use crate::core::config::BTreeTraits;
use crate::error::{BTreeError, BTreeResult};

#[cfg(test)]
#[path = "dump_test.rs"]
mod dump_test;

/// 12-byte signature at the start of every dump.
pub const DUMP_MAGIC: [u8; 12] = *b"BPTREEDUMP01";

/// Format version. Bumped whenever the header or payload layout changes
/// in a way that isn't backward-readable.
pub const DUMP_VERSION: u16 = 0;

const HEADER_LEN: usize = 12 + 2 + 2 + 2 + 2 + 2 + 1 + 8;

#[derive(Serialize, Deserialize)]
enum DumpNode<K, V> {
    Leaf { keys: Vec<K>, values: Vec<V> },
    Inner { level: u16, keys: Vec<K>, child_count: usize },
}

/// Serializes `tree` into the format described in §6.2.
pub fn dump<K, V, C, Traits, const DUPLICATES: bool>(tree: &BTree<K, V, C, Traits, DUPLICATES>) -> BTreeResult<Vec<u8>>
where
    K: Serialize + Clone,
    V: Serialize + Clone,
    C: KeyComparator<K>,
    Traits: BTreeTraits,
{
    let mut nodes = Vec::new();
    if let Some(root) = tree.root {
        collect_preorder(tree, root, &mut nodes);
    }

    let payload = bincode::serialize(&nodes).map_err(|e| BTreeError::DumpDecodeError { reason: e.to_string() })?;
    let checksum = crc32fast::hash(&payload);

    let mut out = Vec::with_capacity(HEADER_LEN + 4 + payload.len());
    out.extend_from_slice(&DUMP_MAGIC);
    out.extend_from_slice(&DUMP_VERSION.to_le_bytes());
    out.extend_from_slice(&(std::mem::size_of::<K>() as u16).to_le_bytes());
    out.extend_from_slice(&(std::mem::size_of::<V>() as u16).to_le_bytes());
    out.extend_from_slice(&(tree.leaf_slots as u16).to_le_bytes());
    out.extend_from_slice(&(tree.inner_slots as u16).to_le_bytes());
    out.push(if DUPLICATES { 1 } else { 0 });
    out.extend_from_slice(&(tree.item_count as u64).to_le_bytes());
    out.extend_from_slice(&checksum.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

fn collect_preorder<K, V, C, Traits, const DUPLICATES: bool>(
    tree: &BTree<K, V, C, Traits, DUPLICATES>,
    node: NodeId,
    out: &mut Vec<DumpNode<K, V>>,
) where
    K: Clone,
    V: Clone,
    C: KeyComparator<K>,
    Traits: BTreeTraits,
{
    if tree.arena.is_leaf(node) {
        let l = tree.arena.leaf(node);
        out.push(DumpNode::Leaf { keys: l.keys.clone(), values: l.values.clone() });
    } else {
        let (level, keys, children) = {
            let n = tree.arena.inner(node);
            (n.level, n.keys.clone(), n.children.clone())
        };
        out.push(DumpNode::Inner { level, keys, child_count: children.len() });
        for child in children {
            collect_preorder(tree, child, out);
        }
    }
}

struct Header {
    sizeof_key: u16,
    sizeof_value: u16,
    leaf_slots: u16,
    inner_slots: u16,
    duplicates: bool,
    item_count: u64,
    checksum: u32,
}

fn parse_header(bytes: &[u8]) -> BTreeResult<(Header, &[u8])> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(BTreeError::DumpDecodeError { reason: "input too short for a dump header".to_string() });
    }
    if bytes[0..12] != DUMP_MAGIC {
        let found = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        return Err(BTreeError::BadDumpMagic { found });
    }
    let version = u16::from_le_bytes([bytes[12], bytes[13]]);
    if version != DUMP_VERSION {
        return Err(BTreeError::UnsupportedDumpVersion { found: version });
    }
    let header = Header {
        sizeof_key: u16::from_le_bytes([bytes[14], bytes[15]]),
        sizeof_value: u16::from_le_bytes([bytes[16], bytes[17]]),
        leaf_slots: u16::from_le_bytes([bytes[18], bytes[19]]),
        inner_slots: u16::from_le_bytes([bytes[20], bytes[21]]),
        duplicates: bytes[22] != 0,
        item_count: u64::from_le_bytes(bytes[23..31].try_into().unwrap()),
        checksum: u32::from_le_bytes(bytes[31..35].try_into().unwrap()),
    };
    Ok((header, &bytes[HEADER_LEN + 4..]))
}

fn check_instantiation<K, V, Traits, const DUPLICATES: bool>(header: &Header, leaf_slots: usize, inner_slots: usize) -> BTreeResult<()>
where
    Traits: BTreeTraits,
{
    let expected_key = std::mem::size_of::<K>() as u16;
    let expected_value = std::mem::size_of::<V>() as u16;
    if header.sizeof_key != expected_key
        || header.sizeof_value != expected_value
        || header.leaf_slots as usize != leaf_slots
        || header.inner_slots as usize != inner_slots
        || header.duplicates != DUPLICATES
    {
        return Err(BTreeError::DumpDecodeError {
            reason: "dump was produced by a different tree instantiation (key/value size, slot counts, or duplicates flag mismatch)".to_string(),
        });
    }
    Ok(())
}

/// Clears `tree` and repopulates it from `bytes`, using `tree`'s own
/// comparator. Fails (leaving `tree` empty, per §7) if `bytes` doesn't
/// match `tree`'s instantiation or fails its checksum.
pub fn restore_into<K, V, C, Traits, const DUPLICATES: bool>(
    tree: &mut BTree<K, V, C, Traits, DUPLICATES>,
    bytes: &[u8],
) -> BTreeResult<()>
where
    K: for<'de> Deserialize<'de> + Clone,
    V: for<'de> Deserialize<'de> + Clone,
    C: KeyComparator<K>,
    Traits: BTreeTraits,
{
    tree.clear();
    let (header, payload) = parse_header(bytes)?;
    check_instantiation::<K, V, Traits, DUPLICATES>(&header, tree.leaf_slots, tree.inner_slots)?;

    let computed = crc32fast::hash(payload);
    if computed != header.checksum {
        return Err(BTreeError::DumpChecksumMismatch { expected: header.checksum, computed });
    }

    let nodes: Vec<DumpNode<K, V>> =
        bincode::deserialize(payload).map_err(|e| BTreeError::DumpDecodeError { reason: e.to_string() })?;

    let mut arena = Arena::new();
    let mut cursor = 0usize;
    let mut prev_leaf: Option<NodeId> = None;
    let mut head_leaf = None;
    let mut leaf_count = 0usize;
    let mut inner_count = 0usize;

    let root = if nodes.is_empty() {
        None
    } else {
        Some(rebuild(&nodes, &mut cursor, &mut arena, &mut prev_leaf, &mut head_leaf, &mut leaf_count, &mut inner_count))
    };
    let tail_leaf = prev_leaf;

    tree.arena = arena;
    tree.root = root;
    tree.head_leaf = head_leaf;
    tree.tail_leaf = tail_leaf;
    tree.item_count = header.item_count as usize;
    tree.leaves = leaf_count;
    tree.inner_nodes = inner_count;
    tree.levels = if let Some(root) = tree.root { tree.node_level(root) as usize + 1 } else { 0 };

    if Traits::SELFVERIFY {
        tree.verify().expect("self-verify: restore produced an invalid tree");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn rebuild<K, V>(
    nodes: &[DumpNode<K, V>],
    cursor: &mut usize,
    arena: &mut Arena<K, V>,
    prev_leaf: &mut Option<NodeId>,
    head_leaf: &mut Option<NodeId>,
    leaf_count: &mut usize,
    inner_count: &mut usize,
) -> NodeId
where
    K: Clone,
    V: Clone,
{
    let node = &nodes[*cursor];
    *cursor += 1;
    match node {
        DumpNode::Leaf { keys, values } => {
            let mut leaf = LeafNode::new();
            leaf.keys = keys.clone();
            leaf.values = values.clone();
            leaf.prev = *prev_leaf;
            let id = arena.alloc_leaf(leaf);
            if let Some(prev) = *prev_leaf {
                arena.leaf_mut(prev).next = Some(id);
            } else {
                *head_leaf = Some(id);
            }
            *prev_leaf = Some(id);
            *leaf_count += 1;
            id
        }
        DumpNode::Inner { level, keys, child_count } => {
            let mut children = Vec::with_capacity(*child_count);
            for _ in 0..*child_count {
                children.push(rebuild(nodes, cursor, arena, prev_leaf, head_leaf, leaf_count, inner_count));
            }
            let mut inner = InnerNode::new(*level);
            inner.keys = keys.clone();
            inner.children = children;
            *inner_count += 1;
            arena.alloc_inner(inner)
        }
    }
}

/// Builds a fresh tree from `bytes` using `C`'s default instance.
pub fn restore<K, V, C, Traits, const DUPLICATES: bool>(bytes: &[u8]) -> BTreeResult<BTree<K, V, C, Traits, DUPLICATES>>
where
    K: for<'de> Deserialize<'de> + Clone,
    V: for<'de> Deserialize<'de> + Clone,
    C: KeyComparator<K> + Default,
    Traits: BTreeTraits,
{
    let mut tree = BTree::with_comparator(C::default());
    restore_into(&mut tree, bytes)?;
    Ok(tree)
}

/// Like [`restore`], but with an explicit comparator instance for `C`
/// types that aren't `Default` (e.g. a comparator holding runtime state).
pub fn restore_with_traits<K, V, C, Traits, const DUPLICATES: bool>(
    bytes: &[u8],
    compare: C,
) -> BTreeResult<BTree<K, V, C, Traits, DUPLICATES>>
where
    K: for<'de> Deserialize<'de> + Clone,
    V: for<'de> Deserialize<'de> + Clone,
    C: KeyComparator<K>,
    Traits: BTreeTraits,
{
    let mut tree = BTree::with_comparator(compare);
    restore_into(&mut tree, bytes)?;
    Ok(tree)
}
