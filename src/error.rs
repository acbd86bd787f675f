// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Crate-wide error type.

use std::fmt;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors produced by [`crate::BTree`] and the facade types built on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// `bulk_load` was called with a key sequence that was not sorted
    /// (and not merely non-unique, which is allowed when duplicates are on).
    UnsortedBulkInput { at_index: usize },

    /// `verify()` found a violated invariant. Carries a human-readable
    /// description of what failed and where.
    CorruptedTree { reason: String },

    /// A dump image's header magic did not match [`crate::btree::dump::DUMP_MAGIC`].
    BadDumpMagic { found: u32 },

    /// A dump image's format version is newer (or otherwise incompatible)
    /// with what this build of the crate can restore.
    UnsupportedDumpVersion { found: u16 },

    /// A dump image's CRC32 checksum did not match its payload.
    DumpChecksumMismatch { expected: u32, computed: u32 },

    /// The payload of a dump image could not be decoded with `bincode`.
    DumpDecodeError { reason: String },
}

impl fmt::Display for BTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BTreeError::UnsortedBulkInput { at_index } => {
                write!(f, "bulk_load input is not sorted ascending at index {at_index}")
            }
            BTreeError::CorruptedTree { reason } => write!(f, "tree invariant violated: {reason}"),
            BTreeError::BadDumpMagic { found } => {
                write!(f, "dump header magic mismatch: found 0x{found:08x}")
            }
            BTreeError::UnsupportedDumpVersion { found } => {
                write!(f, "dump format version {found} is not supported by this build")
            }
            BTreeError::DumpChecksumMismatch { expected, computed } => write!(
                f,
                "dump checksum mismatch: header says 0x{expected:08x}, payload hashes to 0x{computed:08x}"
            ),
            BTreeError::DumpDecodeError { reason } => write!(f, "failed to decode dump payload: {reason}"),
        }
    }
}

impl std::error::Error for BTreeError {}

/// Convenience alias used throughout the crate.
pub type BTreeResult<T> = Result<T, BTreeError>;
