// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for hushmem-writer.

use hushmem_pool::PoolError;
use thiserror::Error;

/// Errors from buffer writers and segment flattening.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum WriterError {
    /// A fixed-capacity writer cannot hold the requested elements.
    #[error("requested {requested} elements but only {available} are free")]
    Capacity {
        /// Elements asked for.
        requested: usize,
        /// Elements still free.
        available: usize,
    },

    /// The writer cannot perform this operation.
    #[error("`{operation}` is not supported by this writer, use `{alternative}` instead")]
    Unsupported {
        /// The rejected operation.
        operation: &'static str,
        /// The accessor to use instead.
        alternative: &'static str,
    },

    /// The writer or lease was disposed.
    #[error("writer has been disposed")]
    Disposed,

    /// A memory region does not lie within the writer's storage.
    #[error("argument `{param}` is out of range")]
    OutOfRange {
        /// Name of the offending parameter.
        param: &'static str,
    },

    /// A segmented source yielded a different element count than it declared.
    #[error("segmented source declared {expected} elements but yielded {actual}")]
    SegmentLength {
        /// Declared length.
        expected: usize,
        /// Elements actually yielded (so far).
        actual: usize,
    },

    /// Renting or reading pooled storage failed.
    #[error(transparent)]
    Pool(#[from] PoolError),
}
