// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for hushmem-pool.

use thiserror::Error;

/// Errors from the backing-storage allocation syscalls.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum AllocError {
    /// The requested byte length cannot be laid out.
    #[error("invalid allocation layout")]
    Layout = 0,

    /// `mmap` refused the mapping.
    #[error("mmap failed")]
    Mmap = 1,

    /// `mlock` refused to pin the mapping in RAM.
    #[error("mlock failed")]
    Mlock = 2,

    /// `madvise(MADV_DONTDUMP)` failed.
    #[error("madvise(MADV_DONTDUMP) failed")]
    Madvise = 3,
}

/// Errors from renting or reading pooled buffers.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum PoolError {
    /// The pool was disposed; it no longer hands out buffers.
    #[error("pool has been disposed")]
    Disposed,

    /// The buffer was released; its contents are gone.
    #[error("buffer has been released")]
    BufferReleased,

    /// A size argument is outside the representable range.
    #[error("argument `{param}` is out of range")]
    OutOfRange {
        /// Name of the offending parameter.
        param: &'static str,
    },

    /// The backing storage could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocError),
}

/// Errors from validating a [`PoolConfig`](crate::PoolConfig).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A numeric setting is outside its valid range.
    #[error("config value `{param}` = {value} is out of range")]
    OutOfRange {
        /// Name of the offending setting.
        param: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The storage strategy is not available on this platform.
    #[error("storage strategy {0:?} is not supported on this platform")]
    UnsupportedStrategy(crate::StorageStrategy),
}
