// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-wide shared pools.
//!
//! Initialized lazily on first use and never torn down implicitly. Hosts
//! that need to reclaim them (tests, embedders) call `dispose()` on the
//! returned pool; later rents then fail with [`PoolError::Disposed`](crate::PoolError::Disposed).

use std::sync::OnceLock;

use crate::plain::PlainPool;
use crate::pool::SecureBufferPool;
use crate::source::BufferSource;

static SHARED_SECURE: OnceLock<SecureBufferPool<u8>> = OnceLock::new();
static SHARED_SOURCE: OnceLock<BufferSource<u8>> = OnceLock::new();

/// The process-wide secure byte pool, created with the default configuration.
pub fn shared_pool() -> &'static SecureBufferPool<u8> {
    SHARED_SECURE.get_or_init(SecureBufferPool::default)
}

/// The process-wide byte source over [`shared_pool`] and a shared plain pool.
pub fn shared_source() -> &'static BufferSource<u8> {
    SHARED_SOURCE.get_or_init(|| BufferSource::new(shared_pool().clone(), PlainPool::default()))
}
