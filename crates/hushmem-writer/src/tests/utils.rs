// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for hushmem-writer.

use std::sync::Arc;

use hushmem_pool::{BufferSource, FixedPressure, PlainPool, PoolConfig, SecureBufferPool};

/// A byte pool that never trims.
pub fn test_pool() -> SecureBufferPool<u8> {
    let config = PoolConfig::default().with_trim_interval(None);

    SecureBufferPool::with_pressure_source(config, Arc::new(FixedPressure(None)))
        .expect("Failed to with_pressure_source(..)")
}

/// A byte source over [`test_pool`].
pub fn test_source() -> BufferSource<u8> {
    BufferSource::new(test_pool(), PlainPool::default())
}
