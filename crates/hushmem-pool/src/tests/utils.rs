// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for hushmem-pool.

use std::sync::Arc;

use crate::{FixedPressure, PoolConfig, SecureBufferPool};

/// A pool that never trims on its own and sees a fixed memory load.
pub fn quiet_pool(load: f64) -> SecureBufferPool<u8> {
    let config = PoolConfig::default().with_trim_interval(None);

    SecureBufferPool::with_pressure_source(config, Arc::new(FixedPressure::at(load)))
        .expect("Failed to with_pressure_source(..)")
}

/// Reads the whole storage of a live lease through its raw pointer.
///
/// # Safety
///
/// `ptr` must point to at least `len` live bytes.
pub unsafe fn read_raw(ptr: *const u8, len: usize) -> Vec<u8> {
    unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec()
}
