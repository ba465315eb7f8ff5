// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Cursor bookkeeping shared by both fixed-capacity writer flavors.

use hushmem_zero::{Zeroable, fast_zeroize_slice};

use crate::error::WriterError;
use crate::traits::MemoryRegion;

/// Forward-only write cursor over a region of fixed capacity.
///
/// Invariant: `cursor <= capacity`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Cursor {
    cursor: usize,
    capacity: usize,
}

impl Cursor {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            cursor: 0,
            capacity,
        }
    }

    #[inline(always)]
    fn debug_assert_invariant(&self) {
        debug_assert!(
            self.cursor <= self.capacity,
            "Invariant violated: cursor ({}) <= capacity ({})",
            self.cursor,
            self.capacity
        );
    }

    pub(crate) fn position(&self) -> usize {
        self.cursor
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn free(&self) -> usize {
        self.capacity - self.cursor
    }

    pub(crate) fn advance(&mut self, count: usize) -> Result<(), WriterError> {
        self.check(count)?;
        self.cursor += count;

        self.debug_assert_invariant();

        Ok(())
    }

    /// Fails with [`WriterError::Capacity`] if fewer than `count` elements are free.
    pub(crate) fn check(&self, count: usize) -> Result<(), WriterError> {
        if count > self.free() {
            return Err(WriterError::Capacity {
                requested: count,
                available: self.free(),
            });
        }

        Ok(())
    }

    pub(crate) fn tail_region(&self, size_hint: usize) -> Result<MemoryRegion, WriterError> {
        self.check(size_hint)?;

        Ok(MemoryRegion {
            segment: 0,
            offset: self.cursor,
            len: self.free(),
        })
    }

    /// Validates a region handed out by [`tail_region`](Self::tail_region).
    pub(crate) fn check_region(&self, region: &MemoryRegion) -> Result<(), WriterError> {
        let in_bounds = region.segment == 0
            && region
                .offset
                .checked_add(region.len)
                .is_some_and(|end| end <= self.capacity);

        if !in_bounds {
            return Err(WriterError::OutOfRange { param: "region" });
        }

        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.cursor = 0;
    }

    /// Zeroes exactly the committed prefix of `storage`, then rewinds.
    pub(crate) fn reset<T: Zeroable>(&mut self, storage: &mut [T]) {
        fast_zeroize_slice(&mut storage[..self.cursor]);
        self.cursor = 0;
    }
}
