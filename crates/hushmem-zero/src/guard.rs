// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Scoped guards that zero borrowed memory on release or drop.

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::zeroize::{Zeroable, fast_zeroize_slice, fast_zeroize_vec, is_slice_zeroized};

/// Zeroes a borrowed slice when released or dropped.
///
/// The guard borrows caller-owned storage for the scope; it never frees it.
/// [`release`](Self::release) may be called any number of times: each call
/// zeroes the whole wrapped region again, which is a no-op in effect once the
/// region is already zero.
///
/// # Example
///
/// ```rust
/// use hushmem_zero::ZeroizingSliceGuard;
///
/// let mut scratch = [0xAAu8; 16];
///
/// let mut guard = ZeroizingSliceGuard::wrap(&mut scratch);
/// assert_eq!(guard[0], 0xAA);
///
/// guard.release();
/// guard.release(); // idempotent
/// drop(guard);
///
/// assert_eq!(scratch, [0u8; 16]);
/// ```
pub struct ZeroizingSliceGuard<'a, T: Zeroable> {
    inner: &'a mut [T],
}

impl<'a, T: Zeroable> ZeroizingSliceGuard<'a, T> {
    /// Wraps `region`; all of it is zeroed at the end of the guard's scope.
    pub fn wrap(region: &'a mut [T]) -> Self {
        Self { inner: region }
    }

    /// Zeroes the entire wrapped region.
    pub fn release(&mut self) {
        fast_zeroize_slice(self.inner);
    }

    /// Returns `true` if the wrapped region currently reads as all zeros.
    pub fn is_zeroized(&self) -> bool {
        is_slice_zeroized(self.inner)
    }
}

impl<T: Zeroable> fmt::Debug for ZeroizingSliceGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroizingSliceGuard")
            .field("data", &"REDACTED")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl<T: Zeroable> Deref for ZeroizingSliceGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.inner
    }
}

impl<T: Zeroable> DerefMut for ZeroizingSliceGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner
    }
}

impl<T: Zeroable> Drop for ZeroizingSliceGuard<'_, T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Zeroes a borrowed `Vec` across its whole allocation when released or dropped.
///
/// Unlike [`ZeroizingSliceGuard`], spare capacity (left behind by
/// [`truncate`](Self::truncate) or [`clear`](Self::clear)) is cleared too.
/// The vector's length and allocation are kept.
///
/// The guard only hands out the elements as a slice and only lets the length
/// shrink, so the vector cannot reallocate while wrapped.
pub struct ZeroizingVecGuard<'a, T: Zeroable> {
    inner: &'a mut Vec<T>,
}

impl<'a, T: Zeroable> ZeroizingVecGuard<'a, T> {
    /// Wraps `vec`; its whole allocation is zeroed at the end of the guard's scope.
    pub fn wrap(vec: &'a mut Vec<T>) -> Self {
        Self { inner: vec }
    }

    /// Zeroes the entire allocation, spare capacity included.
    pub fn release(&mut self) {
        fast_zeroize_vec(self.inner);
    }

    /// Shortens the vector to `len` elements. No-op if `len` is not smaller.
    ///
    /// Dropped elements stay in spare capacity until release.
    pub fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }

    /// Sets the length to zero, keeping the allocation.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Capacity of the wrapped allocation in elements.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

impl<T: Zeroable> fmt::Debug for ZeroizingVecGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroizingVecGuard")
            .field("data", &"REDACTED")
            .field("len", &self.inner.len())
            .field("capacity", &self.inner.capacity())
            .finish()
    }
}

impl<T: Zeroable> Deref for ZeroizingVecGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.inner.as_slice()
    }
}

impl<T: Zeroable> DerefMut for ZeroizingVecGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.as_mut_slice()
    }
}

impl<T: Zeroable> Drop for ZeroizingVecGuard<'_, T> {
    fn drop(&mut self) {
        self.release();
    }
}
