// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! OwnedSecureBuffer - the lease over one secure allocation.
//!
//! A lease owns its storage until released. Release zeroes the whole storage
//! exactly once, then hands it back to the originating pool or frees it.

use alloc::sync::Weak;
use core::fmt;
use core::mem;

use hushmem_zero::{Zeroable, fast_zeroize_slice};

use crate::error::PoolError;
use crate::pool::PoolShared;
use crate::storage::Storage;

enum LeaseState<T: Zeroable> {
    /// The zero-length sentinel: always empty, release is a no-op.
    Empty,
    Live(Storage<T>),
    Released,
}

/// An owned, address-stable buffer that is zeroed when released.
///
/// Obtained from [`SecureBufferPool::rent`](crate::SecureBufferPool::rent)
/// or [`OwnedSecureBuffer::allocate`]. The backing storage never moves while
/// the lease is live. [`release`](Self::release) is idempotent and also runs
/// on drop.
///
/// # Example
///
/// ```rust
/// use hushmem_pool::{PoolError, SecureBufferPool};
///
/// fn example() -> Result<(), PoolError> {
///     let pool = SecureBufferPool::<u8>::default();
///     let mut lease = pool.rent(32)?;
///
///     lease.content_mut()?[..3].copy_from_slice(b"key");
///
///     lease.release(); // zeroed and back in the pool
///     lease.release(); // no-op
///
///     assert_eq!(lease.content(), Err(PoolError::BufferReleased));
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct OwnedSecureBuffer<T: Zeroable = u8> {
    state: LeaseState<T>,
    len: usize,
    pool: Option<Weak<PoolShared<T>>>,
}

impl<T: Zeroable> OwnedSecureBuffer<T> {
    /// Allocates a dedicated, non-pooled buffer of `len` zeroed elements on the heap.
    ///
    /// Releasing it zeroes and frees the storage. `len == 0` yields the empty sentinel.
    ///
    /// # Errors
    ///
    /// [`PoolError::OutOfRange`] if the byte length of `len` elements overflows.
    pub fn allocate(len: usize) -> Result<Self, PoolError> {
        if len == 0 {
            return Ok(Self::empty());
        }

        len.checked_mul(mem::size_of::<T>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(PoolError::OutOfRange { param: "len" })?;

        let storage = Storage::Heap(alloc::vec![T::zeroed(); len].into_boxed_slice());

        Ok(Self::from_storage(storage, None))
    }

    /// Returns the zero-length sentinel. Its content is always empty.
    pub const fn empty() -> Self {
        Self {
            state: LeaseState::Empty,
            len: 0,
            pool: None,
        }
    }

    pub(crate) fn from_storage(storage: Storage<T>, pool: Option<Weak<PoolShared<T>>>) -> Self {
        Self {
            len: storage.len(),
            state: LeaseState::Live(storage),
            pool,
        }
    }

    /// Returns the current contents.
    ///
    /// # Errors
    ///
    /// [`PoolError::BufferReleased`] after [`release`](Self::release).
    pub fn content(&self) -> Result<&[T], PoolError> {
        match &self.state {
            LeaseState::Empty => Ok(&[]),
            LeaseState::Live(storage) => Ok(&storage.as_slice()[..self.len]),
            LeaseState::Released => Err(PoolError::BufferReleased),
        }
    }

    /// Returns the current contents for writing.
    ///
    /// # Errors
    ///
    /// [`PoolError::BufferReleased`] after [`release`](Self::release).
    pub fn content_mut(&mut self) -> Result<&mut [T], PoolError> {
        match &mut self.state {
            LeaseState::Empty => Ok(&mut []),
            LeaseState::Live(storage) => Ok(&mut storage.as_mut_slice()[..self.len]),
            LeaseState::Released => Err(PoolError::BufferReleased),
        }
    }

    /// Logical length in elements; `0` once released.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if this is the zero-length sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self.state, LeaseState::Empty)
    }

    /// Returns `true` once [`release`](Self::release) has run.
    pub fn is_released(&self) -> bool {
        matches!(self.state, LeaseState::Released)
    }

    /// Returns `true` if release hands the storage back to a pool.
    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }

    /// Returns `true` if the storage is locked in RAM.
    pub fn is_locked(&self) -> bool {
        match &self.state {
            LeaseState::Live(storage) => storage.is_locked(),
            _ => false,
        }
    }

    /// Address of the first element; stable for the life of the lease.
    ///
    /// Null for the sentinel and after release.
    pub fn as_ptr(&self) -> *const T {
        match &self.state {
            LeaseState::Live(storage) => storage.as_slice().as_ptr(),
            _ => core::ptr::null(),
        }
    }

    /// Zeroes the whole storage, then returns it to its pool or frees it.
    ///
    /// Calling this again is a no-op. The sentinel is never released.
    pub fn release(&mut self) {
        if !matches!(self.state, LeaseState::Live(_)) {
            return;
        }

        let LeaseState::Live(mut storage) = mem::replace(&mut self.state, LeaseState::Released)
        else {
            return;
        };

        fast_zeroize_slice(storage.as_mut_slice());
        self.len = 0;

        match self.pool.take().and_then(|pool| pool.upgrade()) {
            Some(pool) => pool.accept(storage),
            None => drop(storage),
        }
    }
}

impl<T: Zeroable> Default for OwnedSecureBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Zeroable> fmt::Debug for OwnedSecureBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            LeaseState::Empty => "empty",
            LeaseState::Live(_) => "live",
            LeaseState::Released => "released",
        };

        f.debug_struct("OwnedSecureBuffer")
            .field("data", &"REDACTED")
            .field("len", &self.len)
            .field("state", &state)
            .field("pooled", &self.pool.is_some())
            .finish()
    }
}

impl<T: Zeroable> Drop for OwnedSecureBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}
