// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Address-stable backing storage for secure buffers.

use alloc::boxed::Box;
use alloc::vec;

use hushmem_zero::Zeroable;

use crate::config::{LockFailure, StorageStrategy};
use crate::error::AllocError;

#[cfg(unix)]
use crate::page::LockedRegion;

/// A fixed-length block of `T` whose address never changes while it lives.
pub(crate) enum Storage<T: Zeroable> {
    Heap(Box<[T]>),
    #[cfg(unix)]
    Locked(LockedRegion<T>),
}

impl<T: Zeroable> Storage<T> {
    /// Allocates `len` zeroed elements with the given strategy.
    pub(crate) fn allocate(
        strategy: StorageStrategy,
        lock_failure: LockFailure,
        len: usize,
    ) -> Result<Self, AllocError> {
        match strategy {
            StorageStrategy::Heap => Ok(Self::Heap(vec![T::zeroed(); len].into_boxed_slice())),
            #[cfg(unix)]
            StorageStrategy::LockedPages => Ok(Self::Locked(LockedRegion::new(len, lock_failure)?)),
            #[cfg(not(unix))]
            StorageStrategy::LockedPages => {
                let _ = lock_failure;
                Err(AllocError::Mmap)
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Heap(b) => b.len(),
            #[cfg(unix)]
            Self::Locked(r) => r.len(),
        }
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        match self {
            Self::Heap(b) => b,
            #[cfg(unix)]
            Self::Locked(r) => r.as_slice(),
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Self::Heap(b) => b,
            #[cfg(unix)]
            Self::Locked(r) => r.as_mut_slice(),
        }
    }

    /// Returns `true` if the storage is pinned in RAM by `mlock`.
    pub(crate) fn is_locked(&self) -> bool {
        match self {
            Self::Heap(_) => false,
            #[cfg(unix)]
            Self::Locked(r) => r.is_locked(),
        }
    }
}
