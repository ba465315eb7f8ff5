// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! LockedRegion - anonymous mapping pinned in RAM.
//!
//! Wraps an mmap'd region rounded up to whole system pages, with mlock and
//! MADV_DONTDUMP applied on creation. Each syscall is exposed separately for
//! granular testing.

use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use hushmem_zero::{Zeroable, fast_zeroize_slice};

use crate::config::LockFailure;
use crate::error::AllocError;

/// Returns the system page size in bytes.
pub(crate) fn system_page_size() -> usize {
    // SAFETY: sysconf has no preconditions; _SC_PAGESIZE always succeeds on unix.
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

/// An mmap'd region holding `len` elements of `T`, locked in RAM.
pub(crate) struct LockedRegion<T: Zeroable> {
    ptr: NonNull<T>,
    len: usize,
    map_len: usize,
    locked: bool,
    _marker: PhantomData<T>,
}

// SAFETY: the region is uniquely owned; access is mediated by &/&mut self.
unsafe impl<T: Zeroable> Send for LockedRegion<T> {}
unsafe impl<T: Zeroable> Sync for LockedRegion<T> {}

impl<T: Zeroable> LockedRegion<T> {
    /// Maps, locks and marks as non-dumpable a region for `len` elements.
    pub(crate) fn new(len: usize, lock_failure: LockFailure) -> Result<Self, AllocError> {
        let mut region = Self::map(len)?;

        if let Err(e) = region.lock() {
            match lock_failure {
                LockFailure::Fail => return Err(e),
                LockFailure::Tolerate => {
                    tracing::warn!(map_len = region.map_len, "mlock failed, keeping unlocked region");
                }
            }
        }

        region.dont_dump()?;

        Ok(region)
    }

    /// Allocates the mapping via mmap. Does NOT lock.
    pub(crate) fn map(len: usize) -> Result<Self, AllocError> {
        let page = system_page_size();
        let byte_len = len
            .checked_mul(core::mem::size_of::<T>())
            .ok_or(AllocError::Layout)?;
        let map_len = byte_len
            .max(1)
            .checked_next_multiple_of(page)
            .ok_or(AllocError::Layout)?;

        // SAFETY: anonymous private mapping, no file descriptor involved.
        let raw = unsafe {
            libc::mmap(
                ptr::null_mut(),
                map_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if raw == libc::MAP_FAILED {
            return Err(AllocError::Mmap);
        }

        let ptr = NonNull::new(raw as *mut T).ok_or(AllocError::Mmap)?;

        Ok(Self {
            ptr,
            len,
            map_len,
            locked: false,
            _marker: PhantomData,
        })
    }

    /// Locks the mapping in RAM (prevents swapping to disk).
    pub(crate) fn lock(&mut self) -> Result<(), AllocError> {
        // SAFETY: ptr/map_len describe a live mapping owned by self.
        let failed = unsafe { libc::mlock(self.ptr.as_ptr() as *const _, self.map_len) } != 0;

        if failed {
            return Err(AllocError::Mlock);
        }

        self.locked = true;

        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn dont_dump(&self) -> Result<(), AllocError> {
        // SAFETY: ptr/map_len describe a live, page-aligned mapping owned by self.
        let failed = unsafe {
            libc::madvise(
                self.ptr.as_ptr() as *mut libc::c_void,
                self.map_len,
                libc::MADV_DONTDUMP,
            )
        } != 0;

        if failed {
            return Err(AllocError::Madvise);
        }

        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn dont_dump(&self) -> Result<(), AllocError> {
        Ok(())
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: mmap returns zero-filled, page-aligned memory valid for `len` elements.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees exclusivity.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Zeroable> Drop for LockedRegion<T> {
    fn drop(&mut self) {
        fast_zeroize_slice(self.as_mut_slice());

        // SAFETY: the mapping is live until munmap below; nothing aliases it.
        unsafe {
            if self.locked {
                libc::munlock(self.ptr.as_ptr() as *const _, self.map_len);
            }
            libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.map_len);
        }
    }
}
