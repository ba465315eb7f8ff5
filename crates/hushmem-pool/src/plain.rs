// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! PlainPool - ordinary shared pool for non-sensitive buffers.
//!
//! Same page-granular shape as the secure pool, without zeroing on return.
//! A buffer rented from here may contain bytes left by a previous renter.

use alloc::boxed::Box;
use alloc::sync::{Arc, Weak};
use alloc::vec;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_queue::SegQueue;
use hushmem_zero::Zeroable;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{ConfigError, PoolError};

/// Default upper bound on idle buffers kept by a [`PlainPool`].
pub const DEFAULT_PLAIN_MAX_IDLE: usize = 64;

struct PlainShared<T: Zeroable> {
    idle: SegQueue<Box<[T]>>,
    idle_len: AtomicUsize,
    page_len: usize,
    max_idle: usize,
}

impl<T: Zeroable> PlainShared<T> {
    fn accept(&self, block: Box<[T]>) {
        if block.len() != self.page_len || self.idle_len.load(Ordering::Relaxed) >= self.max_idle {
            return;
        }

        self.idle.push(block);
        self.idle_len.fetch_add(1, Ordering::Relaxed);
    }
}

/// A pooled buffer that is returned to its [`PlainPool`] on drop, unzeroed.
pub struct PlainBuffer<T: Zeroable = u8> {
    block: Option<Box<[T]>>,
    pool: Option<Weak<PlainShared<T>>>,
}

impl<T: Zeroable> PlainBuffer<T> {
    /// Returns the contents, or `None` after [`release`](Self::release).
    pub fn as_slice(&self) -> Option<&[T]> {
        self.block.as_deref()
    }

    /// Returns the contents for writing, or `None` after [`release`](Self::release).
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        self.block.as_deref_mut()
    }

    /// Length in elements; `0` once released.
    pub fn len(&self) -> usize {
        self.block.as_ref().map_or(0, |b| b.len())
    }

    /// Returns `true` if the length is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once [`release`](Self::release) has run.
    pub fn is_released(&self) -> bool {
        self.block.is_none()
    }

    /// Returns the block to its pool, or frees it. Idempotent.
    pub fn release(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };

        if let Some(pool) = self.pool.take().and_then(|pool| pool.upgrade()) {
            pool.accept(block);
        }
    }
}

impl<T: Zeroable> fmt::Debug for PlainBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainBuffer")
            .field("len", &self.len())
            .field("pooled", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Zeroable> Drop for PlainBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// A thread-safe, non-zeroing pool of page-sized buffers.
pub struct PlainPool<T: Zeroable = u8> {
    shared: Arc<PlainShared<T>>,
}

impl<T: Zeroable> PlainPool<T> {
    /// Creates a pool with the given page size in bytes and idle bound.
    ///
    /// # Errors
    ///
    /// [`ConfigError::OutOfRange`] unless `page_size` is a power of two that
    /// holds at least one element of `T`.
    pub fn new(page_size: usize, max_idle: usize) -> Result<Self, ConfigError> {
        if !page_size.is_power_of_two() || page_size < core::mem::size_of::<T>() {
            return Err(ConfigError::OutOfRange {
                param: "page_size",
                value: page_size as f64,
            });
        }

        Ok(Self::build(page_size, max_idle))
    }

    fn build(page_size: usize, max_idle: usize) -> Self {
        Self {
            shared: Arc::new(PlainShared {
                idle: SegQueue::new(),
                idle_len: AtomicUsize::new(0),
                page_len: page_size / core::mem::size_of::<T>(),
                max_idle,
            }),
        }
    }

    /// Rents a buffer of at least `min_size` elements.
    ///
    /// Small requests get a pooled page; larger ones get a dedicated block.
    /// `min_size == 0` yields an empty, unpooled buffer.
    pub fn rent(&self, min_size: usize) -> Result<PlainBuffer<T>, PoolError> {
        let shared = &self.shared;

        min_size
            .checked_mul(core::mem::size_of::<T>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(PoolError::OutOfRange { param: "min_size" })?;

        if min_size > shared.page_len {
            return Ok(PlainBuffer {
                block: Some(vec![T::zeroed(); min_size].into_boxed_slice()),
                pool: None,
            });
        }

        if min_size == 0 {
            return Ok(PlainBuffer {
                block: Some(Box::default()),
                pool: None,
            });
        }

        let block = match shared.idle.pop() {
            Some(block) => {
                shared.idle_len.fetch_sub(1, Ordering::Relaxed);
                block
            }
            None => vec![T::zeroed(); shared.page_len].into_boxed_slice(),
        };

        Ok(PlainBuffer {
            block: Some(block),
            pool: Some(Arc::downgrade(shared)),
        })
    }

    /// Page granularity in elements of `T`.
    pub fn page_len(&self) -> usize {
        self.shared.page_len
    }

    /// Number of idle buffers. May be briefly stale under concurrency.
    pub fn idle_count(&self) -> usize {
        self.shared.idle_len.load(Ordering::Relaxed)
    }
}

impl<T: Zeroable> Default for PlainPool<T> {
    fn default() -> Self {
        Self::build(DEFAULT_PAGE_SIZE, DEFAULT_PLAIN_MAX_IDLE)
    }
}

impl<T: Zeroable> Clone for PlainPool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Zeroable> fmt::Debug for PlainPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainPool")
            .field("page_len", &self.shared.page_len)
            .field("idle", &self.idle_count())
            .finish()
    }
}
