// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecureBufferPool - page-granular cache of zeroed buffers.
//!
//! # Idle Set
//!
//! Every idle buffer is exactly one page long and already zeroed, so any
//! idle buffer satisfies any small request: `rent` is an O(1) pop-or-allocate.
//! Requests larger than a page get a dedicated buffer that is never cached.
//!
//! # Trimming
//!
//! `trim()` evicts the whole idle set when the configured pressure source
//! reports a load at or above the threshold. Checked-out buffers are never
//! affected. Besides explicit calls, `accept` runs a trim every
//! `trim_interval` returns.

use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_queue::SegQueue;
use hushmem_zero::Zeroable;

use crate::config::PoolConfig;
use crate::error::{ConfigError, PoolError};
use crate::lease::OwnedSecureBuffer;
use crate::pressure::{PressureSource, SystemPressure};
use crate::storage::Storage;

/// Counters describing pool activity. Values are approximate under concurrency.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct PoolStats {
    /// Buffers currently idle in the pool.
    pub idle: usize,
    /// Pooled buffers currently checked out.
    pub rented: usize,
    /// Fresh allocations, oversized ones included.
    pub allocated: usize,
    /// Rents served from the idle set.
    pub reused: usize,
    /// Idle buffers evicted by `trim()`.
    pub trimmed: usize,
}

pub(crate) struct PoolShared<T: Zeroable> {
    idle: SegQueue<Storage<T>>,
    idle_len: AtomicUsize,
    disposed: AtomicBool,
    config: PoolConfig,
    page_len: usize,
    pressure: Arc<dyn PressureSource>,
    returns: AtomicUsize,
    rented: AtomicUsize,
    allocated: AtomicUsize,
    reused: AtomicUsize,
    trimmed: AtomicUsize,
}

impl<T: Zeroable> PoolShared<T> {
    fn pop_idle(&self) -> Option<Storage<T>> {
        self.idle.pop().inspect(|_| {
            self.idle_len.fetch_sub(1, Ordering::Relaxed);
        })
    }

    fn drain_idle(&self) -> usize {
        let mut evicted = 0;

        while let Some(storage) = self.pop_idle() {
            drop(storage);
            evicted += 1;
        }

        evicted
    }

    /// Takes back a released (already zeroed) page-sized buffer.
    pub(crate) fn accept(&self, storage: Storage<T>) {
        self.rented.fetch_sub(1, Ordering::Relaxed);

        if self.disposed.load(Ordering::Acquire) {
            return;
        }

        let at_capacity = self
            .config
            .max_idle
            .is_some_and(|max| self.idle_len.load(Ordering::Relaxed) >= max);

        if at_capacity || storage.len() != self.page_len {
            return;
        }

        self.idle.push(storage);
        self.idle_len.fetch_add(1, Ordering::Relaxed);

        // A dispose racing with the push above must not leave buffers behind.
        if self.disposed.load(Ordering::SeqCst) {
            self.drain_idle();
            return;
        }

        if let Some(interval) = self.config.trim_interval {
            let returns = self.returns.fetch_add(1, Ordering::Relaxed) + 1;

            if returns % interval.get() == 0 {
                self.trim();
            }
        }
    }

    /// Returns the load that triggered eviction, or `None` below the threshold.
    fn pressure_reading(&self) -> Option<f64> {
        if self.config.pressure_threshold <= 0.0 {
            return Some(0.0);
        }

        self.pressure
            .memory_load()
            .map(|load| load.fraction())
            .filter(|&load| load >= self.config.pressure_threshold)
    }

    pub(crate) fn trim(&self) -> bool {
        if self.disposed.load(Ordering::Acquire) {
            return false;
        }

        if let Some(load) = self.pressure_reading() {
            let evicted = self.drain_idle();

            if evicted > 0 {
                self.trimmed.fetch_add(evicted, Ordering::Relaxed);
                tracing::debug!(evicted, load, "trimmed secure pool under memory pressure");
            }
        }

        true
    }
}

/// A thread-safe pool of page-sized, zero-on-release buffers.
///
/// Cloning yields another handle to the same pool.
///
/// # Example
///
/// ```rust
/// use hushmem_pool::{PoolError, SecureBufferPool};
///
/// fn example() -> Result<(), PoolError> {
///     let pool = SecureBufferPool::<u8>::default();
///
///     let small = pool.rent(100)?;
///     assert_eq!(small.len(), pool.page_len()); // rounded up to a page
///
///     let large = pool.rent(10_000)?;
///     assert_eq!(large.len(), 10_000);
///     assert!(!large.is_pooled()); // never cached
///
///     drop(small);
///     assert_eq!(pool.idle_count(), 1);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct SecureBufferPool<T: Zeroable = u8> {
    shared: Arc<PoolShared<T>>,
}

impl<T: Zeroable> SecureBufferPool<T> {
    /// Creates a pool reading memory pressure from the operating system.
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        Self::with_pressure_source(config, Arc::new(SystemPressure))
    }

    /// Creates a pool with a custom pressure source.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `config` fails validation or a page cannot hold a
    /// single element of `T`.
    pub fn with_pressure_source(
        config: PoolConfig,
        pressure: Arc<dyn PressureSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        if config.page_size < core::mem::size_of::<T>() {
            return Err(ConfigError::OutOfRange {
                param: "page_size",
                value: config.page_size as f64,
            });
        }

        Ok(Self::build(config, pressure))
    }

    fn build(config: PoolConfig, pressure: Arc<dyn PressureSource>) -> Self {
        let page_len = config.page_size / core::mem::size_of::<T>();

        tracing::debug!(
            page_size = config.page_size,
            pressure_threshold = config.pressure_threshold,
            strategy = ?config.strategy,
            "created secure buffer pool"
        );

        Self {
            shared: Arc::new(PoolShared {
                idle: SegQueue::new(),
                idle_len: AtomicUsize::new(0),
                disposed: AtomicBool::new(false),
                config,
                page_len,
                pressure,
                returns: AtomicUsize::new(0),
                rented: AtomicUsize::new(0),
                allocated: AtomicUsize::new(0),
                reused: AtomicUsize::new(0),
                trimmed: AtomicUsize::new(0),
            }),
        }
    }

    /// Rents a buffer holding at least `min_size` elements.
    ///
    /// - `0` yields the empty sentinel.
    /// - Up to one page yields a pooled buffer of exactly one page, reused
    ///   from the idle set when possible.
    /// - More than one page yields a dedicated buffer of exactly `min_size`
    ///   elements that is freed, not cached, on release.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Disposed`] if the pool was disposed.
    /// - [`PoolError::OutOfRange`] if the byte length overflows.
    /// - [`PoolError::Allocation`] if the storage backend fails.
    pub fn rent(&self, min_size: usize) -> Result<OwnedSecureBuffer<T>, PoolError> {
        let shared = &self.shared;

        if shared.disposed.load(Ordering::Acquire) {
            return Err(PoolError::Disposed);
        }

        if min_size == 0 {
            return Ok(OwnedSecureBuffer::empty());
        }

        min_size
            .checked_mul(core::mem::size_of::<T>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(PoolError::OutOfRange { param: "min_size" })?;

        if min_size > shared.page_len {
            tracing::trace!(min_size, "allocating dedicated oversized buffer");

            let storage = self.allocate_storage(min_size)?;
            return Ok(OwnedSecureBuffer::from_storage(storage, None));
        }

        let storage = match shared.pop_idle() {
            Some(storage) => {
                shared.reused.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("reusing idle page");
                storage
            }
            None => {
                tracing::trace!("idle set empty, allocating page");
                self.allocate_storage(shared.page_len)?
            }
        };

        shared.rented.fetch_add(1, Ordering::Relaxed);

        Ok(OwnedSecureBuffer::from_storage(
            storage,
            Some(Arc::downgrade(shared)),
        ))
    }

    /// Rents exactly one page.
    pub fn rent_page(&self) -> Result<OwnedSecureBuffer<T>, PoolError> {
        self.rent(self.shared.page_len)
    }

    fn allocate_storage(&self, len: usize) -> Result<Storage<T>, PoolError> {
        let config = &self.shared.config;
        let storage = Storage::allocate(config.strategy, config.lock_failure, len)?;

        self.shared.allocated.fetch_add(1, Ordering::Relaxed);

        Ok(storage)
    }

    /// Evicts every idle buffer if memory pressure is at or above the threshold.
    ///
    /// Returns `false` once the pool is disposed, signalling a periodic
    /// caller to stop. Safe to call concurrently and redundantly.
    pub fn trim(&self) -> bool {
        self.shared.trim()
    }

    /// Disposes the pool: later rents fail and every idle buffer is freed.
    ///
    /// Checked-out buffers are unaffected until released, at which point they
    /// are freed instead of cached. Idempotent.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        let evicted = self.shared.drain_idle();
        tracing::debug!(evicted, "disposed secure buffer pool");
    }

    /// Returns `true` once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.load(Ordering::Acquire)
    }

    /// Page granularity in elements of `T`.
    pub fn page_len(&self) -> usize {
        self.shared.page_len
    }

    /// The configuration this pool was created with.
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    /// Number of idle buffers. May be briefly stale under concurrency.
    pub fn idle_count(&self) -> usize {
        self.shared.idle_len.load(Ordering::Relaxed)
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        let shared = &self.shared;

        PoolStats {
            idle: shared.idle_len.load(Ordering::Relaxed),
            rented: shared.rented.load(Ordering::Relaxed),
            allocated: shared.allocated.load(Ordering::Relaxed),
            reused: shared.reused.load(Ordering::Relaxed),
            trimmed: shared.trimmed.load(Ordering::Relaxed),
        }
    }
}

impl<T: Zeroable> Default for SecureBufferPool<T> {
    fn default() -> Self {
        Self::build(PoolConfig::default(), Arc::new(SystemPressure))
    }
}

impl<T: Zeroable> Clone for SecureBufferPool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Zeroable> fmt::Debug for SecureBufferPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBufferPool")
            .field("page_len", &self.shared.page_len)
            .field("idle", &self.idle_count())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
