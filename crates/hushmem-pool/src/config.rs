// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Pool configuration.

use core::num::NonZeroUsize;

use crate::error::ConfigError;

/// Default page granularity, in bytes.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Default memory-load fraction at or above which `trim()` evicts idle buffers.
pub const DEFAULT_PRESSURE_THRESHOLD: f64 = 0.90;

/// Default number of returns between opportunistic trims.
pub const DEFAULT_TRIM_INTERVAL: usize = 256;

/// How the backing storage of secure buffers is obtained.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum StorageStrategy {
    /// Boxed heap slice. Address-stable for its lifetime, not locked in RAM.
    #[default]
    Heap,
    /// Anonymous `mmap` region, `mlock`ed and excluded from core dumps (unix only).
    LockedPages,
}

/// What to do when `mlock` fails under [`StorageStrategy::LockedPages`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum LockFailure {
    /// Release the mapping and report [`AllocError::Mlock`](crate::AllocError::Mlock).
    #[default]
    Fail,
    /// Keep the unlocked mapping and log a warning.
    Tolerate,
}

/// Configuration for a [`SecureBufferPool`](crate::SecureBufferPool).
///
/// Setters never fail; the pool validates the whole configuration on creation.
///
/// ```rust
/// use hushmem_pool::{PoolConfig, SecureBufferPool};
///
/// let config = PoolConfig::default()
///     .with_page_size(8192)
///     .with_pressure_threshold(0.75)
///     .with_trim_interval(None);
///
/// let pool = SecureBufferPool::<u8>::new(config).expect("valid config");
/// assert_eq!(pool.page_len(), 8192);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    /// Page granularity in bytes. Must be a non-zero power of two.
    pub page_size: usize,
    /// Load fraction in `[0, 1]`; `0.0` means "always under pressure".
    pub pressure_threshold: f64,
    /// Backing-storage strategy.
    pub strategy: StorageStrategy,
    /// Reaction to `mlock` failures.
    pub lock_failure: LockFailure,
    /// Returns between opportunistic trims; `None` leaves trimming to the caller.
    pub trim_interval: Option<NonZeroUsize>,
    /// Upper bound on idle buffers; `None` is unbounded.
    pub max_idle: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            pressure_threshold: DEFAULT_PRESSURE_THRESHOLD,
            strategy: StorageStrategy::Heap,
            lock_failure: LockFailure::Fail,
            trim_interval: NonZeroUsize::new(DEFAULT_TRIM_INTERVAL),
            max_idle: None,
        }
    }
}

impl PoolConfig {
    /// Sets the page granularity in bytes.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the high-pressure threshold.
    pub fn with_pressure_threshold(mut self, threshold: f64) -> Self {
        self.pressure_threshold = threshold;
        self
    }

    /// Sets the storage strategy.
    pub fn with_strategy(mut self, strategy: StorageStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the reaction to `mlock` failures.
    pub fn with_lock_failure(mut self, lock_failure: LockFailure) -> Self {
        self.lock_failure = lock_failure;
        self
    }

    /// Sets the opportunistic trim interval.
    pub fn with_trim_interval(mut self, interval: Option<NonZeroUsize>) -> Self {
        self.trim_interval = interval;
        self
    }

    /// Caps the number of idle buffers kept for reuse.
    pub fn with_max_idle(mut self, max_idle: Option<usize>) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Checks every setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || !self.page_size.is_power_of_two() {
            return Err(ConfigError::OutOfRange {
                param: "page_size",
                value: self.page_size as f64,
            });
        }

        if !(0.0..=1.0).contains(&self.pressure_threshold) {
            return Err(ConfigError::OutOfRange {
                param: "pressure_threshold",
                value: self.pressure_threshold,
            });
        }

        if self.strategy == StorageStrategy::LockedPages && !cfg!(unix) {
            return Err(ConfigError::UnsupportedStrategy(self.strategy));
        }

        Ok(())
    }
}
