// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Secure buffer pooling with zero-on-release leases.
//!
//! # Components
//!
//! - [`OwnedSecureBuffer`]: a lease over one address-stable allocation.
//!   Releasing it zeroes the whole storage exactly once, then returns it to
//!   its pool or frees it. Release is idempotent and runs on drop.
//! - [`SecureBufferPool`]: a lock-free cache of page-sized leases. Small
//!   requests are served from the idle set, oversized ones are never cached.
//!   [`trim`](SecureBufferPool::trim) evicts idle buffers under memory
//!   pressure.
//! - [`BufferSource`]: picks the secure pool or a [`PlainPool`] per request
//!   and carves the result to exactly the requested length.
//!
//! # Storage Strategies
//!
//! - **Heap** (default): a boxed slice. Never relocated while the lease lives.
//! - **LockedPages** (unix): an anonymous `mmap` region with `mlock` and
//!   `MADV_DONTDUMP`, unmapped after zeroing.
//!
//! # Example
//!
//! ```rust
//! use hushmem_pool::{PoolError, SecureBufferPool};
//!
//! fn example() -> Result<(), PoolError> {
//!     let pool = SecureBufferPool::<u8>::default();
//!
//!     let mut lease = pool.rent(32)?;
//!     let first = lease.as_ptr();
//!     lease.content_mut()?[0] = 0x42;
//!     drop(lease); // zeroed, back in the idle set
//!
//!     let lease = pool.rent(32)?;
//!     assert_eq!(lease.as_ptr(), first); // reused
//!     assert!(lease.content()?.iter().all(|&b| b == 0));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[cfg(test)]
mod tests;

#[cfg(unix)]
mod page;

mod config;
mod error;
mod lease;
mod plain;
mod pool;
mod pressure;
mod shared;
mod source;
mod storage;

pub use config::{
    DEFAULT_PAGE_SIZE, DEFAULT_PRESSURE_THRESHOLD, DEFAULT_TRIM_INTERVAL, LockFailure, PoolConfig,
    StorageStrategy,
};
pub use error::{AllocError, ConfigError, PoolError};
pub use lease::OwnedSecureBuffer;
pub use plain::{DEFAULT_PLAIN_MAX_IDLE, PlainBuffer, PlainPool};
pub use pool::{PoolStats, SecureBufferPool};
pub use pressure::{FixedPressure, MemoryLoad, PressureSource, SystemPressure};
pub use shared::{shared_pool, shared_source};
pub use source::{BufferOwner, BufferSource, RentedBuffer};
