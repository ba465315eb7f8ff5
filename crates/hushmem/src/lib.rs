// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! <p align="center"><em>Secure, reusable memory buffers for short-lived secrets.</em></p>
//!
//! ---
//!
//! Hushmem hands out buffers for keys, plaintext and other short-lived
//! sensitive data, and guarantees their contents are zeroed before the
//! memory is reused or freed.
//!
//! # Features
//!
//! - **Exactly-once zeroing**: every lease zeroes its whole storage on release, and release is idempotent
//! - **Pooling**: page-sized buffers are recycled through a lock-free idle set
//! - **Pressure-aware**: idle buffers are evicted when system memory runs high
//! - **Address-stable**: storage never moves while leased, optionally `mlock`ed and kept out of core dumps
//! - **Scoped guards**: zero caller-owned stack or heap memory at end of scope
//! - **Writers**: fixed-capacity and growable writers over secure storage, plus segment flattening
//!
//! # Crates
//!
//! | Module                | Crate            |
//! |-----------------------|------------------|
//! | [`zero`]              | `hushmem-zero`   |
//! | [`pool`]              | `hushmem-pool`   |
//! | [`writer`]            | `hushmem-writer` |
//!
//! # Quick Start
//!
//! ```rust
//! use hushmem::pool::shared_source;
//! use hushmem::writer::{BufferWriter, Dispose, GrowableSecureWriter, consume_as_contiguous};
//! use hushmem::zero::{ZeroizingSliceGuard, is_slice_zeroized};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Exact-size secure buffer, zeroed and pooled again on drop.
//!     let mut key = shared_source().rent(32, true)?;
//!     key.as_mut_slice()?.fill(0x42);
//!     drop(key);
//!
//!     // Zero a stack buffer at end of scope.
//!     let mut nonce = [0u8; 12];
//!     {
//!         let mut guard = ZeroizingSliceGuard::wrap(&mut nonce);
//!         guard.fill(0x07);
//!     }
//!     assert!(is_slice_zeroized(&nonce));
//!
//!     // Write across pooled segments, then flatten into one lease.
//!     let mut writer = GrowableSecureWriter::new(shared_source().secure_pool().clone());
//!     writer.write(b"hello, ")?;
//!     writer.write(b"world")?;
//!
//!     let mut lease = consume_as_contiguous(writer, true, shared_source())?;
//!     assert_eq!(lease.as_slice()?, b"hello, world");
//!     lease.dispose();
//!
//!     Ok(())
//! }
//! ```

pub use hushmem_pool as pool;
pub use hushmem_writer as writer;
pub use hushmem_zero as zero;
