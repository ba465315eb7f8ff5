// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Buffer writers over secure storage.
//!
//! # Writers
//!
//! | Writer                   | Storage                        | Capacity | Memory handles |
//! |--------------------------|--------------------------------|----------|----------------|
//! | [`SpanWriter`]           | borrowed `&mut [T]`            | fixed    | no             |
//! | [`FixedBufferWriter`]    | owned ([`WriterStorage`])      | fixed    | yes            |
//! | [`GrowableSecureWriter`] | pooled segments                | grows    | yes            |
//!
//! The two fixed-capacity writers share one cursor contract: `advance` and
//! `get_span` never grow and fail with [`WriterError::Capacity`] instead.
//! `clear()` rewinds without touching bytes, `reset()` zeroes exactly the
//! committed prefix first.
//!
//! # Flattening
//!
//! [`flatten_as_lease`] turns any [`SegmentedSource`] into one contiguous
//! [`RefSpanLease`], borrowing a single segment directly and copying
//! multiple segments into a rented buffer. [`consume_as_contiguous`] does the
//! same while taking ownership of the source and disposing it.
//!
//! ```rust
//! use hushmem_pool::{BufferSource, SecureBufferPool};
//! use hushmem_writer::{BufferWriter, Dispose, GrowableSecureWriter, WriterError, consume_as_contiguous};
//!
//! fn example() -> Result<(), WriterError> {
//!     let buffers = BufferSource::<u8>::default();
//!     let mut writer = GrowableSecureWriter::with_segment_hint(SecureBufferPool::<u8>::default(), 8);
//!
//!     writer.write(b"secret ")?;
//!     writer.write(b"material")?;
//!
//!     let mut lease = consume_as_contiguous(writer, true, &buffers)?;
//!     assert_eq!(lease.as_slice()?, b"secret material");
//!
//!     lease.dispose(); // zeroed and returned to the secure pool
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

extern crate alloc;

#[cfg(test)]
mod tests;

mod cursor;
mod error;
mod fixed;
mod flatten;
mod growable;
mod span;
mod traits;

pub use error::WriterError;
pub use fixed::FixedBufferWriter;
pub use flatten::{RefSpanLease, consume_as_contiguous, flatten_as_lease};
pub use growable::GrowableSecureWriter;
pub use span::SpanWriter;
pub use traits::{BufferWriter, Dispose, MemoryRegion, SegmentedSource, WriterStorage};
