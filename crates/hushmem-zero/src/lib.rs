// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Zeroization primitives and scoped zero-on-exit guards.
//!
//! # The Primitive
//!
//! [`fast_zeroize_slice`] overwrites a slice with zeros using `write_bytes`
//! (memset) followed by a volatile read and a compiler fence, so the store
//! survives dead-store elimination even when nothing reads the buffer again.
//!
//! # Scoped Lifetimes
//!
//! [`ZeroizingSliceGuard`] borrows caller-owned memory (a stack array, a
//! slice of a `Vec`) and zeroes all of it exactly when the guard is released
//! or dropped. The guard never owns or frees the storage.
//!
//! ```rust
//! use hushmem_zero::{ZeroizingSliceGuard, is_slice_zeroized};
//!
//! let mut key = [0u8; 32];
//! {
//!     let mut guard = ZeroizingSliceGuard::wrap(&mut key);
//!     guard[..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
//! } // guard drops here → key is zeroized
//!
//! assert!(is_slice_zeroized(&key));
//! ```
//!
//! # Element Types
//!
//! Every routine is generic over [`Zeroable`], the marker for types whose
//! all-zero bit pattern is a valid value (integers, floats, `bool`, `char`).

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[cfg(test)]
mod tests;

mod guard;
mod zeroize;

pub use guard::{ZeroizingSliceGuard, ZeroizingVecGuard};
pub use zeroize::{
    Zeroable, fast_zeroize_slice, fast_zeroize_vec, is_slice_zeroized, is_vec_fully_zeroized,
};
