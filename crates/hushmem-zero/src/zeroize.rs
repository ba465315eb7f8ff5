// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Bulk zeroization that the optimizer cannot remove.

use alloc::vec::Vec;
use core::sync::atomic::{Ordering, compiler_fence};

/// Marker for element types that can be bulk-zeroized with memset.
///
/// # Safety
///
/// Implementors guarantee that the all-zero bit pattern is a valid value of
/// the type and that the type has no padding bytes, so the storage can be
/// written and inspected as raw bytes.
pub unsafe trait Zeroable: Copy + Send + Sync + 'static {
    /// Returns the all-zero value of the type.
    #[inline(always)]
    fn zeroed() -> Self {
        // SAFETY: guaranteed valid by the implementor of this trait.
        unsafe { core::mem::zeroed() }
    }
}

macro_rules! impl_zeroable {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: primitive scalar, zero is a valid value and there is no padding.
            unsafe impl Zeroable for $ty {}
        )*
    };
}

impl_zeroable!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
);

/// Overwrites every element of `slice` with zero.
///
/// Uses `write_bytes` (memset) so the loop vectorizes, then a volatile read
/// and a compiler fence so the store is considered observable.
///
/// Empty slices are a no-op. Zeroizing an already-zero slice is harmless.
///
/// # Example
///
/// ```
/// use hushmem_zero::fast_zeroize_slice;
///
/// let mut data = [0xDEADBEEFu32; 8];
/// fast_zeroize_slice(&mut data);
/// assert!(data.iter().all(|&v| v == 0));
/// ```
#[inline(always)]
pub fn fast_zeroize_slice<T: Zeroable>(slice: &mut [T]) {
    if slice.is_empty() {
        return;
    }

    let byte_len = core::mem::size_of_val(slice);
    // SAFETY: the slice is valid for `byte_len` bytes and zero is a valid `T`.
    unsafe {
        core::ptr::write_bytes(slice.as_mut_ptr() as *mut u8, 0, byte_len);
        core::ptr::read_volatile(slice.as_ptr() as *const u8);
    }
    compiler_fence(Ordering::SeqCst);
}

/// Zeroizes a `Vec` across its whole allocation, spare capacity included.
///
/// Active elements and the region between `len` and `capacity` are both
/// cleared; `len` is left untouched.
#[inline(always)]
pub fn fast_zeroize_vec<T: Zeroable>(vec: &mut Vec<T>) {
    if vec.capacity() == 0 {
        return;
    }

    let byte_len = vec.capacity() * core::mem::size_of::<T>();
    // SAFETY: the allocation is valid for `capacity` elements.
    unsafe {
        core::ptr::write_bytes(vec.as_mut_ptr() as *mut u8, 0, byte_len);
        core::ptr::read_volatile(vec.as_ptr() as *const u8);
    }
    compiler_fence(Ordering::SeqCst);
}

/// Returns `true` if every byte of `slice` is zero.
///
/// ```
/// use hushmem_zero::is_slice_zeroized;
///
/// assert!(is_slice_zeroized(&[0u16; 4]));
/// assert!(!is_slice_zeroized(&[0u8, 1, 0]));
/// ```
#[inline(never)]
pub fn is_slice_zeroized<T: Zeroable>(slice: &[T]) -> bool {
    let byte_len = core::mem::size_of_val(slice);
    // SAFETY: `Zeroable` types have no padding, every byte is initialized.
    let bytes = unsafe { core::slice::from_raw_parts(slice.as_ptr() as *const u8, byte_len) };

    bytes.iter().all(|&b| b == 0)
}

/// Returns `true` if the whole allocation of `vec` is zero, spare capacity included.
#[inline(never)]
pub fn is_vec_fully_zeroized<T: Zeroable>(vec: &Vec<T>) -> bool {
    let byte_len = vec.capacity() * core::mem::size_of::<T>();
    let base = vec.as_ptr() as *const u8;

    for i in 0..byte_len {
        // SAFETY: `i` is within the allocation; spare capacity is only read as bytes.
        if unsafe { core::ptr::read_volatile(base.add(i)) } != 0 {
            return false;
        }
    }

    true
}
