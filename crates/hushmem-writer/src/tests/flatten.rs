// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::cell::Cell;

use hushmem_pool::BufferOwner;
use hushmem_zero::Zeroable;

use crate::tests::utils::{test_pool, test_source};
use crate::{
    BufferWriter, Dispose, GrowableSecureWriter, RefSpanLease, SegmentedSource, WriterError,
    consume_as_contiguous, flatten_as_lease,
};

/// A source that declares one length and yields another.
struct LyingSource<'a> {
    segments: [&'a [u8]; 2],
    declared: usize,
}

impl SegmentedSource<u8> for LyingSource<'_> {
    fn segments(&self) -> impl Iterator<Item = &[u8]> {
        self.segments.iter().map(|segment| &segment[..])
    }

    fn len(&self) -> usize {
        self.declared
    }
}

/// Counts disposals through a shared cell so they stay observable after a move.
struct CountingSource<'c, T: Zeroable> {
    data: Vec<T>,
    disposed: &'c Cell<usize>,
}

impl<T: Zeroable> SegmentedSource<T> for CountingSource<'_, T> {
    fn segments(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(3)
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

impl<T: Zeroable> Dispose for CountingSource<'_, T> {
    fn dispose(&mut self) {
        self.disposed.set(self.disposed.get() + 1);
    }
}

// =============================================================================
// flatten_as_lease()
// =============================================================================

#[test]
fn test_flatten_single_segment_is_zero_copy() {
    let source = test_source();
    let data: &[u8] = &[0xDE, 0xAD, 0xBE, 0xEF];

    let lease = flatten_as_lease(data, true, &source).expect("Failed to flatten_as_lease(..)");

    assert!(!lease.has_owner());
    assert!(lease.owner().is_none());
    assert_eq!(lease.as_slice(), Ok(data));
    assert_eq!(
        lease.as_slice().expect("Failed to as_slice()").as_ptr(),
        data.as_ptr()
    );
    assert_eq!(source.secure_pool().stats().allocated, 0);
}

#[test]
fn test_flatten_skips_empty_segments() {
    let source = test_source();
    let segments: [&[u8]; 3] = [&[], &[1, 2, 3], &[]];

    let lease =
        flatten_as_lease(&segments[..], false, &source).expect("Failed to flatten_as_lease(..)");

    assert!(!lease.has_owner());
    assert_eq!(lease.as_slice(), Ok(&[1, 2, 3][..]));
}

#[test]
fn test_flatten_empty_source() {
    let source = test_source();
    let segments: [&[u8]; 0] = [];

    let lease =
        flatten_as_lease(&segments[..], true, &source).expect("Failed to flatten_as_lease(..)");

    assert!(lease.is_empty());
    assert!(!lease.has_owner());
}

#[test]
fn test_flatten_multi_segment_copies_in_order() {
    let source = test_source();
    let segments: [&[u8]; 3] = [b"ab", b"cde", b"f"];

    let mut lease =
        flatten_as_lease(&segments[..], true, &source).expect("Failed to flatten_as_lease(..)");

    assert!(lease.has_owner());
    assert!(matches!(lease.owner(), Some(BufferOwner::Secure(_))));
    assert_eq!(lease.as_slice(), Ok(&b"abcdef"[..]));

    lease.dispose();
    lease.dispose();

    assert_eq!(source.secure_pool().idle_count(), 1);
}

#[test]
fn test_flatten_routes_by_sensitivity() {
    let source = test_source();
    let segments: [&[u8]; 2] = [b"x", b"y"];

    let lease =
        flatten_as_lease(&segments[..], false, &source).expect("Failed to flatten_as_lease(..)");

    assert!(matches!(lease.owner(), Some(BufferOwner::Plain(_))));
}

#[test]
fn test_flatten_writer_pages() {
    let source = test_source();
    let mut writer = GrowableSecureWriter::new(test_pool());
    let first: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();
    let second: Vec<u8> = (0..100).map(|i| (i % 7) as u8 + 1).collect();

    writer.write(&first).expect("Failed to write(..)");
    writer.write(&second).expect("Failed to write(..)");
    assert_eq!(writer.segment_count(), 2);

    let mut lease = flatten_as_lease(&writer, true, &source).expect("Failed to flatten_as_lease(..)");
    let view = lease.as_slice().expect("Failed to as_slice()");

    assert_eq!(view.len(), 4196);
    assert_eq!(&view[..4096], &first[..]);
    assert_eq!(&view[4096..], &second[..]);

    lease.dispose();
    assert!(lease.as_slice().is_err());
}

#[test]
fn test_flatten_overlong_source_releases_buffer() {
    let source = test_source();
    let lying = LyingSource {
        segments: [b"abc", b"def"],
        declared: 4,
    };

    let result = flatten_as_lease(&lying, true, &source);

    assert_eq!(
        result.err(),
        Some(WriterError::SegmentLength {
            expected: 4,
            actual: 6,
        })
    );
    assert_eq!(source.secure_pool().stats().rented, 0);
    assert_eq!(source.secure_pool().idle_count(), 1);
}

#[test]
fn test_flatten_short_source_releases_buffer() {
    let source = test_source();
    let lying = LyingSource {
        segments: [b"abc", b"def"],
        declared: 10,
    };

    let result = flatten_as_lease(&lying, true, &source);

    assert_eq!(
        result.err(),
        Some(WriterError::SegmentLength {
            expected: 10,
            actual: 6,
        })
    );
    assert_eq!(source.secure_pool().idle_count(), 1);
}

#[test]
fn test_flatten_single_segment_length_mismatch() {
    let source = test_source();
    let lying = LyingSource {
        segments: [b"abc", b""],
        declared: 5,
    };

    assert_eq!(
        flatten_as_lease(&lying, true, &source).err(),
        Some(WriterError::SegmentLength {
            expected: 5,
            actual: 3,
        })
    );
}

// =============================================================================
// consume_as_contiguous()
// =============================================================================

#[test]
fn test_consume_single_segment_copies_and_disposes() {
    let source = test_source();
    let disposed = Cell::new(0);
    let counting = CountingSource {
        data: vec![9u8, 8, 7],
        disposed: &disposed,
    };

    let lease =
        consume_as_contiguous(counting, true, &source).expect("Failed to consume_as_contiguous(..)");

    assert!(lease.has_owner());
    assert_eq!(lease.as_slice(), Ok(&[9, 8, 7][..]));
    assert_eq!(disposed.get(), 1);
}

#[test]
fn test_consume_multi_segment_disposes_once() {
    let source = test_source();
    let disposed = Cell::new(0);
    let counting = CountingSource {
        data: (1u8..=10).collect(),
        disposed: &disposed,
    };

    let lease =
        consume_as_contiguous(counting, false, &source).expect("Failed to consume_as_contiguous(..)");

    assert_eq!(lease.len(), 10);
    assert_eq!(lease.as_slice(), Ok(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10][..]));
    assert_eq!(disposed.get(), 1);
}

#[test]
fn test_consume_disposes_on_error() {
    let source = test_source();
    let disposed = Cell::new(0);
    let counting = CountingSource {
        data: vec![1u8; 5],
        disposed: &disposed,
    };
    source.secure_pool().dispose();

    let result = consume_as_contiguous(counting, true, &source);

    assert_eq!(
        result.err(),
        Some(WriterError::Pool(hushmem_pool::PoolError::Disposed))
    );
    assert_eq!(disposed.get(), 1);
}

#[test]
fn test_consume_writer_returns_segments_to_pool() {
    let pool = test_pool();
    let source = test_source();
    let mut writer = GrowableSecureWriter::new(pool.clone());
    writer.write(&[0x42; 5000]).expect("Failed to write(..)");
    writer.write(&[0x43; 10]).expect("Failed to write(..)");

    let lease: RefSpanLease<'static, u8> =
        consume_as_contiguous(writer, true, &source).expect("Failed to consume_as_contiguous(..)");

    assert_eq!(lease.len(), 5010);
    assert_eq!(pool.idle_count(), 1);
    assert_eq!(pool.stats().rented, 0);
}

#[test]
fn test_debug_redacts() {
    let data: &[u8] = &[0x99; 4];
    let lease = RefSpanLease::borrowed(data);

    let debug = format!("{:?}", lease);

    assert!(debug.contains("REDACTED"));
    assert!(!debug.contains("153"));
}
