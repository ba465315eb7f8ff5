// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use hushmem_zero::is_slice_zeroized;

use crate::tests::utils::test_pool;
use crate::{BufferWriter, Dispose, GrowableSecureWriter, SegmentedSource, WriterError};

fn collect(writer: &GrowableSecureWriter<u8>) -> Vec<u8> {
    writer.segments().flatten().copied().collect()
}

// =============================================================================
// Growth
// =============================================================================

#[test]
fn test_new_uses_page_hint() {
    let pool = test_pool();
    let writer = GrowableSecureWriter::new(pool.clone());

    assert_eq!(writer.segment_hint(), pool.page_len());
    assert_eq!(writer.segment_count(), 0);
    assert!(writer.is_empty());
}

#[test]
fn test_get_span_rents_lazily() {
    let pool = test_pool();
    let mut writer = GrowableSecureWriter::new(pool.clone());

    let span = writer.get_span(0).expect("Failed to get_span(0)");

    assert_eq!(span.len(), 4096);
    assert_eq!(writer.segment_count(), 1);
    assert_eq!(pool.stats().rented, 1);
}

#[test]
fn test_grows_past_first_segment() {
    let mut writer = GrowableSecureWriter::new(test_pool());

    writer.write(&[1; 4000]).expect("Failed to write(..)");
    writer.write(&[2; 200]).expect("Failed to write(..)");

    assert_eq!(writer.len(), 4200);
    assert_eq!(writer.written(), 4200);
    assert_eq!(writer.segment_count(), 2);

    let sizes: Vec<usize> = writer.segments().map(<[u8]>::len).collect();
    assert_eq!(sizes, vec![4000, 200]);
}

#[test]
fn test_large_hint_gets_dedicated_segment() {
    let pool = test_pool();
    let mut writer = GrowableSecureWriter::new(pool.clone());

    let span = writer.get_span(10_000).expect("Failed to get_span(..)");

    assert_eq!(span.len(), 10_000);
    assert_eq!(pool.stats().rented, 0);
}

#[test]
fn test_segment_hint_is_a_minimum() {
    let mut writer = GrowableSecureWriter::with_segment_hint(test_pool(), 8192);

    let span = writer.get_span(1).expect("Failed to get_span(..)");

    assert_eq!(span.len(), 8192);
}

#[test]
fn test_zero_segment_hint_is_clamped() {
    let writer = GrowableSecureWriter::with_segment_hint(test_pool(), 0);

    assert_eq!(writer.segment_hint(), 1);
}

#[test]
fn test_content_is_append_ordered() {
    let mut writer = GrowableSecureWriter::with_segment_hint(test_pool(), 1);
    let expected: Vec<u8> = (0..=255).cycle().take(9000).collect();

    for chunk in expected.chunks(700) {
        writer.write(chunk).expect("Failed to write(..)");
    }

    assert_eq!(writer.len(), 9000);
    assert_eq!(collect(&writer), expected);
}

// =============================================================================
// advance()
// =============================================================================

#[test]
fn test_advance_without_span_fails() {
    let mut writer = GrowableSecureWriter::new(test_pool());

    assert_eq!(
        writer.advance(1),
        Err(WriterError::OutOfRange { param: "count" })
    );
    assert!(writer.advance(0).is_ok());
}

#[test]
fn test_advance_beyond_span_fails() {
    let mut writer = GrowableSecureWriter::new(test_pool());
    writer.get_span(1).expect("Failed to get_span(..)");

    assert_eq!(
        writer.advance(4097),
        Err(WriterError::OutOfRange { param: "count" })
    );
    assert_eq!(writer.len(), 0);

    writer.advance(4096).expect("Failed to advance(..)");
    assert_eq!(writer.len(), 4096);
}

// =============================================================================
// get_memory() / region_mut()
// =============================================================================

#[test]
fn test_get_memory_roundtrip() {
    let mut writer = GrowableSecureWriter::new(test_pool());
    writer.write(&[0; 4090]).expect("Failed to write(..)");

    let region = writer.get_memory(16).expect("Failed to get_memory(..)");
    assert_eq!(region.segment(), 1);
    assert_eq!(region.offset(), 0);

    writer
        .region_mut(region)
        .expect("Failed to region_mut(..)")[..3]
        .copy_from_slice(b"abc");
    writer.advance(3).expect("Failed to advance(..)");

    assert_eq!(&collect(&writer)[4090..], b"abc");
}

#[test]
fn test_region_for_missing_segment_fails() {
    let mut writer = GrowableSecureWriter::new(test_pool());
    let mut other = GrowableSecureWriter::new(test_pool());
    other.write(&[0; 4096]).expect("Failed to write(..)");
    let region = other.get_memory(1).expect("Failed to get_memory(..)");

    assert_eq!(
        writer.region_mut(region).err(),
        Some(WriterError::OutOfRange { param: "region" })
    );
}

// =============================================================================
// dispose()
// =============================================================================

#[test]
fn test_dispose_releases_every_segment() {
    let pool = test_pool();
    let mut writer = GrowableSecureWriter::new(pool.clone());

    writer.write(&[0xEE; 4096]).expect("Failed to write(..)");
    writer.write(&[0xEE; 4096]).expect("Failed to write(..)");
    writer.write(&[0xEE; 10]).expect("Failed to write(..)");
    assert_eq!(writer.segment_count(), 3);

    writer.dispose();

    assert!(writer.is_disposed());
    assert_eq!(writer.len(), 0);
    assert_eq!(pool.idle_count(), 3);

    let leases: Vec<_> = (0..3).map(|_| pool.rent(1).expect("Failed to rent(..)")).collect();
    for lease in &leases {
        assert!(is_slice_zeroized(lease.content().expect("Failed to content()")));
    }
}

#[test]
fn test_dispose_is_idempotent() {
    let pool = test_pool();
    let mut writer = GrowableSecureWriter::new(pool.clone());
    writer.write(&[1; 10]).expect("Failed to write(..)");

    writer.dispose();
    writer.dispose();

    assert_eq!(pool.idle_count(), 1);
}

#[test]
fn test_operations_after_dispose_fail() {
    let mut writer = GrowableSecureWriter::new(test_pool());
    writer.dispose();

    assert_eq!(writer.advance(0), Err(WriterError::Disposed));
    assert_eq!(writer.get_span(1).err(), Some(WriterError::Disposed));
    assert_eq!(writer.get_memory(1), Err(WriterError::Disposed));
    assert_eq!(writer.segments().count(), 0);
}

#[test]
fn test_drop_disposes() {
    let pool = test_pool();

    {
        let mut writer = GrowableSecureWriter::new(pool.clone());
        writer.write(&[3; 3000]).expect("Failed to write(..)");
        writer.write(&[4; 3000]).expect("Failed to write(..)");
    }

    assert_eq!(pool.idle_count(), 2);
    assert_eq!(pool.stats().rented, 0);
}

#[test]
fn test_rent_failure_surfaces_pool_error() {
    let pool = test_pool();
    let mut writer = GrowableSecureWriter::new(pool.clone());
    pool.dispose();

    assert_eq!(
        writer.write(&[1]),
        Err(WriterError::Pool(hushmem_pool::PoolError::Disposed))
    );
}
