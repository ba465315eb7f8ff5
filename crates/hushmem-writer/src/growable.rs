// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! GrowableSecureWriter - append-only writer over pooled segments.
//!
//! Each segment is a lease rented from a [`SecureBufferPool`]. When the tail
//! segment cannot satisfy a request a new one is rented; earlier segments
//! keep their committed prefix and are never written again.
//!
//! Disposal releases every segment, which zeroes it before it returns to the
//! pool.

use alloc::vec::Vec;
use core::fmt;

use hushmem_pool::{OwnedSecureBuffer, SecureBufferPool};
use hushmem_zero::Zeroable;

use crate::error::WriterError;
use crate::traits::{BufferWriter, Dispose, MemoryRegion, SegmentedSource};

struct Segment<T: Zeroable> {
    lease: OwnedSecureBuffer<T>,
    committed: usize,
}

impl<T: Zeroable> Segment<T> {
    fn free(&self) -> usize {
        self.lease.len() - self.committed
    }
}

/// A growable writer whose storage is drawn from a [`SecureBufferPool`].
///
/// # Example
///
/// ```rust
/// use hushmem_pool::SecureBufferPool;
/// use hushmem_writer::{BufferWriter, Dispose, GrowableSecureWriter, WriterError};
///
/// fn example() -> Result<(), WriterError> {
///     let pool = SecureBufferPool::<u8>::default();
///     let mut writer = GrowableSecureWriter::new(pool.clone());
///
///     writer.write(&[0xAA; 4096])?;
///     writer.write(&[0xBB; 100])?; // spills into a second segment
///
///     assert_eq!(writer.len(), 4196);
///     assert_eq!(writer.segment_count(), 2);
///
///     writer.dispose();
///     assert_eq!(pool.idle_count(), 2);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct GrowableSecureWriter<T: Zeroable = u8> {
    pool: SecureBufferPool<T>,
    segments: Vec<Segment<T>>,
    len: usize,
    segment_hint: usize,
    disposed: bool,
}

impl<T: Zeroable> GrowableSecureWriter<T> {
    /// Creates a writer whose segments are at least one page long.
    pub fn new(pool: SecureBufferPool<T>) -> Self {
        let segment_hint = pool.page_len();

        Self::with_segment_hint(pool, segment_hint)
    }

    /// Creates a writer whose segments are at least `segment_hint` elements long.
    ///
    /// Hints above the pool's page length produce dedicated, unpooled segments.
    pub fn with_segment_hint(pool: SecureBufferPool<T>, segment_hint: usize) -> Self {
        Self {
            pool,
            segments: Vec::new(),
            len: 0,
            segment_hint: segment_hint.max(1),
            disposed: false,
        }
    }

    fn ensure_live(&self) -> Result<(), WriterError> {
        if self.disposed {
            return Err(WriterError::Disposed);
        }

        Ok(())
    }

    /// Makes sure the tail segment has at least `size_hint` (at least one)
    /// free elements and returns its index.
    fn reserve(&mut self, size_hint: usize) -> Result<usize, WriterError> {
        self.ensure_live()?;

        let needed = size_hint.max(1);

        if let Some(last) = self.segments.last()
            && last.free() >= needed
        {
            return Ok(self.segments.len() - 1);
        }

        let lease = self.pool.rent(needed.max(self.segment_hint))?;
        tracing::trace!(
            segment = self.segments.len(),
            len = lease.len(),
            "growable writer rented segment"
        );

        self.segments.push(Segment {
            lease,
            committed: 0,
        });

        Ok(self.segments.len() - 1)
    }

    /// Total committed elements across all segments.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments rented so far.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Minimum segment length in elements.
    pub fn segment_hint(&self) -> usize {
        self.segment_hint
    }

    /// Returns `true` once [`dispose`](Dispose::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Resolves a handle from [`get_memory`](BufferWriter::get_memory).
    ///
    /// # Errors
    ///
    /// [`WriterError::OutOfRange`] if the region does not lie within a segment.
    pub fn region_mut(&mut self, region: MemoryRegion) -> Result<&mut [T], WriterError> {
        self.ensure_live()?;

        let segment = self
            .segments
            .get_mut(region.segment)
            .ok_or(WriterError::OutOfRange { param: "region" })?;
        let content = segment.lease.content_mut()?;
        let end = region
            .offset
            .checked_add(region.len)
            .filter(|&end| end <= content.len())
            .ok_or(WriterError::OutOfRange { param: "region" })?;

        Ok(&mut content[region.offset..end])
    }
}

impl<T: Zeroable> BufferWriter<T> for GrowableSecureWriter<T> {
    /// Commits `count` elements of the tail segment.
    ///
    /// # Errors
    ///
    /// [`WriterError::OutOfRange`] if `count` exceeds what the last
    /// [`get_span`](BufferWriter::get_span) made available.
    fn advance(&mut self, count: usize) -> Result<(), WriterError> {
        self.ensure_live()?;

        if count == 0 {
            return Ok(());
        }

        let available = self.segments.last().map_or(0, Segment::free);
        let Some(last) = self.segments.last_mut().filter(|_| count <= available) else {
            return Err(WriterError::OutOfRange { param: "count" });
        };

        last.committed += count;
        self.len += count;

        Ok(())
    }

    fn get_span(&mut self, size_hint: usize) -> Result<&mut [T], WriterError> {
        let index = self.reserve(size_hint)?;
        let segment = &mut self.segments[index];
        let committed = segment.committed;

        Ok(&mut segment.lease.content_mut()?[committed..])
    }

    fn get_memory(&mut self, size_hint: usize) -> Result<MemoryRegion, WriterError> {
        let index = self.reserve(size_hint)?;
        let segment = &self.segments[index];

        Ok(MemoryRegion {
            segment: index,
            offset: segment.committed,
            len: segment.free(),
        })
    }

    fn written(&self) -> usize {
        self.len
    }
}

impl<T: Zeroable> SegmentedSource<T> for GrowableSecureWriter<T> {
    fn segments(&self) -> impl Iterator<Item = &[T]> {
        self.segments.iter().filter_map(|segment| {
            segment
                .lease
                .content()
                .ok()
                .map(|content| &content[..segment.committed])
        })
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<T: Zeroable> Dispose for GrowableSecureWriter<T> {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        let released = self.segments.len();
        for mut segment in self.segments.drain(..) {
            segment.lease.release();
        }

        self.len = 0;
        self.disposed = true;

        tracing::trace!(released, "disposed growable writer");
    }
}

impl<T: Zeroable> Drop for GrowableSecureWriter<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: Zeroable> fmt::Debug for GrowableSecureWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableSecureWriter")
            .field("data", &"REDACTED")
            .field("len", &self.len)
            .field("segments", &self.segments.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
