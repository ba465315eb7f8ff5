// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Writer, storage and segmented-source traits.

use alloc::boxed::Box;

use hushmem_pool::{OwnedSecureBuffer, RentedBuffer};
use hushmem_zero::{Zeroable, fast_zeroize_slice};

use crate::error::WriterError;

/// A storable handle to a writable window of a writer's storage.
///
/// Unlike a span it borrows nothing, so it can be kept across suspension
/// points and resolved later with the writer's `region_mut`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct MemoryRegion {
    pub(crate) segment: usize,
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl MemoryRegion {
    /// Index of the segment the region lives in. Always `0` for fixed writers.
    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Start of the region within its segment, in elements.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the region in elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the region is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An incremental, append-only writer.
///
/// Callers obtain the uncommitted tail with [`get_span`](Self::get_span),
/// fill some prefix of it, then commit that prefix with
/// [`advance`](Self::advance).
pub trait BufferWriter<T: Zeroable> {
    /// Commits `count` more elements.
    ///
    /// # Errors
    ///
    /// [`WriterError::Capacity`] if fewer than `count` elements are free; the
    /// cursor is left unchanged.
    fn advance(&mut self, count: usize) -> Result<(), WriterError>;

    /// Returns the uncommitted tail, at least `size_hint` elements long.
    ///
    /// A hint of `0` asks for any non-empty tail when the writer can grow.
    fn get_span(&mut self, size_hint: usize) -> Result<&mut [T], WriterError>;

    /// Returns a storable handle to the uncommitted tail.
    fn get_memory(&mut self, size_hint: usize) -> Result<MemoryRegion, WriterError>;

    /// Number of committed elements.
    fn written(&self) -> usize;

    /// Copies `data` into the tail and commits it.
    fn write(&mut self, data: &[T]) -> Result<(), WriterError> {
        if data.is_empty() {
            return Ok(());
        }

        let span = self.get_span(data.len())?;
        span[..data.len()].copy_from_slice(data);

        self.advance(data.len())
    }
}

/// Owned, fixed-length storage a [`FixedBufferWriter`](crate::FixedBufferWriter)
/// can write into.
pub trait WriterStorage<T: Zeroable> {
    /// The whole storage.
    fn storage(&self) -> Result<&[T], WriterError>;

    /// The whole storage, for writing.
    fn storage_mut(&mut self) -> Result<&mut [T], WriterError>;

    /// Zeroes and gives back the storage. Idempotent.
    fn release_storage(&mut self);
}

impl<T: Zeroable> WriterStorage<T> for Box<[T]> {
    fn storage(&self) -> Result<&[T], WriterError> {
        Ok(self)
    }

    fn storage_mut(&mut self) -> Result<&mut [T], WriterError> {
        Ok(self)
    }

    fn release_storage(&mut self) {
        fast_zeroize_slice(self);
    }
}

impl<T: Zeroable> WriterStorage<T> for OwnedSecureBuffer<T> {
    fn storage(&self) -> Result<&[T], WriterError> {
        Ok(self.content()?)
    }

    fn storage_mut(&mut self) -> Result<&mut [T], WriterError> {
        Ok(self.content_mut()?)
    }

    fn release_storage(&mut self) {
        self.release();
    }
}

impl<T: Zeroable> WriterStorage<T> for RentedBuffer<T> {
    fn storage(&self) -> Result<&[T], WriterError> {
        Ok(self.as_slice()?)
    }

    fn storage_mut(&mut self) -> Result<&mut [T], WriterError> {
        Ok(self.as_mut_slice()?)
    }

    fn release_storage(&mut self) {
        self.release();
    }
}

/// A logically contiguous sequence stored as one or more segments.
pub trait SegmentedSource<T: Zeroable> {
    /// The segments, in order. Empty segments may be yielded and are skipped
    /// by consumers.
    fn segments(&self) -> impl Iterator<Item = &[T]>;

    /// Total number of elements across all segments.
    fn len(&self) -> usize;

    /// Returns `true` if the source holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Zeroable> SegmentedSource<T> for [T] {
    fn segments(&self) -> impl Iterator<Item = &[T]> {
        core::iter::once(self)
    }

    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T: Zeroable> SegmentedSource<T> for [&[T]] {
    fn segments(&self) -> impl Iterator<Item = &[T]> {
        self.iter().map(|segment| &segment[..])
    }

    fn len(&self) -> usize {
        self.iter().map(|segment| segment.len()).sum()
    }
}

/// Explicit, idempotent release of owned resources.
pub trait Dispose {
    /// Zeroes and releases everything owned. Calling it again is a no-op.
    fn dispose(&mut self);
}
