// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! FixedBufferWriter - fixed-capacity writer over owned storage.
//!
//! Same cursor contract as [`SpanWriter`](crate::SpanWriter), but the writer
//! owns its storage, so it can be moved, stored in long-lived structures and
//! hand out [`MemoryRegion`] handles.

use core::fmt;
use core::marker::PhantomData;

use hushmem_pool::{BufferSource, OwnedSecureBuffer, RentedBuffer, SecureBufferPool};
use hushmem_zero::Zeroable;

use crate::cursor::Cursor;
use crate::error::WriterError;
use crate::traits::{BufferWriter, Dispose, MemoryRegion, WriterStorage};

/// A fixed-capacity writer that owns its storage.
///
/// Dropping or [disposing](Dispose::dispose) the writer releases the storage
/// through [`WriterStorage::release_storage`], which zeroes it.
///
/// # Example
///
/// ```rust
/// use hushmem_pool::SecureBufferPool;
/// use hushmem_writer::{BufferWriter, FixedBufferWriter, WriterError};
///
/// fn example() -> Result<(), WriterError> {
///     let pool = SecureBufferPool::<u8>::default();
///     let mut writer = FixedBufferWriter::rent_from(&pool, 16)?;
///
///     let region = writer.get_memory(4)?;
///     writer.region_mut(region)?[..4].copy_from_slice(b"seed");
///     writer.advance(4)?;
///
///     assert_eq!(writer.written_span()?, b"seed");
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct FixedBufferWriter<T: Zeroable = u8, S: WriterStorage<T> = OwnedSecureBuffer<T>> {
    storage: Option<S>,
    cursor: Cursor,
    _marker: PhantomData<T>,
}

impl<T: Zeroable, S: WriterStorage<T>> FixedBufferWriter<T, S> {
    /// Creates a writer whose capacity is the whole of `storage`.
    ///
    /// # Errors
    ///
    /// Propagates a storage that is already released.
    pub fn new(storage: S) -> Result<Self, WriterError> {
        let capacity = storage.storage()?.len();

        Ok(Self {
            storage: Some(storage),
            cursor: Cursor::new(capacity),
            _marker: PhantomData,
        })
    }

    fn live(&self) -> Result<&S, WriterError> {
        self.storage.as_ref().ok_or(WriterError::Disposed)
    }

    fn live_mut(&mut self) -> Result<&mut S, WriterError> {
        self.storage.as_mut().ok_or(WriterError::Disposed)
    }

    /// Total capacity in elements.
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// Elements still free.
    pub fn free_capacity(&self) -> usize {
        self.cursor.free()
    }

    /// Returns `true` once the storage was released.
    pub fn is_disposed(&self) -> bool {
        self.storage.is_none()
    }

    /// The committed prefix `[0, written)`.
    pub fn written_span(&self) -> Result<&[T], WriterError> {
        Ok(&self.live()?.storage()?[..self.cursor.position()])
    }

    /// Resolves a handle from [`get_memory`](BufferWriter::get_memory).
    ///
    /// # Errors
    ///
    /// [`WriterError::OutOfRange`] if the region does not fit this writer.
    pub fn region_mut(&mut self, region: MemoryRegion) -> Result<&mut [T], WriterError> {
        self.live()?;
        self.cursor.check_region(&region)?;
        let storage = self.live_mut()?.storage_mut()?;

        Ok(&mut storage[region.offset..region.offset + region.len])
    }

    /// Rewinds the cursor without touching the committed elements.
    pub fn clear(&mut self) {
        self.cursor.clear();
    }

    /// Zeroes the committed elements, then rewinds the cursor.
    pub fn reset(&mut self) {
        match self.storage.as_mut().map(|s| s.storage_mut()) {
            Some(Ok(storage)) => self.cursor.reset(storage),
            _ => self.cursor.clear(),
        }
    }

    /// Gives back the storage without releasing it.
    pub fn into_inner(mut self) -> Option<S> {
        self.storage.take()
    }
}

impl<T: Zeroable> FixedBufferWriter<T, OwnedSecureBuffer<T>> {
    /// Rents at least `capacity` elements from `pool`.
    ///
    /// The writer's capacity is the whole lease, which may be larger after
    /// page rounding.
    pub fn rent_from(pool: &SecureBufferPool<T>, capacity: usize) -> Result<Self, WriterError> {
        Self::new(pool.rent(capacity)?)
    }
}

impl<T: Zeroable> FixedBufferWriter<T, RentedBuffer<T>> {
    /// Rents exactly `capacity` elements from `source`.
    pub fn rent_exact(
        source: &BufferSource<T>,
        capacity: usize,
        sensitive: bool,
    ) -> Result<Self, WriterError> {
        Self::new(source.rent(capacity, sensitive)?)
    }
}

impl<T: Zeroable, S: WriterStorage<T>> BufferWriter<T> for FixedBufferWriter<T, S> {
    fn advance(&mut self, count: usize) -> Result<(), WriterError> {
        self.live()?;
        self.cursor.advance(count)
    }

    fn get_span(&mut self, size_hint: usize) -> Result<&mut [T], WriterError> {
        self.live()?;
        self.cursor.check(size_hint)?;
        let position = self.cursor.position();

        Ok(&mut self.live_mut()?.storage_mut()?[position..])
    }

    fn get_memory(&mut self, size_hint: usize) -> Result<MemoryRegion, WriterError> {
        self.live()?;
        self.cursor.tail_region(size_hint)
    }

    fn written(&self) -> usize {
        self.cursor.position()
    }
}

impl<T: Zeroable, S: WriterStorage<T>> Dispose for FixedBufferWriter<T, S> {
    fn dispose(&mut self) {
        if let Some(mut storage) = self.storage.take() {
            storage.release_storage();
        }

        self.cursor = Cursor::default();
    }
}

impl<T: Zeroable, S: WriterStorage<T>> Drop for FixedBufferWriter<T, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: Zeroable, S: WriterStorage<T>> fmt::Debug for FixedBufferWriter<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedBufferWriter")
            .field("data", &"REDACTED")
            .field("written", &self.cursor.position())
            .field("capacity", &self.cursor.capacity())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
