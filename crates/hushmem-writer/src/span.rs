// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SpanWriter - fixed-capacity writer over borrowed memory.
//!
//! The borrow pins the writer to the scope of its storage: it cannot outlive
//! a stack buffer and cannot hand out storable memory handles.

use core::fmt;

use hushmem_zero::Zeroable;

use crate::cursor::Cursor;
use crate::error::WriterError;
use crate::traits::{BufferWriter, MemoryRegion};

/// A fixed-capacity writer over a borrowed slice.
///
/// # Example
///
/// ```rust
/// use hushmem_writer::{BufferWriter, SpanWriter, WriterError};
///
/// fn example() -> Result<(), WriterError> {
///     let mut stack = [0u8; 8];
///     let mut writer = SpanWriter::new(&mut stack);
///
///     writer.write(b"abc")?;
///     assert_eq!(writer.written_span(), b"abc");
///
///     writer.reset(); // zeroes the three committed bytes
///     assert_eq!(writer.written(), 0);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct SpanWriter<'a, T: Zeroable = u8> {
    span: &'a mut [T],
    cursor: Cursor,
}

impl<'a, T: Zeroable> SpanWriter<'a, T> {
    /// Creates a writer whose capacity is the whole of `span`.
    pub fn new(span: &'a mut [T]) -> Self {
        let cursor = Cursor::new(span.len());

        Self { span, cursor }
    }

    /// Total capacity in elements.
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// Elements still free.
    pub fn free_capacity(&self) -> usize {
        self.cursor.free()
    }

    /// The committed prefix `[0, written)`.
    pub fn written_span(&self) -> &[T] {
        &self.span[..self.cursor.position()]
    }

    /// Rewinds the cursor without touching the committed elements.
    pub fn clear(&mut self) {
        self.cursor.clear();
    }

    /// Zeroes the committed elements, then rewinds the cursor.
    pub fn reset(&mut self) {
        self.cursor.reset(self.span);
    }
}

impl<T: Zeroable> BufferWriter<T> for SpanWriter<'_, T> {
    fn advance(&mut self, count: usize) -> Result<(), WriterError> {
        self.cursor.advance(count)
    }

    fn get_span(&mut self, size_hint: usize) -> Result<&mut [T], WriterError> {
        self.cursor.check(size_hint)?;

        Ok(&mut self.span[self.cursor.position()..])
    }

    /// Always fails: a borrowed writer has no storable memory to hand out.
    fn get_memory(&mut self, _size_hint: usize) -> Result<MemoryRegion, WriterError> {
        Err(WriterError::Unsupported {
            operation: "get_memory",
            alternative: "get_span",
        })
    }

    fn written(&self) -> usize {
        self.cursor.position()
    }
}

impl<T: Zeroable> fmt::Debug for SpanWriter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanWriter")
            .field("data", &"REDACTED")
            .field("written", &self.cursor.position())
            .field("capacity", &self.cursor.capacity())
            .finish()
    }
}
