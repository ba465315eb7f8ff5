// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Segment flattening into one contiguous view.

use core::fmt;

use hushmem_pool::{BufferOwner, BufferSource, RentedBuffer};
use hushmem_zero::Zeroable;

use crate::error::WriterError;
use crate::traits::{Dispose, SegmentedSource};

enum LeaseView<'a, T: Zeroable> {
    Borrowed(&'a [T]),
    Owned(RentedBuffer<T>),
}

/// A contiguous read view, optionally owning the buffer behind it.
///
/// A borrowed lease (no owner) points into the source it was flattened
/// from; disposing it does nothing. An owned lease releases its rented
/// buffer exactly once, on [`dispose`](Dispose::dispose) or drop.
pub struct RefSpanLease<'a, T: Zeroable = u8> {
    view: LeaseView<'a, T>,
}

impl<'a, T: Zeroable> RefSpanLease<'a, T> {
    /// A lease over `view` with no owner.
    pub fn borrowed(view: &'a [T]) -> Self {
        Self {
            view: LeaseView::Borrowed(view),
        }
    }

    /// A lease that owns `buffer` and views exactly its carved length.
    pub fn owned(buffer: RentedBuffer<T>) -> Self {
        Self {
            view: LeaseView::Owned(buffer),
        }
    }

    /// The contiguous view.
    ///
    /// # Errors
    ///
    /// An owned lease fails with a released-buffer error after disposal.
    pub fn as_slice(&self) -> Result<&[T], WriterError> {
        match &self.view {
            LeaseView::Borrowed(view) => Ok(view),
            LeaseView::Owned(buffer) => Ok(buffer.as_slice()?),
        }
    }

    /// Length of the view in elements.
    pub fn len(&self) -> usize {
        match &self.view {
            LeaseView::Borrowed(view) => view.len(),
            LeaseView::Owned(buffer) => buffer.len(),
        }
    }

    /// Returns `true` if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if disposing this lease releases a buffer.
    pub fn has_owner(&self) -> bool {
        matches!(&self.view, LeaseView::Owned(buffer) if !matches!(buffer.owner(), BufferOwner::Empty))
    }

    /// The owner of the rented buffer, if any.
    pub fn owner(&self) -> Option<&BufferOwner<T>> {
        match &self.view {
            LeaseView::Borrowed(_) => None,
            LeaseView::Owned(buffer) => Some(buffer.owner()),
        }
    }
}

impl<T: Zeroable> Dispose for RefSpanLease<'_, T> {
    fn dispose(&mut self) {
        if let LeaseView::Owned(buffer) = &mut self.view {
            buffer.release();
        }
    }
}

impl<T: Zeroable> fmt::Debug for RefSpanLease<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefSpanLease")
            .field("data", &"REDACTED")
            .field("len", &self.len())
            .field("has_owner", &self.has_owner())
            .finish()
    }
}

/// Copies every segment of `source`, in order, into a buffer rented from
/// `buffers`.
///
/// On a length mismatch the rented buffer is released before the error is
/// returned.
fn copy_into_rented<T, S>(
    source: &S,
    sensitive: bool,
    buffers: &BufferSource<T>,
) -> Result<RentedBuffer<T>, WriterError>
where
    T: Zeroable,
    S: SegmentedSource<T> + ?Sized,
{
    let expected = source.len();
    let mut rented = buffers.rent(expected, sensitive)?;

    let mut offset = 0;
    let copied = {
        let target = rented.as_mut_slice()?;

        source.segments().try_for_each(|segment| {
            let end = offset + segment.len();
            if end > expected {
                return Err(WriterError::SegmentLength {
                    expected,
                    actual: end,
                });
            }

            target[offset..end].copy_from_slice(segment);
            offset = end;

            Ok(())
        })
    };

    let result = copied.and_then(|()| {
        if offset != expected {
            return Err(WriterError::SegmentLength {
                expected,
                actual: offset,
            });
        }

        Ok(())
    });

    if let Err(e) = result {
        rented.release();
        tracing::debug!(expected, actual = offset, "segment copy failed, rented buffer released");
        return Err(e);
    }

    Ok(rented)
}

/// Flattens `source` into one contiguous lease.
///
/// - At most one non-empty segment: returns a borrowed lease over that
///   segment with no owner. Nothing is allocated or copied, and the
///   caller keeps responsibility for disposing `source`.
/// - Several segments: rents `source.len()` elements from `buffers` by
///   `sensitive`, copies the segments in order, and returns a lease that
///   owns the rented buffer.
///
/// # Errors
///
/// - [`WriterError::Pool`] if renting fails.
/// - [`WriterError::SegmentLength`] if the segments do not add up to
///   `source.len()`. The rented buffer is released first.
///
/// # Example
///
/// ```rust
/// use hushmem_pool::BufferSource;
/// use hushmem_writer::{WriterError, flatten_as_lease};
///
/// fn example() -> Result<(), WriterError> {
///     let buffers = BufferSource::<u8>::default();
///
///     let single: &[u8] = &[0xDE, 0xAD, 0xBE, 0xEF];
///     let lease = flatten_as_lease(single, true, &buffers)?;
///     assert!(!lease.has_owner());
///
///     let split: [&[u8]; 2] = [b"he", b"llo"];
///     let lease = flatten_as_lease(&split[..], true, &buffers)?;
///     assert!(lease.has_owner());
///     assert_eq!(lease.as_slice()?, b"hello");
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub fn flatten_as_lease<'a, T, S>(
    source: &'a S,
    sensitive: bool,
    buffers: &BufferSource<T>,
) -> Result<RefSpanLease<'a, T>, WriterError>
where
    T: Zeroable,
    S: SegmentedSource<T> + ?Sized,
{
    let mut non_empty = source.segments().filter(|segment| !segment.is_empty());
    let first = non_empty.next();

    if non_empty.next().is_none() {
        let view = first.unwrap_or(&[]);

        if view.len() != source.len() {
            return Err(WriterError::SegmentLength {
                expected: source.len(),
                actual: view.len(),
            });
        }

        return Ok(RefSpanLease::borrowed(view));
    }

    let rented = copy_into_rented(source, sensitive, buffers)?;

    Ok(RefSpanLease::owned(rented))
}

/// Disposes the wrapped source when dropped, on every exit path.
struct DisposeOnExit<'s, S: Dispose>(&'s mut S);

impl<S: Dispose> Drop for DisposeOnExit<'_, S> {
    fn drop(&mut self) {
        self.0.dispose();
    }
}

/// Copies `source` into one contiguous owned lease and disposes `source`.
///
/// Ownership of `source` moves into the call: it is disposed whether the
/// copy succeeds or fails. The result never borrows from `source`, so even a
/// single-segment source is copied.
///
/// # Errors
///
/// As [`flatten_as_lease`]. Any rented buffer is released before returning.
pub fn consume_as_contiguous<T, S>(
    mut source: S,
    sensitive: bool,
    buffers: &BufferSource<T>,
) -> Result<RefSpanLease<'static, T>, WriterError>
where
    T: Zeroable,
    S: SegmentedSource<T> + Dispose,
{
    let guard = DisposeOnExit(&mut source);
    let rented = copy_into_rented(&*guard.0, sensitive, buffers)?;

    Ok(RefSpanLease::owned(rented))
}
