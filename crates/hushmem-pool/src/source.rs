// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! BufferSource - sensitivity-routed renting with exact-size views.

use core::fmt;

use hushmem_zero::Zeroable;

use crate::error::PoolError;
use crate::lease::OwnedSecureBuffer;
use crate::plain::{PlainBuffer, PlainPool};
use crate::pool::SecureBufferPool;

/// The owner of a rented buffer. Releasing it releases the whole underlying
/// buffer, not only the requested view.
pub enum BufferOwner<T: Zeroable = u8> {
    /// Zero-length request; nothing to release.
    Empty,
    /// Rented from the secure pool: zeroed on release.
    Secure(OwnedSecureBuffer<T>),
    /// Rented from the plain pool: returned unzeroed.
    Plain(PlainBuffer<T>),
}

impl<T: Zeroable> BufferOwner<T> {
    fn full(&self) -> Result<&[T], PoolError> {
        match self {
            Self::Empty => Ok(&[]),
            Self::Secure(lease) => lease.content(),
            Self::Plain(buffer) => buffer.as_slice().ok_or(PoolError::BufferReleased),
        }
    }

    fn full_mut(&mut self) -> Result<&mut [T], PoolError> {
        match self {
            Self::Empty => Ok(&mut []),
            Self::Secure(lease) => lease.content_mut(),
            Self::Plain(buffer) => buffer.as_mut_slice().ok_or(PoolError::BufferReleased),
        }
    }

    /// Length of the whole underlying buffer in elements.
    pub fn capacity(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Secure(lease) => lease.len(),
            Self::Plain(buffer) => buffer.len(),
        }
    }

    /// Returns `true` if the owner zeroes its buffer on release.
    pub fn is_sensitive(&self) -> bool {
        matches!(self, Self::Secure(_))
    }

    /// Releases the underlying buffer. Idempotent.
    pub fn release(&mut self) {
        match self {
            Self::Empty => {}
            Self::Secure(lease) => lease.release(),
            Self::Plain(buffer) => buffer.release(),
        }
    }
}

/// A rented buffer carved down to exactly the requested length.
///
/// The underlying buffer may be longer (page rounding); the extra tail is
/// never exposed through the view but is zeroed or recycled along with it.
pub struct RentedBuffer<T: Zeroable = u8> {
    owner: BufferOwner<T>,
    len: usize,
}

impl<T: Zeroable> RentedBuffer<T> {
    /// Wraps `owner`, exposing its first `len` elements.
    ///
    /// # Errors
    ///
    /// [`PoolError::OutOfRange`] if `len` exceeds the owner's capacity.
    pub fn new(owner: BufferOwner<T>, len: usize) -> Result<Self, PoolError> {
        if len > owner.capacity() {
            return Err(PoolError::OutOfRange { param: "len" });
        }

        Ok(Self { owner, len })
    }

    /// Returns the zero-length rented buffer.
    pub fn empty() -> Self {
        Self {
            owner: BufferOwner::Empty,
            len: 0,
        }
    }

    /// The exact-size view.
    ///
    /// # Errors
    ///
    /// [`PoolError::BufferReleased`] after [`release`](Self::release).
    pub fn as_slice(&self) -> Result<&[T], PoolError> {
        Ok(&self.owner.full()?[..self.len])
    }

    /// The exact-size view, for writing.
    ///
    /// # Errors
    ///
    /// [`PoolError::BufferReleased`] after [`release`](Self::release).
    pub fn as_mut_slice(&mut self) -> Result<&mut [T], PoolError> {
        let len = self.len;
        Ok(&mut self.owner.full_mut()?[..len])
    }

    /// Length of the view in elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The owner of the whole underlying buffer.
    pub fn owner(&self) -> &BufferOwner<T> {
        &self.owner
    }

    /// Gives up the view and returns the owner.
    pub fn into_owner(self) -> BufferOwner<T> {
        self.owner
    }

    /// Releases the whole underlying buffer. Idempotent.
    pub fn release(&mut self) {
        self.owner.release();
    }
}

impl<T: Zeroable> fmt::Debug for BufferOwner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Empty => "Empty",
            Self::Secure(_) => "Secure",
            Self::Plain(_) => "Plain",
        };

        f.debug_struct("BufferOwner")
            .field("kind", &kind)
            .field("capacity", &self.capacity())
            .field("data", &"REDACTED")
            .finish()
    }
}

impl<T: Zeroable> fmt::Debug for RentedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RentedBuffer")
            .field("len", &self.len)
            .field("owner", &self.owner)
            .finish()
    }
}

/// Routes rent requests to the secure or the plain pool by sensitivity.
///
/// # Example
///
/// ```rust
/// use hushmem_pool::{BufferSource, PoolError};
///
/// fn example() -> Result<(), PoolError> {
///     let source = BufferSource::<u8>::default();
///
///     let mut secret = source.rent(48, true)?;
///     assert_eq!(secret.len(), 48);
///     assert!(secret.owner().is_sensitive());
///     assert_eq!(secret.owner().capacity(), 4096);
///
///     secret.as_mut_slice()?.fill(0xAA);
///     Ok(())
/// } // zeroed and returned to the secure pool here
/// # example().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct BufferSource<T: Zeroable = u8> {
    secure: SecureBufferPool<T>,
    plain: PlainPool<T>,
}

impl<T: Zeroable> BufferSource<T> {
    /// Creates a source over the given pools.
    pub fn new(secure: SecureBufferPool<T>, plain: PlainPool<T>) -> Self {
        Self { secure, plain }
    }

    /// Rents `min_size` elements from the pool matching `sensitive`.
    ///
    /// The returned view is exactly `min_size` long. `min_size == 0` yields
    /// the empty buffer regardless of `sensitive`.
    ///
    /// # Errors
    ///
    /// Propagates the chosen pool's [`PoolError`].
    pub fn rent(&self, min_size: usize, sensitive: bool) -> Result<RentedBuffer<T>, PoolError> {
        if min_size == 0 {
            return Ok(RentedBuffer::empty());
        }

        let owner = if sensitive {
            BufferOwner::Secure(self.secure.rent(min_size)?)
        } else {
            BufferOwner::Plain(self.plain.rent(min_size)?)
        };

        Ok(RentedBuffer {
            owner,
            len: min_size,
        })
    }

    /// The secure pool behind sensitive requests.
    pub fn secure_pool(&self) -> &SecureBufferPool<T> {
        &self.secure
    }

    /// The plain pool behind non-sensitive requests.
    pub fn plain_pool(&self) -> &PlainPool<T> {
        &self.plain
    }
}

impl<T: Zeroable> Default for BufferSource<T> {
    fn default() -> Self {
        Self::new(SecureBufferPool::default(), PlainPool::default())
    }
}
