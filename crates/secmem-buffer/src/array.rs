// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecureArray - typed, bounds-checked window over a SecureBuffer.

use core::marker::PhantomData;
use core::mem;

use crate::buffer::SecureBuffer;
use crate::protection::Protection;

/// A typed view over a [`SecureBuffer`].
///
/// Shares ownership of the wrapped buffer and never owns memory beyond it.
/// When the buffer's size is not a multiple of the element width the usable
/// element count is truncated; the trailing bytes are unreachable through
/// the view but still wiped with the mapping.
pub struct SecureArray<T> {
    memory: SecureBuffer,
    _elements: PhantomData<*mut T>,
}

// Safety: same sharing story as SecureBuffer. Element access is unsafe and
// contractually synchronized by the caller.
unsafe impl<T: Send> Send for SecureArray<T> {}
unsafe impl<T: Sync> Sync for SecureArray<T> {}

impl<T> SecureArray<T> {
    /// Wraps `memory`; does not allocate.
    ///
    /// # Panics
    ///
    /// When `T` is a zero-sized type.
    pub fn new(memory: SecureBuffer) -> Self {
        assert!(mem::size_of::<T>() != 0, "zero-sized element type");

        Self {
            memory,
            _elements: PhantomData,
        }
    }

    /// Size of one element in bytes.
    pub fn width(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Number of whole elements that fit in the buffer (truncating).
    pub fn len(&self) -> usize {
        self.memory.size() / self.width()
    }

    /// True when not even one whole element fits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Address of the `index`-th element.
    ///
    /// # Panics
    ///
    /// When `index >= len()`. Untrusted indices must be validated by the
    /// caller; this is a precondition, not a recoverable error.
    pub fn ptr(&self, index: usize) -> *mut T {
        assert!(index < self.len(), "element index out of bounds");

        self.memory.as_ptr().cast::<T>().wrapping_add(index)
    }

    /// Reads the `index`-th element.
    ///
    /// # Safety
    ///
    /// The mapping must be readable and the caller must synchronize
    /// concurrent writers.
    pub unsafe fn read(&self, index: usize) -> T
    where
        T: Copy,
    {
        unsafe { self.ptr(index).read() }
    }

    /// Writes the `index`-th element.
    ///
    /// # Safety
    ///
    /// The mapping must be writable and the caller must guarantee no
    /// concurrent access to the element.
    pub unsafe fn write(&self, index: usize, value: T) {
        unsafe { self.ptr(index).write(value) }
    }

    /// Changes the protection of the underlying mapping; see
    /// [`SecureBuffer::protect`].
    pub fn protect(&mut self, protection: Protection) -> bool {
        self.memory.protect(protection)
    }

    /// Zero-fills the underlying mapping.
    ///
    /// # Safety
    ///
    /// Same contract as [`SecureBuffer::clear`].
    pub unsafe fn clear(&self) {
        unsafe { self.memory.clear() }
    }

    /// Returns a new shared handle to the wrapped buffer, incrementing its
    /// reference count.
    pub fn underlying_memory(&self) -> SecureBuffer {
        self.memory.clone()
    }
}

impl<T> Clone for SecureArray<T> {
    fn clone(&self) -> Self {
        Self {
            memory: self.memory.clone(),
            _elements: PhantomData,
        }
    }
}

impl<T> core::fmt::Debug for SecureArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecureArray")
            .field("len", &self.len())
            .field("width", &self.width())
            .finish_non_exhaustive()
    }
}
