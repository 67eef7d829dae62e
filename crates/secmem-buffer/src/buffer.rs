// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecureBuffer - reference-counted owner of one page-locked mapping.

use alloc::boxed::Box;

use core::ptr::{self, NonNull};
use core::sync::atomic::{self, AtomicU32, Ordering};

use libc::c_int;

use crate::error::BufferError;
use crate::os;
use crate::protection::Protection;

/// A reference-counted chunk of page-locked memory.
///
/// Cloning shares the mapping, it never duplicates bytes. The handle that
/// releases the last reference tears the mapping down: write-enable,
/// volatile zero-fill, seal `PROT_NONE`, unmap.
///
/// Creation never panics on OS failure; a failed allocation leaves the
/// handle without a usable address, observable through
/// [`has_error`](SecureBuffer::has_error). Dereferencing such a handle is a
/// caller contract breach.
pub struct SecureBuffer {
    refcount: NonNull<AtomicU32>,
    size: usize,
    addr: *mut u8,
    error: c_int,
}

// Safety: the mapping is shared by design. Content access goes through
// unsafe APIs whose contracts require caller-side synchronization; the
// reference count is atomic.
unsafe impl Send for SecureBuffer {}
unsafe impl Sync for SecureBuffer {}

impl SecureBuffer {
    /// Maps `size` bytes of anonymous, private, page-locked memory with the
    /// given initial permissions.
    ///
    /// On OS failure the errno is recorded and the handle is left without a
    /// usable address; check [`has_error`](SecureBuffer::has_error) before
    /// use. Failure is not reported through a panic so batch allocation code
    /// can check once after construction.
    ///
    /// # Panics
    ///
    /// When `size` is zero.
    pub fn new(size: usize, protection: Protection) -> Self {
        assert!(size > 0, "mapping size must be non-zero");

        let mut error = 0;
        let addr = Self::map(size, protection, &mut error);

        Self {
            refcount: Self::new_refcount(),
            size,
            addr,
            error,
        }
    }

    /// Result-returning form of [`SecureBuffer::new`].
    pub fn try_new(size: usize, protection: Protection) -> Result<Self, BufferError> {
        let buffer = Self::new(size, protection);

        if buffer.has_error() {
            return Err(BufferError::Map(buffer.error));
        }

        Ok(buffer)
    }

    // The counter lives outside the mapping so it stays usable while the
    // mapping is PROT_NONE and after a failed allocation.
    fn new_refcount() -> NonNull<AtomicU32> {
        let raw = Box::into_raw(Box::new(AtomicU32::new(1)));

        // Safety: Box::into_raw never returns null.
        unsafe { NonNull::new_unchecked(raw) }
    }

    fn map(size: usize, protection: Protection, error: &mut c_int) -> *mut u8 {
        let flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;
        #[cfg(target_os = "linux")]
        let flags = flags | libc::MAP_NORESERVE | libc::MAP_LOCKED;

        let addr = unsafe { libc::mmap(ptr::null_mut(), size, protection.bits(), flags, -1, 0) };

        if addr == libc::MAP_FAILED {
            *error = os::errno();
            return ptr::null_mut();
        }

        // MAP_LOCKED is Linux-only; elsewhere residency is best-effort.
        #[cfg(not(target_os = "linux"))]
        unsafe {
            libc::mlock(addr as *const _, size);
        }

        addr as *mut u8
    }

    fn refcount(&self) -> &AtomicU32 {
        // Safety: the counter allocation outlives every handle; only the
        // handle that observes the count reach zero frees it.
        unsafe { self.refcount.as_ref() }
    }

    /// Number of live handles sharing this mapping (diagnostic).
    pub fn references(&self) -> u32 {
        self.refcount().load(Ordering::Relaxed)
    }

    /// Byte length of the mapping, fixed at creation.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the most recent fallible operation (creation or protection
    /// change) failed.
    pub fn has_error(&self) -> bool {
        self.error != 0
    }

    /// The platform error code of the most recent fallible operation, or 0.
    ///
    /// Overwritten (including being cleared back to 0) by each new fallible
    /// call; the state is not cumulative.
    pub fn error(&self) -> c_int {
        self.error
    }

    /// Base address of the mapping, or null after a failed allocation.
    pub fn as_ptr(&self) -> *mut u8 {
        self.addr
    }

    /// Base address shifted `byte_offset` bytes.
    ///
    /// # Panics
    ///
    /// When `byte_offset >= size()`.
    pub fn as_ptr_at(&self, byte_offset: usize) -> *mut u8 {
        assert!(byte_offset < self.size, "byte offset out of bounds");

        self.addr.wrapping_add(byte_offset)
    }

    /// Changes the protection of the whole mapping.
    ///
    /// Returns false and records errno on failure; the OS leaves the mapping
    /// at whatever permission state the failed call produced, no rollback is
    /// attempted.
    pub fn protect(&mut self, protection: Protection) -> bool {
        self.error = 0;

        let failed = unsafe {
            libc::mprotect(self.addr as *mut libc::c_void, self.size, protection.bits())
        } != 0;

        if failed {
            self.error = os::errno();
            return false;
        }

        true
    }

    /// Result-returning form of [`SecureBuffer::protect`].
    pub fn try_protect(&mut self, protection: Protection) -> Result<(), BufferError> {
        if !self.protect(protection) {
            return Err(BufferError::Protect(self.error));
        }

        Ok(())
    }

    /// Fills every byte of the mapping with `value`, using a write the
    /// optimizer cannot elide.
    ///
    /// The buffer does not re-protect on the caller's behalf: filling a
    /// sealed or read-only mapping faults at the OS level.
    ///
    /// # Safety
    ///
    /// The mapping must currently be write-accessible and the caller must
    /// synchronize concurrent access to the contents.
    pub unsafe fn fill(&self, value: u8) {
        debug_assert!(!self.addr.is_null(), "fill on a failed mapping");

        unsafe { secmem_util::fill_bytes_volatile(self.addr, value, self.size) };
    }

    /// Fills the mapping with zeros.
    ///
    /// # Safety
    ///
    /// Same contract as [`SecureBuffer::fill`].
    pub unsafe fn clear(&self) {
        unsafe { self.fill(0) };
    }

    /// Returns a slice view of the mapping.
    ///
    /// # Safety
    ///
    /// The mapping must be readable, and the caller must synchronize
    /// concurrent writers for the lifetime of the slice.
    pub unsafe fn as_slice(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.addr, self.size) }
    }

    /// Returns a mutable slice view of the mapping.
    ///
    /// # Safety
    ///
    /// The mapping must be writable. Clones of this handle alias the same
    /// bytes, so the caller must guarantee no concurrent access for the
    /// lifetime of the slice.
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.addr, self.size) }
    }

    #[cold]
    fn unmap_failed() -> ! {
        // A leaked, possibly still-resident mapping with sensitive bytes has
        // no safe recovery.
        unsafe { libc::abort() }
    }

    fn release(&mut self) {
        if self.refcount().fetch_sub(1, Ordering::Release) != 1 {
            return;
        }

        // Last owner: everything written through other handles must be
        // visible before the wipe.
        atomic::fence(Ordering::Acquire);

        if !self.addr.is_null() {
            // Wipe under write permission, then seal before unmapping. If
            // write-enabling fails the wipe is skipped: the mapping is still
            // sealed, so the contents stay unreadable.
            let writable = unsafe {
                libc::mprotect(self.addr as *mut libc::c_void, self.size, libc::PROT_WRITE) == 0
            };

            if writable {
                unsafe { secmem_util::fill_bytes_volatile(self.addr, 0, self.size) };
            }

            unsafe {
                libc::mprotect(self.addr as *mut libc::c_void, self.size, libc::PROT_NONE);
            }
        }

        // No other handle can reach the counter past this point.
        unsafe { drop(Box::from_raw(self.refcount.as_ptr())) };

        if !self.addr.is_null()
            && unsafe { libc::munmap(self.addr as *mut libc::c_void, self.size) } != 0
        {
            Self::unmap_failed();
        }
    }
}

impl Clone for SecureBuffer {
    fn clone(&self) -> Self {
        // New owners only need to observe an address that was established
        // before they obtained their copy; relaxed is enough.
        self.refcount().fetch_add(1, Ordering::Relaxed);

        Self {
            refcount: self.refcount,
            size: self.size,
            addr: self.addr,
            error: self.error,
        }
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

impl core::fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecureBuffer")
            .field("size", &self.size)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
