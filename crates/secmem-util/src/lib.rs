// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Byte-fill primitives that survive dead-store elimination.
//!
//! A secure wipe is only worth anything if the compiler cannot prove the
//! stores dead and drop them. These fills use `write_bytes` (memset) followed
//! by a volatile read of the region, which pins the stores even when the
//! memory is never read again through normal code paths.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

/// Fills `len` bytes starting at `ptr` with `value`.
///
/// The fill cannot be elided by dead-store elimination, so it is suitable
/// for wiping sensitive memory immediately before it is released.
///
/// # Safety
///
/// `ptr` must be valid for writes of `len` bytes, and the region must not be
/// accessed concurrently while the fill runs.
#[inline(always)]
pub unsafe fn fill_bytes_volatile(ptr: *mut u8, value: u8, len: usize) {
    if len == 0 {
        return;
    }

    unsafe {
        core::ptr::write_bytes(ptr, value, len);
        // Volatile read prevents the optimizer from removing the write_bytes
        core::ptr::read_volatile(ptr as *const u8);
    }
}

/// Fills a byte slice with `value` using the non-elidable fill.
///
/// # Example
///
/// ```
/// use secmem_util::fill_slice_volatile;
///
/// let mut buffer = [0u8; 8];
/// fill_slice_volatile(&mut buffer, 0xAB);
/// assert!(buffer.iter().all(|&b| b == 0xAB));
/// ```
#[inline(always)]
pub fn fill_slice_volatile(slice: &mut [u8], value: u8) {
    unsafe { fill_bytes_volatile(slice.as_mut_ptr(), value, slice.len()) };
}

/// Zeroes a byte slice using the non-elidable fill.
///
/// # Example
///
/// ```
/// use secmem_util::{is_slice_zeroized, zeroize_slice};
///
/// let mut buffer = [0xFFu8; 8];
/// zeroize_slice(&mut buffer);
/// assert!(is_slice_zeroized(&buffer));
/// ```
#[inline(always)]
pub fn zeroize_slice(slice: &mut [u8]) {
    fill_slice_volatile(slice, 0);
}

/// Verifies that every byte of `slice` is zero.
#[inline(always)]
pub fn is_slice_zeroized(slice: &[u8]) -> bool {
    slice.iter().all(|&b| b == 0)
}
