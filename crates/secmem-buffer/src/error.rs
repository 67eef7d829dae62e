// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for secmem-buffer.

use core::ffi::c_int;

use thiserror::Error;

/// Errors from the fallible buffer syscalls, carrying the platform errno.
///
/// Only the `try_` surface returns these; the plain surface reports the same
/// codes through [`SecureBuffer::error`](crate::SecureBuffer::error).
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum BufferError {
    /// mmap declined to create the mapping.
    #[error("mmap failed (errno {0})")]
    Map(c_int),

    /// mprotect declined to change the mapping's permissions.
    #[error("mprotect failed (errno {0})")]
    Protect(c_int),
}
