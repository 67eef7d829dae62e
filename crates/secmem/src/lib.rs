// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # secmem
//!
//! Reference-counted secure memory buffers.
//!
//! A [`SecureBuffer`] is an anonymous, private, page-locked OS mapping for
//! sensitive material (keys, plaintext). Handles are cheap to clone and share
//! one mapping; the handle that releases the last reference write-enables the
//! mapping, wipes it with a fill the optimizer cannot elide, seals it
//! `PROT_NONE` and unmaps it — exactly once, even when handles are dropped
//! from several threads.
//!
//! A [`SecureArray<T>`] reinterprets a buffer as a sequence of fixed-size
//! elements with bounds-checked addressing, sharing the buffer's lifecycle.
//!
//! # Quick start
//!
//! ```rust
//! use secmem::{Protection, SecureArray, SecureBuffer};
//!
//! let buffer = SecureBuffer::try_new(1024, Protection::RW)?;
//! assert_eq!(buffer.size(), 1024);
//!
//! // Wipe and use as a typed array.
//! unsafe { buffer.clear() };
//!
//! let key: SecureArray<u64> = SecureArray::new(buffer);
//! assert_eq!(key.len(), 128);
//!
//! unsafe { key.write(0, 42) };
//! assert_eq!(unsafe { key.read(0) }, 42);
//!
//! // Least-privilege window: seal while idle.
//! let mut buffer = key.underlying_memory();
//! assert!(buffer.protect(Protection::NONE));
//! assert!(buffer.protect(Protection::RW));
//! # Ok::<(), secmem::BufferError>(())
//! ```
//!
//! # Failure model
//!
//! Allocation and protection failures are recoverable: check
//! [`SecureBuffer::has_error`] / [`SecureBuffer::error`], or use the `try_`
//! constructors and get a [`BufferError`]. Out-of-bounds offsets and indices
//! are caller bugs and panic. Nothing here defends against core dumps,
//! debugger attachment or a swap-out that beats the lock — these are
//! best-effort primitives that reduce exposure, not a sandbox.

#![warn(missing_docs)]

pub use secmem_buffer::{BufferError, Protection, SecureArray, SecureBuffer, page_size};

/// Optimizer-resistant fill primitives used for the teardown wipe.
pub mod util {
    pub use secmem_util::{
        fill_bytes_volatile, fill_slice_volatile, is_slice_zeroized, zeroize_slice,
    };
}
