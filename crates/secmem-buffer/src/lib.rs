// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Reference-counted secure memory buffers (Unix only).
//!
//! [`SecureBuffer`] owns one anonymous, private, page-locked mapping.
//! Cloning a handle shares the mapping through an atomic reference count;
//! the handle that releases the last reference write-enables the mapping,
//! wipes it with a fill the optimizer cannot elide, seals it `PROT_NONE`
//! and unmaps it — exactly once, even under concurrent teardown.
//!
//! [`SecureArray<T>`] is a typed, bounds-checked window over a
//! [`SecureBuffer`]. It shares ownership and delegates all lifecycle and
//! protection behavior to the buffer it wraps.
//!
//! # Error model
//!
//! OS failures (mapping creation, protection change) are recoverable and
//! reported through the per-handle error accessor ([`SecureBuffer::error`])
//! or, on the `try_` surface, as [`BufferError`] values. Contract breaches
//! (out-of-bounds index or offset, zero-size allocation) are precondition
//! failures and panic. A failed `munmap` at final release aborts the
//! process: a leaked, possibly still-resident sensitive mapping has no safe
//! recovery.
//!
//! # Concurrency
//!
//! Handles are [`Send`] and [`Sync`]. The reference count is the only state
//! mutated through shared handles with internal synchronization; the
//! contents of a live mapping are not synchronized, which is why all content
//! access goes through `unsafe` APIs whose contracts put that burden on the
//! caller.
//!
//! # Example
//!
//! ```rust
//! use secmem_buffer::{Protection, SecureBuffer};
//!
//! let mut buffer = SecureBuffer::try_new(1024, Protection::RW)?;
//! assert_eq!(buffer.size(), 1024);
//!
//! unsafe { buffer.fill(0xAB) };
//! unsafe { buffer.clear() };
//!
//! // Seal while idle, reopen for the access window.
//! assert!(buffer.protect(Protection::NONE));
//! assert!(buffer.protect(Protection::RW));
//! # Ok::<(), secmem_buffer::BufferError>(())
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[cfg(test)]
mod tests;

mod error;

#[cfg(unix)]
mod array;
#[cfg(unix)]
mod buffer;
#[cfg(unix)]
mod os;
#[cfg(unix)]
mod protection;

pub use error::BufferError;

#[cfg(unix)]
pub use array::SecureArray;
#[cfg(unix)]
pub use buffer::SecureBuffer;
#[cfg(unix)]
pub use os::page_size;
#[cfg(unix)]
pub use protection::Protection;
