// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Memory protection flags.

use libc::c_int;

/// Access permissions for a [`SecureBuffer`](crate::SecureBuffer) mapping.
///
/// Wraps the raw `PROT_*` bits. Combine flags with `|`:
///
/// ```
/// use secmem_buffer::Protection;
///
/// assert_eq!(Protection::RW, Protection::READ | Protection::WRITE);
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Protection(c_int);

impl Protection {
    /// No access at all; any read or write faults.
    pub const NONE: Self = Self(libc::PROT_NONE);

    /// Read access.
    pub const READ: Self = Self(libc::PROT_READ);

    /// Write access.
    pub const WRITE: Self = Self(libc::PROT_WRITE);

    /// Execute access.
    pub const EXECUTE: Self = Self(libc::PROT_EXEC);

    /// Read and write access.
    pub const RW: Self = Self(Self::READ.0 | Self::WRITE.0);

    /// Read, write and execute access.
    pub const RWX: Self = Self(Self::RW.0 | Self::EXECUTE.0);

    /// Returns the raw `PROT_*` bits.
    pub const fn bits(self) -> c_int {
        self.0
    }
}

impl core::ops::BitOr for Protection {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
