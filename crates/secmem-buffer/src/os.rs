// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Small OS queries: page size and errno.

use core::sync::atomic::{AtomicUsize, Ordering};

use libc::c_int;

static PAGE_SIZE: AtomicUsize = AtomicUsize::new(0);

/// Returns the OS page size in bytes.
///
/// The `sysconf` result is cached after the first call; safe to call
/// repeatedly and from any thread.
pub fn page_size() -> usize {
    let cached = PAGE_SIZE.load(Ordering::Relaxed);
    if cached != 0 {
        return cached;
    }

    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
    PAGE_SIZE.store(size, Ordering::Relaxed);

    size
}

/// Returns the calling thread's last OS error code.
pub(crate) fn errno() -> c_int {
    #[cfg(any(target_os = "linux", target_os = "emscripten"))]
    return unsafe { *libc::__errno_location() };

    #[cfg(any(
        target_os = "android",
        target_os = "openbsd",
        target_os = "netbsd"
    ))]
    return unsafe { *libc::__errno() };

    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly"
    ))]
    return unsafe { *libc::__error() };
}
