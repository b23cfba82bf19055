//! Dynamic loader access: `dlopen`, `dlsym`, `dlerror` via `libc`.
//!
//! Lookups go through the [`SymbolSource`] trait so that version detection
//! and table construction can run against a real handle or a simulated one.

use std::ffi::{CStr, CString, c_int, c_void};
use std::ptr::NonNull;

use thiserror::Error;

/// Mode used for every libcrypto open, with the target's own flag values.
pub const OPEN_FLAGS: c_int = libc::RTLD_LAZY | libc::RTLD_LOCAL;

/// Something symbols can be looked up in.
pub trait SymbolSource {
    /// Address of `name`, or `None` when it is not exported.
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>>;
}

impl<T: SymbolSource + ?Sized> SymbolSource for &T {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        (**self).lookup(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DlError {
    #[error("library name {0:?} contains a NUL byte")]
    InvalidName(String),
    #[error("can't load {name}: {reason}")]
    Open { name: String, reason: String },
}

/// Borrowed handle to a loaded shared library.
///
/// The handle is never closed: symbols resolved from it stay in use for the
/// rest of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryHandle {
    raw: NonNull<c_void>,
}

// SAFETY: dlopen handles are process-global and the loader serializes its own
// bookkeeping; dlsym may be called from any thread.
unsafe impl Send for LibraryHandle {}
unsafe impl Sync for LibraryHandle {}

impl LibraryHandle {
    /// `dlopen(name, flags)`.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initializers; the caller vouches for the
    /// library found under `name`.
    pub unsafe fn open(name: &str, flags: c_int) -> Result<Self, DlError> {
        let c_name = CString::new(name).map_err(|_| DlError::InvalidName(name.to_string()))?;
        // SAFETY: `c_name` is NUL-terminated; initializer safety is on the caller.
        let raw = unsafe { libc::dlopen(c_name.as_ptr(), flags) };
        match NonNull::new(raw) {
            Some(raw) => Ok(Self { raw }),
            None => Err(DlError::Open {
                name: name.to_string(),
                reason: last_dlerror(),
            }),
        }
    }

    /// Wrap a handle obtained elsewhere.
    ///
    /// # Safety
    ///
    /// `raw` must be a live `dlopen` handle that outlives every use of the
    /// returned value and of symbols resolved through it.
    pub unsafe fn from_raw(raw: *mut c_void) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self { raw })
    }

    #[must_use]
    pub fn as_ptr(self) -> *mut c_void {
        self.raw.as_ptr()
    }
}

impl SymbolSource for LibraryHandle {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        let c_name = CString::new(name).ok()?;
        // SAFETY: the handle is live per `open`/`from_raw`; the name is NUL-terminated.
        NonNull::new(unsafe { libc::dlsym(self.raw.as_ptr(), c_name.as_ptr()) })
    }
}

/// Message for the most recent loader failure on this thread.
fn last_dlerror() -> String {
    // SAFETY: dlerror returns null or a NUL-terminated thread-local string.
    let msg = unsafe { libc::dlerror() };
    if msg.is_null() {
        return "unknown dynamic loader error".to_string();
    }
    // SAFETY: non-null result of dlerror, valid until the next loader call.
    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_nul_is_rejected() {
        let err = unsafe { LibraryHandle::open("libcrypto\0.so", libc::RTLD_LAZY) }.unwrap_err();
        assert_eq!(err, DlError::InvalidName("libcrypto\0.so".to_string()));
    }

    #[test]
    fn missing_library_reports_loader_message() {
        let err =
            unsafe { LibraryHandle::open("libbnlink-does-not-exist.so.0", libc::RTLD_LAZY) }
                .unwrap_err();
        match err {
            DlError::Open { name, reason } => {
                assert_eq!(name, "libbnlink-does-not-exist.so.0");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn open_flags_are_lazy_and_local() {
        assert_eq!(OPEN_FLAGS & libc::RTLD_LAZY, libc::RTLD_LAZY);
        assert_eq!(OPEN_FLAGS & libc::RTLD_LOCAL, libc::RTLD_LOCAL);
        assert_eq!(OPEN_FLAGS & libc::RTLD_GLOBAL, 0);
        assert_eq!(OPEN_FLAGS & libc::RTLD_NOW, 0);
    }

    #[test]
    fn null_raw_handle_is_none() {
        assert!(unsafe { LibraryHandle::from_raw(std::ptr::null_mut()) }.is_none());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn resolves_from_main_program_scope() {
        // RTLD_DEFAULT-style lookup through a null-name dlopen of the executable.
        let raw = unsafe { libc::dlopen(std::ptr::null(), libc::RTLD_LAZY) };
        let handle = unsafe { LibraryHandle::from_raw(raw) }.expect("main program handle");
        assert!(handle.lookup("malloc").is_some());
        assert!(handle.lookup("bnlink_symbol_that_does_not_exist").is_none());
        assert!(handle.lookup("mal\0loc").is_none());
    }
}
