//! Version detection against a symbol source.

use std::ffi::{c_uint, c_ulong, c_void};

use bnlink_core::version::{
    PACKED_VERSION_SYMBOLS, SYM_VERSION_MAJOR, SYM_VERSION_MINOR, VersionError, VersionProbe,
    VersionTag,
};

use crate::dlfcn::SymbolSource;

type VersionPartFn = unsafe extern "C" fn() -> c_uint;
type VersionNumFn = unsafe extern "C" fn() -> c_ulong;

/// [`VersionProbe`] that calls the version symbols exported by a source.
pub struct SymbolProbe<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: SymbolSource + ?Sized> SymbolProbe<'a, S> {
    /// # Safety
    ///
    /// Every version symbol `source` resolves (`OPENSSL_version_major`,
    /// `OPENSSL_version_minor`, `OpenSSL_version_num`, `SSLeay`) must be a
    /// callable function with its libcrypto signature.
    pub unsafe fn new(source: &'a S) -> Self {
        Self { source }
    }

    fn call_part(&self, name: &str) -> Option<u32> {
        let ptr = self.source.lookup(name)?;
        // SAFETY: guaranteed by `SymbolProbe::new`.
        let f = unsafe { std::mem::transmute::<*mut c_void, VersionPartFn>(ptr.as_ptr()) };
        // SAFETY: nullary query without side effects.
        Some(unsafe { f() })
    }
}

impl<S: SymbolSource + ?Sized> VersionProbe for SymbolProbe<'_, S> {
    fn query_major(&self) -> Option<u32> {
        self.call_part(SYM_VERSION_MAJOR)
    }

    fn query_minor(&self) -> Option<u32> {
        self.call_part(SYM_VERSION_MINOR)
    }

    fn packed_number(&self) -> Option<u64> {
        let ptr = PACKED_VERSION_SYMBOLS
            .iter()
            .find_map(|name| self.source.lookup(name))?;
        // SAFETY: guaranteed by `SymbolProbe::new`.
        let f = unsafe { std::mem::transmute::<*mut c_void, VersionNumFn>(ptr.as_ptr()) };
        // SAFETY: nullary query without side effects.
        Some(u64::from(unsafe { f() }))
    }
}

/// Major version of the library behind `source`, or -1.
///
/// # Safety
///
/// See [`SymbolProbe::new`].
pub unsafe fn detect_major<S: SymbolSource + ?Sized>(source: &S) -> i32 {
    // SAFETY: forwarded.
    bnlink_core::detect_major(&unsafe { SymbolProbe::new(source) })
}

/// Minor version of the library behind `source`, or -1.
///
/// # Safety
///
/// See [`SymbolProbe::new`].
pub unsafe fn detect_minor<S: SymbolSource + ?Sized>(source: &S) -> i32 {
    // SAFETY: forwarded.
    bnlink_core::detect_minor(&unsafe { SymbolProbe::new(source) })
}

/// Detect and validate the version in one step.
///
/// # Safety
///
/// See [`SymbolProbe::new`].
pub unsafe fn detect_version<S: SymbolSource + ?Sized>(source: &S) -> Result<VersionTag, VersionError> {
    // SAFETY: forwarded.
    VersionTag::detect(&unsafe { SymbolProbe::new(source) })
}
