//! Process initialization: locate, detect, bind, then bring the library up.
//!
//! [`init`] runs the whole sequence exactly once per process and caches the
//! outcome, error included. Every bignum constructor goes through it, so an
//! explicit call is only needed to surface failures early.

use std::ffi::CStr;
use std::ptr;
use std::sync::OnceLock;

use bnlink_abi::ffi::{OPENSSL_INIT_LOAD_CONFIG, OPENSSL_INIT_LOAD_CRYPTO_STRINGS, OPENSSL_VERSION};
use bnlink_abi::{
    DispatchTable, LibraryHandle, OPEN_FLAGS, detect_version, install_thread_safety,
    load_functions, publish, survey,
};
use bnlink_core::VersionTag;
use bnlink_core::loader::LoaderConfig;
use serde::Serialize;

use crate::error::{BnError, ErrorStack};

struct Loaded {
    library: String,
    table: &'static DispatchTable,
}

static STATE: OnceLock<Result<Loaded, BnError>> = OnceLock::new();

fn state() -> &'static Result<Loaded, BnError> {
    STATE.get_or_init(|| initialize(&LoaderConfig::from_env()))
}

/// Load and initialize libcrypto, returning the detected version.
///
/// Only the first call does any work; later calls return its result.
pub fn init() -> Result<VersionTag, BnError> {
    table().map(DispatchTable::version)
}

/// Detected library version. Initializes on first use.
pub fn version() -> Result<VersionTag, BnError> {
    init()
}

/// File name the library was opened under, e.g. `libcrypto.so.3`.
pub fn library_name() -> Result<&'static str, BnError> {
    match state() {
        Ok(loaded) => Ok(&loaded.library),
        Err(err) => Err(err.clone()),
    }
}

/// `OpenSSL_version(OPENSSL_VERSION)`, e.g. `OpenSSL 3.0.13 30 Jan 2024`.
pub fn version_text() -> Result<String, BnError> {
    let table = table()?;
    // SAFETY: returns a pointer to a static NUL-terminated string.
    let text = unsafe { (table.OpenSSL_version())(OPENSSL_VERSION) };
    if text.is_null() {
        return Err(BnError::native(table, "OpenSSL_version"));
    }
    // SAFETY: non-null static string.
    Ok(unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned())
}

pub(crate) fn table() -> Result<&'static DispatchTable, BnError> {
    match state() {
        Ok(loaded) => Ok(loaded.table),
        Err(err) => Err(err.clone()),
    }
}

fn open_library(config: &LoaderConfig) -> Result<(String, LibraryHandle), BnError> {
    let candidates = config.candidates();
    if config.version_override().is_some() {
        let name = candidates.into_iter().next().ok_or(BnError::NoLibrary)?;
        // SAFETY: the caller asked for this library by name.
        let handle = unsafe { LibraryHandle::open(&name, OPEN_FLAGS) }?;
        return Ok((name, handle));
    }
    for name in candidates {
        // SAFETY: only well-known libcrypto file names are tried.
        if let Ok(handle) = unsafe { LibraryHandle::open(&name, OPEN_FLAGS) } {
            return Ok((name, handle));
        }
    }
    Err(BnError::NoLibrary)
}

fn initialize(config: &LoaderConfig) -> Result<Loaded, BnError> {
    let (library, handle) = open_library(config)?;
    // SAFETY: `handle` is a libcrypto, whose version symbols have the
    // expected signatures.
    let version = unsafe { detect_version(&handle) }?;
    let table = publish(load_functions(&handle, version));

    // SAFETY: bound on every version; no arguments.
    unsafe { (table.OPENSSL_init())() };
    if table.version().generation().needs_locking_callbacks() {
        if !install_thread_safety(table) {
            return Err(BnError::ThreadSetup(ErrorStack::drain(table)));
        }
        // SAFETY: bound on 1.0; no arguments.
        unsafe { (table.ERR_load_crypto_strings())() };
    } else {
        let opts = OPENSSL_INIT_LOAD_CONFIG | OPENSSL_INIT_LOAD_CRYPTO_STRINGS;
        // SAFETY: bound from 1.1 on; null settings select the defaults.
        if unsafe { (table.OPENSSL_init_crypto())(opts, ptr::null()) } != 1 {
            return Err(BnError::CryptoInit(ErrorStack::drain(table)));
        }
    }
    Ok(Loaded { library, table })
}

/// A symbol the probed library would be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundSymbol {
    /// Stable identity (modern name).
    pub function: &'static str,
    /// Name actually looked up.
    pub symbol: &'static str,
}

/// What [`probe`] found, without initializing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub library: String,
    pub version: String,
    pub generation: &'static str,
    pub needs_locking_shim: bool,
    pub bound: Vec<BoundSymbol>,
    pub skipped: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

impl ProbeReport {
    /// Whether [`init`] would get past symbol resolution with this library.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Open, detect and resolve against `config` without touching process-wide
/// state and without aborting on missing symbols.
pub fn probe(config: &LoaderConfig) -> Result<ProbeReport, BnError> {
    let (library, handle) = open_library(config)?;
    // SAFETY: as in `initialize`.
    let version = unsafe { detect_version(&handle) }?;
    let found = survey(&handle, version);
    Ok(ProbeReport {
        library,
        version: version.to_string(),
        generation: version.generation().label(),
        needs_locking_shim: version.generation().needs_locking_callbacks(),
        bound: found
            .bound
            .iter()
            .map(|&(id, symbol)| BoundSymbol {
                function: id.name(),
                symbol,
            })
            .collect(),
        skipped: found.skipped.iter().map(|id| id.name()).collect(),
        missing: found.missing.iter().map(|&(_, symbol)| symbol).collect(),
    })
}
