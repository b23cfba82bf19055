//! Dispatch table construction.
//!
//! [`try_load_functions`] walks [`REQUIREMENTS`] once: requirements whose
//! rule excludes the detected version leave their slot empty without a
//! lookup; the others must resolve. [`load_functions`] is the startup entry
//! point and treats a missing required symbol as fatal.

use std::ffi::c_void;
use std::ptr::NonNull;

use bnlink_core::VersionTag;
use thiserror::Error;

use crate::dlfcn::SymbolSource;
use crate::functions::{FnId, REQUIREMENTS};

/// A symbol the detected version must export could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot get required symbol {symbol} from libcrypto version {version}")]
pub struct MissingSymbol {
    /// Name that was looked up (the legacy name for renamed functions).
    pub symbol: &'static str,
    pub id: FnId,
    pub version: VersionTag,
}

/// Resolved entry points, indexed by [`FnId`]. Write-once.
pub struct DispatchTable {
    version: VersionTag,
    slots: [Option<NonNull<c_void>>; FnId::COUNT],
}

// SAFETY: slots hold code addresses that are never written after
// construction; calling them concurrently is governed by the native library.
unsafe impl Send for DispatchTable {}
unsafe impl Sync for DispatchTable {}

impl DispatchTable {
    /// Version the table was built for.
    #[must_use]
    pub fn version(&self) -> VersionTag {
        self.version
    }

    /// Raw slot for `id`; `None` when the version does not bind it.
    #[must_use]
    pub fn get(&self, id: FnId) -> Option<NonNull<c_void>> {
        self.slots[id.index()]
    }

    #[must_use]
    pub fn is_resolved(&self, id: FnId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Identities with a bound entry point.
    pub fn resolved(&self) -> impl Iterator<Item = FnId> + '_ {
        FnId::ALL.iter().copied().filter(|id| self.is_resolved(*id))
    }

    #[track_caller]
    pub(crate) fn expect_resolved(&self, id: FnId) -> *mut c_void {
        match self.slots[id.index()] {
            Some(ptr) => ptr.as_ptr(),
            None => unresolved(id, self.version),
        }
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("version", &self.version)
            .field("resolved", &self.resolved().count())
            .field("slots", &FnId::COUNT)
            .finish()
    }
}

#[cold]
#[track_caller]
fn unresolved(id: FnId, version: VersionTag) -> ! {
    panic!(
        "{} is not bound for libcrypto {version}; callers must not use it on this version",
        id.name()
    )
}

/// Resolve every requirement applicable to `version`.
pub fn try_load_functions<S: SymbolSource + ?Sized>(
    source: &S,
    version: VersionTag,
) -> Result<DispatchTable, MissingSymbol> {
    let mut slots = [None; FnId::COUNT];
    for req in REQUIREMENTS {
        let Some(symbol) = req.symbol_for(version) else {
            continue;
        };
        match source.lookup(symbol) {
            Some(ptr) => slots[req.id.index()] = Some(ptr),
            None => {
                return Err(MissingSymbol {
                    symbol,
                    id: req.id,
                    version,
                });
            }
        }
    }
    Ok(DispatchTable { version, slots })
}

/// Build the dispatch table, aborting the process if a required symbol is
/// missing.
///
/// The diagnostic line names the symbol and the detected version. A partial
/// table is never returned: later calls would go through empty slots.
pub fn load_functions<S: SymbolSource + ?Sized>(source: &S, version: VersionTag) -> DispatchTable {
    match try_load_functions(source, version) {
        Ok(table) => table,
        Err(missing) => fatal_missing_symbol(&missing),
    }
}

#[cold]
fn fatal_missing_symbol(missing: &MissingSymbol) -> ! {
    eprintln!("{missing}");
    std::process::abort()
}

/// Full, non-aborting resolution pass used for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Survey {
    /// `(identity, symbol actually bound)`.
    pub bound: Vec<(FnId, &'static str)>,
    /// Not applicable to the version; never looked up.
    pub skipped: Vec<FnId>,
    /// Required but not exported.
    pub missing: Vec<(FnId, &'static str)>,
}

impl Survey {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Like [`try_load_functions`] but records every outcome instead of stopping
/// at the first missing symbol.
pub fn survey<S: SymbolSource + ?Sized>(source: &S, version: VersionTag) -> Survey {
    let mut out = Survey::default();
    for req in REQUIREMENTS {
        match req.symbol_for(version) {
            None => out.skipped.push(req.id),
            Some(symbol) if source.lookup(symbol).is_some() => out.bound.push((req.id, symbol)),
            Some(symbol) => out.missing.push((req.id, symbol)),
        }
    }
    out
}
