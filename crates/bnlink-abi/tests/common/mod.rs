//! Simulated libcrypto handles for integration tests.

#![allow(dead_code, unused_macros)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::c_void;
use std::ptr::NonNull;

use bnlink_abi::{REQUIREMENTS, SymbolSource};
use bnlink_core::VersionTag;

/// Placeholder body for symbols a test resolves but never calls.
pub extern "C" fn unused_stub() {}

/// Address of any `extern "C"` function, as a symbol lookup would return it.
macro_rules! addr {
    ($f:expr) => {
        std::ptr::NonNull::new($f as *const () as *mut std::ffi::c_void).expect("fn address")
    };
}

/// Name-to-address map standing in for a `dlopen` handle.
#[derive(Default)]
pub struct FakeLibcrypto {
    symbols: HashMap<String, NonNull<c_void>>,
    lookups: RefCell<Vec<String>>,
}

impl FakeLibcrypto {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Exports exactly the names `version` needs, all bound to [`unused_stub`].
    pub fn stubbed_for(version: VersionTag) -> Self {
        let mut fake = Self::empty();
        for req in REQUIREMENTS {
            if let Some(name) = req.symbol_for(version) {
                fake.symbols.insert(name.to_string(), addr!(unused_stub));
            }
        }
        fake
    }

    pub fn with(mut self, name: &str, addr: NonNull<c_void>) -> Self {
        self.symbols.insert(name.to_string(), addr);
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.symbols.remove(name);
        self
    }

    /// Every name looked up so far, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }
}

impl SymbolSource for FakeLibcrypto {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        self.lookups.borrow_mut().push(name.to_string());
        self.symbols.get(name).copied()
    }
}
