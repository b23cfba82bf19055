//! # bnlink-core
//!
//! Pure-logic rules for binding a runtime-loaded libcrypto bignum library.
//!
//! This crate knows which library generations exist, how their version
//! numbers are encoded, which symbols each generation must export (and under
//! which historical name), and the handful of helpers derived from native
//! primitives. It never touches a library handle: the unsafe lookups and
//! calls live in `bnlink-abi`.

#![deny(unsafe_code)]

pub mod derived;
pub mod loader;
pub mod symbols;
pub mod version;

pub use symbols::{Availability, Binding, SymbolRequirement};
pub use version::{Generation, VersionError, VersionProbe, VersionTag, detect_major, detect_minor};
