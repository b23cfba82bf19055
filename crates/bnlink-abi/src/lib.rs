// Every export here hands out or calls raw C function pointers; per-function
// safety docs name the pointer contracts that matter.
#![allow(clippy::missing_safety_doc)]
//! # bnlink-abi
//!
//! Extern "C" boundary between Rust callers and a libcrypto that is only
//! located at run time.
//!
//! # Architecture
//!
//! ```text
//! dlopen handle -> version detection -> symbol resolution -> DispatchTable
//!                                                  |
//!                                  (1.0 only) lock pool + callbacks
//! ```
//!
//! The dispatch table is built once, published process-wide, and read
//! without locking afterwards. A symbol that the detected version must
//! export but does not is fatal: the process aborts during construction
//! instead of calling through an empty slot later.

#[macro_use]
mod macros;

pub mod derived;
pub mod detect;
pub mod dlfcn;
pub mod ffi;
pub mod functions;
pub mod state;
pub mod table;
pub mod thread_setup;

pub use detect::{SymbolProbe, detect_major, detect_minor, detect_version};
pub use dlfcn::{DlError, LibraryHandle, OPEN_FLAGS, SymbolSource};
pub use functions::{FnId, REQUIREMENTS};
pub use state::{dispatch, publish};
pub use table::{DispatchTable, MissingSymbol, Survey, load_functions, survey, try_load_functions};
pub use thread_setup::{MutexPool, install_thread_safety, installed_pool};
