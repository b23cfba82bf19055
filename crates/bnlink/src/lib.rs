//! # bnlink
//!
//! Arbitrary-precision integers over whichever libcrypto the host has,
//! located and bound at run time.
//!
//! Supported libraries are 1.0.x, 1.1.x and 3.x. The first use of any type
//! here initializes the library once per process (see [`init`]); set
//! `BNLINK_LIBCRYPTO_VERSION` to pin the shared-library suffix.
//!
//! ```no_run
//! use bnlink::{BigNum, BnCtx};
//!
//! let ctx = BnCtx::new()?;
//! let base = BigNum::from_u64(4)?;
//! let exp = BigNum::from_u64(13)?;
//! let modulus = BigNum::from_u64(497)?;
//! let mut out = BigNum::new()?;
//! out.mod_exp(&base, &exp, &modulus, &ctx)?;
//! assert_eq!(out.to_u64(), 445);
//! # Ok::<(), bnlink::BnError>(())
//! ```

pub mod bn;
pub mod context;
pub mod error;
pub mod init;

pub use bn::{BigNum, BigNumRef};
pub use context::{BnCtx, CtxFrame, MontCtx, Scratch};
pub use error::{BnError, ErrorStack, NativeError};
pub use init::{BoundSymbol, ProbeReport, init, library_name, probe, version, version_text};

pub use bnlink_core::VersionTag;
pub use bnlink_core::loader::LoaderConfig;
