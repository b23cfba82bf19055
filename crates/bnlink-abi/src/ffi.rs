//! C types and constants of the libcrypto bignum ABI.
//!
//! Declared here instead of taken from headers so that no libcrypto needs to
//! be installed at build time.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_ulong};
use std::marker::{PhantomData, PhantomPinned};

macro_rules! opaque {
    ($($(#[$meta:meta])* $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[repr(C)]
            pub struct $name {
                _data: [u8; 0],
                _marker: PhantomData<(*mut u8, PhantomPinned)>,
            }
        )*
    };
}

opaque! {
    /// `BIGNUM`.
    BIGNUM;
    /// `BN_CTX`: scratch-value pool for bignum operations.
    BN_CTX;
    /// `BN_MONT_CTX`: precomputed Montgomery form of a modulus.
    BN_MONT_CTX;
    /// `BN_GENCB`: prime generation progress callback.
    BN_GENCB;
    /// `OSSL_LIB_CTX` (3.x).
    OSSL_LIB_CTX;
    /// `OPENSSL_INIT_SETTINGS` (1.1+).
    OPENSSL_INIT_SETTINGS;
}

/// Limb type of a bignum.
#[cfg(target_pointer_width = "64")]
pub type BN_ULONG = u64;
#[cfg(not(target_pointer_width = "64"))]
pub type BN_ULONG = u32;

/// `OPENSSL_INIT_LOAD_CRYPTO_STRINGS`.
pub const OPENSSL_INIT_LOAD_CRYPTO_STRINGS: u64 = 0x0000_0002;
/// `OPENSSL_INIT_LOAD_CONFIG`.
pub const OPENSSL_INIT_LOAD_CONFIG: u64 = 0x0000_0040;

/// `BN_FLG_CONSTTIME`: route exponentiation, division and inversion through
/// their branch-free variants.
pub const BN_FLG_CONSTTIME: c_int = 0x04;

/// Mode bit passed to the locking callback: set to lock, clear to unlock.
pub const CRYPTO_LOCK: c_int = 1;

/// `OpenSSL_version` selector for the full version text.
pub const OPENSSL_VERSION: c_int = 0;

/// Minimum buffer size `ERR_error_string_n` is called with.
pub const ERR_STRING_BUF_LEN: usize = 256;

/// `CRYPTO_set_id_callback` argument (1.0).
pub type IdCallback = unsafe extern "C" fn() -> c_ulong;

/// `CRYPTO_set_locking_callback` argument (1.0).
pub type LockingCallback =
    unsafe extern "C" fn(mode: c_int, n: c_int, file: *const c_char, line: c_int);
