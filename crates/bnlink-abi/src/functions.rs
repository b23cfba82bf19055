//! Every libcrypto entry point the bignum layer binds, with its binding rule.
//!
//! Rules:
//! - `ALWAYS`: required on every supported version.
//! - `LEGACY_1_0` / `LEGACY_1`: required on 1.0.x / any 1.x, never looked up
//!   later (the symbol may not exist there).
//! - `SINCE_1_1` / `SINCE_3_0`: required from 1.1.0 / 3.0 on.
//! - `renamed_1_1(old)` / `renamed_3_0(old)`: always required, resolved as
//!   `old` before the rename. Callers use the modern name either way.
//!
//! Names and rules must match the shipped libraries exactly.

use std::ffi::{c_char, c_int, c_uchar, c_ulong, c_void};

use bnlink_core::Binding;

use crate::ffi::*;

bn_functions! {
    // Errors and library setup.
    [Binding::ALWAYS] => fn ERR_get_error() -> c_ulong;
    [Binding::ALWAYS] => fn ERR_error_string_n(e: c_ulong, buf: *mut c_char, len: usize);
    /// Version text; `SSLeay_version` on 1.0.
    [Binding::renamed_1_1("SSLeay_version")] => fn OpenSSL_version(kind: c_int) -> *const c_char;
    [Binding::ALWAYS] => fn OPENSSL_init();
    [Binding::LEGACY_1_0] => fn ERR_load_crypto_strings();
    [Binding::LEGACY_1_0] => fn CRYPTO_num_locks() -> c_int;
    [Binding::LEGACY_1_0] => fn CRYPTO_set_id_callback(cb: Option<IdCallback>);
    [Binding::LEGACY_1_0] => fn CRYPTO_set_locking_callback(cb: Option<LockingCallback>);
    [Binding::SINCE_1_1] => fn OPENSSL_init_crypto(opts: u64, settings: *const OPENSSL_INIT_SETTINGS) -> c_int;
    /// `OPENSSL_free` target; 1.0 takes no location arguments.
    [Binding::SINCE_1_1] => fn CRYPTO_free(ptr: *mut c_void, file: *const c_char, line: c_int);
    [Binding::LEGACY_1_0] => fn CRYPTO_free_1_0 = "CRYPTO_free"(ptr: *mut c_void);

    // Allocation and conversion.
    [Binding::ALWAYS] => fn BN_new() -> *mut BIGNUM;
    [Binding::SINCE_1_1] => fn BN_secure_new() -> *mut BIGNUM;
    [Binding::ALWAYS] => fn BN_free(a: *mut BIGNUM);
    [Binding::ALWAYS] => fn BN_clear_free(a: *mut BIGNUM);
    [Binding::ALWAYS] => fn BN_value_one() -> *const BIGNUM;
    [Binding::ALWAYS] => fn BN_bn2dec(a: *const BIGNUM) -> *mut c_char;
    [Binding::ALWAYS] => fn BN_bn2hex(a: *const BIGNUM) -> *mut c_char;

    // Primes.
    [Binding::ALWAYS] => fn BN_generate_prime_ex(
        ret: *mut BIGNUM,
        bits: c_int,
        safe: c_int,
        add: *const BIGNUM,
        rem: *const BIGNUM,
        cb: *mut BN_GENCB,
    ) -> c_int;
    [Binding::SINCE_3_0] => fn BN_generate_prime_ex2(
        ret: *mut BIGNUM,
        bits: c_int,
        safe: c_int,
        add: *const BIGNUM,
        rem: *const BIGNUM,
        cb: *mut BN_GENCB,
        ctx: *mut BN_CTX,
    ) -> c_int;
    [Binding::LEGACY_1] => fn BN_is_prime_ex(p: *const BIGNUM, nchecks: c_int, ctx: *mut BN_CTX, cb: *mut BN_GENCB) -> c_int;
    [Binding::SINCE_3_0] => fn BN_check_prime(p: *const BIGNUM, ctx: *mut BN_CTX, cb: *mut BN_GENCB) -> c_int;

    // Arithmetic.
    [Binding::ALWAYS] => fn BN_add(r: *mut BIGNUM, a: *const BIGNUM, b: *const BIGNUM) -> c_int;
    [Binding::ALWAYS] => fn BN_sub(r: *mut BIGNUM, a: *const BIGNUM, b: *const BIGNUM) -> c_int;
    [Binding::ALWAYS] => fn BN_mul(r: *mut BIGNUM, a: *const BIGNUM, b: *const BIGNUM, ctx: *mut BN_CTX) -> c_int;
    [Binding::ALWAYS] => fn BN_mod_mul(
        r: *mut BIGNUM,
        a: *const BIGNUM,
        b: *const BIGNUM,
        m: *const BIGNUM,
        ctx: *mut BN_CTX,
    ) -> c_int;
    [Binding::ALWAYS] => fn BN_mod_mul_montgomery(
        r: *mut BIGNUM,
        a: *const BIGNUM,
        b: *const BIGNUM,
        mont: *mut BN_MONT_CTX,
        ctx: *mut BN_CTX,
    ) -> c_int;
    /// `dv = m / d`, `rem = m % d`; either output may be null.
    [Binding::ALWAYS] => fn BN_div(
        dv: *mut BIGNUM,
        rem: *mut BIGNUM,
        m: *const BIGNUM,
        d: *const BIGNUM,
        ctx: *mut BN_CTX,
    ) -> c_int;
    [Binding::ALWAYS] => fn BN_exp(r: *mut BIGNUM, a: *const BIGNUM, p: *const BIGNUM, ctx: *mut BN_CTX) -> c_int;
    [Binding::ALWAYS] => fn BN_mod_exp(
        r: *mut BIGNUM,
        a: *const BIGNUM,
        p: *const BIGNUM,
        m: *const BIGNUM,
        ctx: *mut BN_CTX,
    ) -> c_int;
    [Binding::ALWAYS] => fn BN_mod_exp_mont(
        r: *mut BIGNUM,
        a: *const BIGNUM,
        p: *const BIGNUM,
        m: *const BIGNUM,
        ctx: *mut BN_CTX,
        mont: *mut BN_MONT_CTX,
    ) -> c_int;
    [Binding::ALWAYS] => fn BN_mod_inverse(
        ret: *mut BIGNUM,
        a: *const BIGNUM,
        n: *const BIGNUM,
        ctx: *mut BN_CTX,
    ) -> *mut BIGNUM;
    [Binding::ALWAYS] => fn BN_num_bits(a: *const BIGNUM) -> c_int;
    [Binding::ALWAYS] => fn BN_bin2bn(s: *const c_uchar, len: c_int, ret: *mut BIGNUM) -> *mut BIGNUM;
    [Binding::ALWAYS] => fn BN_dec2bn(a: *mut *mut BIGNUM, s: *const c_char) -> c_int;
    [Binding::ALWAYS] => fn BN_hex2bn(a: *mut *mut BIGNUM, s: *const c_char) -> c_int;
    [Binding::ALWAYS] => fn BN_set_word(a: *mut BIGNUM, w: BN_ULONG) -> c_int;
    [Binding::ALWAYS] => fn BN_bn2bin(a: *const BIGNUM, to: *mut c_uchar) -> c_int;
    [Binding::SINCE_1_1] => fn BN_bn2binpad(a: *const BIGNUM, to: *mut c_uchar, tolen: c_int) -> c_int;
    [Binding::ALWAYS] => fn BN_lshift(r: *mut BIGNUM, a: *const BIGNUM, n: c_int) -> c_int;
    [Binding::ALWAYS] => fn BN_rshift(r: *mut BIGNUM, a: *const BIGNUM, n: c_int) -> c_int;
    [Binding::ALWAYS] => fn BN_get_word(a: *const BIGNUM) -> BN_ULONG;
    [Binding::ALWAYS] => fn BN_copy(a: *mut BIGNUM, b: *const BIGNUM) -> *mut BIGNUM;
    [Binding::ALWAYS] => fn BN_rand_range(rnd: *mut BIGNUM, range: *const BIGNUM) -> c_int;
    [Binding::ALWAYS] => fn BN_cmp(a: *const BIGNUM, b: *const BIGNUM) -> c_int;

    // Scratch contexts.
    [Binding::ALWAYS] => fn BN_CTX_new() -> *mut BN_CTX;
    [Binding::SINCE_3_0] => fn BN_CTX_new_ex(libctx: *mut OSSL_LIB_CTX) -> *mut BN_CTX;
    [Binding::SINCE_1_1] => fn BN_CTX_secure_new() -> *mut BN_CTX;
    [Binding::SINCE_3_0] => fn BN_CTX_secure_new_ex(libctx: *mut OSSL_LIB_CTX) -> *mut BN_CTX;
    [Binding::ALWAYS] => fn BN_CTX_free(ctx: *mut BN_CTX);
    [Binding::ALWAYS] => fn BN_CTX_start(ctx: *mut BN_CTX);
    [Binding::ALWAYS] => fn BN_CTX_end(ctx: *mut BN_CTX);
    [Binding::ALWAYS] => fn BN_CTX_get(ctx: *mut BN_CTX) -> *mut BIGNUM;
    /// 1.0 has this as a macro over the struct; see `derived::bn_set_flags`.
    [Binding::SINCE_1_1] => fn BN_set_flags(b: *mut BIGNUM, n: c_int);

    // Montgomery contexts.
    [Binding::ALWAYS] => fn BN_MONT_CTX_new() -> *mut BN_MONT_CTX;
    [Binding::ALWAYS] => fn BN_MONT_CTX_free(mont: *mut BN_MONT_CTX);
    [Binding::ALWAYS] => fn BN_MONT_CTX_set(mont: *mut BN_MONT_CTX, modulus: *const BIGNUM, ctx: *mut BN_CTX) -> c_int;
}
