//! Operations built on the dispatch table rather than exported natively.

use std::ffi::{c_int, c_void};
use std::ptr;

use bnlink_core::derived::{num_bytes_for_bits, prime_checks_for_size};

use crate::ffi::{BIGNUM, BN_CTX, BN_ULONG};
use crate::functions::FnId;
use crate::table::DispatchTable;

impl DispatchTable {
    /// `BN_num_bytes`: `ceil(BN_num_bits(a) / 8)`.
    ///
    /// # Safety
    ///
    /// `a` must be a valid bignum.
    pub unsafe fn bn_num_bytes(&self, a: *const BIGNUM) -> c_int {
        // SAFETY: forwarded to the caller.
        num_bytes_for_bits(unsafe { (self.BN_num_bits())(a) })
    }

    /// `BN_mod`: remainder of `BN_div` with no quotient output.
    ///
    /// Returns `BN_div`'s own status (1 on success, 0 on failure such as a
    /// zero modulus).
    ///
    /// # Safety
    ///
    /// `rem`, `a`, `m` must be valid bignums and `ctx` a valid context.
    pub unsafe fn bn_mod(
        &self,
        rem: *mut BIGNUM,
        a: *const BIGNUM,
        m: *const BIGNUM,
        ctx: *mut BN_CTX,
    ) -> c_int {
        // SAFETY: forwarded to the caller; a null quotient is allowed.
        unsafe { (self.BN_div())(ptr::null_mut(), rem, a, m, ctx) }
    }

    /// `OPENSSL_free`: release memory the library allocated for the caller,
    /// such as `BN_bn2dec` output. Null is ignored.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or come from a libcrypto allocation not yet freed.
    pub unsafe fn openssl_free(&self, ptr: *mut c_void) {
        if ptr.is_null() {
            return;
        }
        if self.is_resolved(FnId::CRYPTO_free) {
            let file = concat!(file!(), "\0");
            // SAFETY: forwarded to the caller; `file` is NUL-terminated.
            unsafe { (self.CRYPTO_free())(ptr, file.as_ptr().cast(), line!() as c_int) }
        } else {
            // SAFETY: forwarded to the caller.
            unsafe { (self.CRYPTO_free_1_0())(ptr) }
        }
    }

    /// `BN_set_flags` on 1.1+, direct flag write on 1.0 where it is a macro.
    ///
    /// # Safety
    ///
    /// `b` must be a valid, heap-owned bignum.
    pub unsafe fn bn_set_flags(&self, b: *mut BIGNUM, flags: c_int) {
        if self.is_resolved(FnId::BN_set_flags) {
            // SAFETY: forwarded to the caller.
            unsafe { (self.BN_set_flags())(b, flags) }
        } else {
            // SAFETY: 1.0 bignums use the public struct layout.
            unsafe { legacy_1_0_set_flags(b, flags) }
        }
    }
}

/// Miller-Rabin rounds for a prime of `bits` bits (`BN_prime_checks_for_size`).
#[must_use]
pub fn bn_prime_checks_for_size(bits: c_int) -> c_int {
    prime_checks_for_size(bits)
}

/// `struct bignum_st` as laid out by 1.0.x, where it was public.
#[repr(C)]
struct LegacyBignum {
    d: *mut BN_ULONG,
    top: c_int,
    dmax: c_int,
    neg: c_int,
    flags: c_int,
}

/// 1.0 `BN_set_flags` macro.
///
/// # Safety
///
/// `b` must point to a 1.0.x `BIGNUM`.
pub unsafe fn legacy_1_0_set_flags(b: *mut BIGNUM, flags: c_int) {
    // SAFETY: layout matches 1.0.x per the caller.
    unsafe { (*b.cast::<LegacyBignum>()).flags |= flags }
}

/// 1.0 `BN_get_flags` macro.
///
/// # Safety
///
/// `b` must point to a 1.0.x `BIGNUM`.
pub unsafe fn legacy_1_0_get_flags(b: *const BIGNUM, flags: c_int) -> c_int {
    // SAFETY: layout matches 1.0.x per the caller.
    unsafe { (*b.cast::<LegacyBignum>()).flags & flags }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::BN_FLG_CONSTTIME;

    #[test]
    fn legacy_flags_touch_only_flag_word() {
        let mut raw = LegacyBignum {
            d: ptr::null_mut(),
            top: 3,
            dmax: 4,
            neg: 0,
            flags: 0x01,
        };
        let b = (&mut raw as *mut LegacyBignum).cast::<BIGNUM>();
        unsafe {
            legacy_1_0_set_flags(b, BN_FLG_CONSTTIME);
            assert_eq!(legacy_1_0_get_flags(b, BN_FLG_CONSTTIME), BN_FLG_CONSTTIME);
            assert_eq!(legacy_1_0_get_flags(b, 0x01), 0x01);
        }
        assert_eq!((raw.top, raw.dmax, raw.neg), (3, 4, 0));
    }

    #[test]
    fn prime_checks_forwarded() {
        assert_eq!(bn_prime_checks_for_size(2048), 4);
        assert_eq!(bn_prime_checks_for_size(512), 5);
    }
}
