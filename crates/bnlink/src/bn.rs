//! Bignums backed by the runtime-bound library.
//!
//! [`BigNum`] owns a heap bignum and frees it on drop. Operations live on
//! [`BigNumRef`], the unsized-like view shared by owned values, context
//! scratch values and the library's constant one. Results are written into
//! the receiver: `r.add(&a, &b)` computes `r = a + b`.

use std::cell::UnsafeCell;
use std::cmp::Ordering;
use std::ffi::{CStr, CString, c_char, c_int};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::str::FromStr;

use bnlink_abi::DispatchTable;
use bnlink_abi::derived::bn_prime_checks_for_size;
use bnlink_abi::ffi::{BIGNUM, BN_FLG_CONSTTIME, BN_ULONG};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{self, Serialize, Serializer};
use subtle::ConstantTimeEq;

use crate::context::{BnCtx, MontCtx};
use crate::error::BnError;
use crate::init;

/// Table of the initialized library.
///
/// A `BigNumRef` can only be reached through a value allocated after
/// initialization succeeded, so the table is always published here.
fn bound() -> &'static DispatchTable {
    match bnlink_abi::dispatch() {
        Some(table) => table,
        None => unreachable!("bignum alive before libcrypto initialization"),
    }
}

fn check(table: &DispatchTable, ret: c_int, operation: &'static str) -> Result<(), BnError> {
    if ret == 1 {
        Ok(())
    } else {
        Err(BnError::native(table, operation))
    }
}

fn c_len(len: usize) -> Result<c_int, BnError> {
    c_int::try_from(len).map_err(|_| BnError::LengthOverflow(len))
}

/// Owned bignum. Allocated from the secure heap on 1.1 and later.
pub struct BigNum(NonNull<BIGNUM>);

// SAFETY: an owned bignum has no thread affinity; shared access is read-only.
unsafe impl Send for BigNum {}

impl BigNum {
    /// A new bignum with value zero.
    pub fn new() -> Result<Self, BnError> {
        let table = init::table()?;
        // SAFETY: allocation calls without arguments.
        let (raw, operation) = unsafe {
            if table.version().is_at_least_1_1() {
                ((table.BN_secure_new())(), "BN_secure_new")
            } else {
                ((table.BN_new())(), "BN_new")
            }
        };
        NonNull::new(raw)
            .map(Self)
            .ok_or_else(|| BnError::native(table, operation))
    }

    pub fn from_u64(value: u64) -> Result<Self, BnError> {
        let mut bn = Self::new()?;
        bn.set_u64(value)?;
        Ok(bn)
    }

    pub fn from_dec_str(s: &str) -> Result<Self, BnError> {
        let mut bn = Self::new()?;
        bn.set_dec_str(s)?;
        Ok(bn)
    }

    pub fn from_hex_str(s: &str) -> Result<Self, BnError> {
        let mut bn = Self::new()?;
        bn.set_hex_str(s)?;
        Ok(bn)
    }

    /// Unsigned big-endian magnitude.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BnError> {
        let mut bn = Self::new()?;
        bn.set_bytes(bytes)?;
        Ok(bn)
    }

    /// The library's constant one. Read-only and never freed.
    pub fn one() -> Result<&'static BigNumRef, BnError> {
        let table = init::table()?;
        // SAFETY: returns a pointer to static storage.
        let raw = unsafe { (table.BN_value_one())() };
        if raw.is_null() {
            return Err(BnError::native(table, "BN_value_one"));
        }
        // SAFETY: static, only handed out shared.
        Ok(unsafe { BigNumRef::from_ptr(raw.cast_mut()) })
    }

    /// Probable prime of `bits` bits; with `safe`, `(p - 1) / 2` is prime too.
    ///
    /// A temporary context is allocated when `ctx` is `None` and one is
    /// needed (3.x).
    pub fn generate_prime(bits: usize, safe: bool, ctx: Option<&BnCtx>) -> Result<Self, BnError> {
        let prime = Self::new()?;
        let table = bound();
        let bits = c_len(bits)?;
        let safe = c_int::from(safe);
        if table.version().is_3() {
            let scratch;
            let ctx = match ctx {
                Some(ctx) => ctx,
                None => {
                    scratch = BnCtx::new()?;
                    &scratch
                }
            };
            // SAFETY: live output and context; no add/rem constraints and no
            // progress callback.
            let ret = unsafe {
                (table.BN_generate_prime_ex2())(
                    prime.as_ptr(),
                    bits,
                    safe,
                    ptr::null(),
                    ptr::null(),
                    ptr::null_mut(),
                    ctx.as_ptr(),
                )
            };
            check(table, ret, "BN_generate_prime_ex2")?;
        } else {
            // SAFETY: as above, without a context.
            let ret = unsafe {
                (table.BN_generate_prime_ex())(
                    prime.as_ptr(),
                    bits,
                    safe,
                    ptr::null(),
                    ptr::null(),
                    ptr::null_mut(),
                )
            };
            check(table, ret, "BN_generate_prime_ex")?;
        }
        Ok(prime)
    }
}

impl Drop for BigNum {
    fn drop(&mut self) {
        // SAFETY: owned, freed exactly once.
        unsafe { (bound().BN_free())(self.0.as_ptr()) };
    }
}

impl Deref for BigNum {
    type Target = BigNumRef;

    fn deref(&self) -> &BigNumRef {
        // SAFETY: live for as long as `self`.
        unsafe { BigNumRef::from_ptr(self.0.as_ptr()) }
    }
}

impl DerefMut for BigNum {
    fn deref_mut(&mut self) -> &mut BigNumRef {
        // SAFETY: live and uniquely borrowed for as long as `self`.
        unsafe { BigNumRef::from_ptr_mut(self.0.as_ptr()) }
    }
}

/// Borrowed view of a native bignum.
///
/// Zero-sized: references to it are the native pointer itself, so swapping
/// two `&mut BigNumRef` exchanges nothing.
pub struct BigNumRef {
    _opaque: UnsafeCell<[u8; 0]>,
    _marker: PhantomData<*mut BIGNUM>,
}

impl BigNumRef {
    /// # Safety
    ///
    /// `ptr` must be a live bignum for `'a` and not mutated through other
    /// paths meanwhile.
    pub(crate) unsafe fn from_ptr<'a>(ptr: *mut BIGNUM) -> &'a Self {
        // SAFETY: forwarded to the caller.
        unsafe { &*ptr.cast::<Self>() }
    }

    /// # Safety
    ///
    /// `ptr` must be a live bignum, uniquely borrowed for `'a`.
    pub(crate) unsafe fn from_ptr_mut<'a>(ptr: *mut BIGNUM) -> &'a mut Self {
        // SAFETY: forwarded to the caller.
        unsafe { &mut *ptr.cast::<Self>() }
    }

    pub(crate) fn as_ptr(&self) -> *mut BIGNUM {
        (self as *const Self).cast_mut().cast()
    }

    /// Owned copy.
    pub fn try_clone(&self) -> Result<BigNum, BnError> {
        let mut copy = BigNum::new()?;
        copy.copy_from(self)?;
        Ok(copy)
    }

    pub fn set_u64(&mut self, value: u64) -> Result<(), BnError> {
        let table = bound();
        // Wider than one limb on 32-bit targets.
        if value > u64::from(BN_ULONG::MAX) {
            return self.set_bytes(&value.to_be_bytes());
        }
        // SAFETY: live receiver; `value` fits a limb.
        let ret = unsafe { (table.BN_set_word())(self.as_ptr(), value as BN_ULONG) };
        check(table, ret, "BN_set_word")
    }

    /// Magnitude as `u64`, or `u64::MAX` when it does not fit.
    pub fn to_u64(&self) -> u64 {
        let bits = self.bit_len();
        if bits > 64 {
            return u64::MAX;
        }
        if bits <= BN_ULONG::BITS as usize {
            // SAFETY: live value.
            return u64::from(unsafe { (bound().BN_get_word())(self.as_ptr()) });
        }
        self.to_bytes()
            .map(|bytes| {
                bytes
                    .iter()
                    .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
            })
            .unwrap_or(u64::MAX)
    }

    /// Parse decimal digits with an optional leading `-`. The whole input
    /// must be consumed.
    pub fn set_dec_str(&mut self, s: &str) -> Result<(), BnError> {
        self.parse_into(s, Radix::Decimal)
    }

    /// Parse hexadecimal digits with an optional leading `-`. The whole input
    /// must be consumed.
    pub fn set_hex_str(&mut self, s: &str) -> Result<(), BnError> {
        self.parse_into(s, Radix::Hex)
    }

    fn parse_into(&mut self, s: &str, radix: Radix) -> Result<(), BnError> {
        if s.is_empty() {
            return Err(BnError::InvalidParse);
        }
        let table = bound();
        let text = CString::new(s).map_err(|_| BnError::InvalidParse)?;
        // An existing bignum is reset and reused in place.
        let mut raw = self.as_ptr();
        // SAFETY: `raw` is live and `text` NUL-terminated.
        let (consumed, operation) = unsafe {
            match radix {
                Radix::Decimal => ((table.BN_dec2bn())(&mut raw, text.as_ptr()), "BN_dec2bn"),
                Radix::Hex => ((table.BN_hex2bn())(&mut raw, text.as_ptr()), "BN_hex2bn"),
            }
        };
        if consumed == 0 {
            return Err(BnError::native(table, operation));
        }
        if usize::try_from(consumed).map_or(true, |n| n < s.len()) {
            return Err(BnError::InvalidParse);
        }
        Ok(())
    }

    pub fn to_dec_string(&self) -> Result<String, BnError> {
        self.render(Radix::Decimal)
    }

    /// Uppercase hexadecimal, `-` prefixed when negative.
    pub fn to_hex_string(&self) -> Result<String, BnError> {
        self.render(Radix::Hex)
    }

    fn render(&self, radix: Radix) -> Result<String, BnError> {
        let table = bound();
        // SAFETY: live value; the result is library-allocated.
        let (raw, operation): (*mut c_char, _) = unsafe {
            match radix {
                Radix::Decimal => ((table.BN_bn2dec())(self.as_ptr()), "BN_bn2dec"),
                Radix::Hex => ((table.BN_bn2hex())(self.as_ptr()), "BN_bn2hex"),
            }
        };
        if raw.is_null() {
            return Err(BnError::native(table, operation));
        }
        // SAFETY: non-null NUL-terminated string, freed right after copying.
        let text = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        unsafe { table.openssl_free(raw.cast()) };
        Ok(text)
    }

    /// Set from an unsigned big-endian magnitude.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<(), BnError> {
        let table = bound();
        let len = c_len(bytes.len())?;
        // SAFETY: `bytes` readable for `len`; the receiver is reused.
        let raw = unsafe { (table.BN_bin2bn())(bytes.as_ptr(), len, self.as_ptr()) };
        if raw.is_null() {
            return Err(BnError::native(table, "BN_bin2bn"));
        }
        Ok(())
    }

    /// Big-endian magnitude, [`byte_len`](Self::byte_len) bytes long.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BnError> {
        let mut buf = vec![0u8; self.byte_len()];
        if !buf.is_empty() {
            self.write_be(&mut buf)?;
        }
        Ok(buf)
    }

    /// Big-endian magnitude, left-padded with zeros to fill `buf`.
    pub fn fill_bytes(&self, buf: &mut [u8]) -> Result<(), BnError> {
        let needed = self.byte_len();
        if buf.len() < needed {
            return Err(BnError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }
        if buf.is_empty() {
            return Ok(());
        }
        self.write_be(buf)
    }

    /// `buf.len() >= byte_len()` and non-empty.
    fn write_be(&self, buf: &mut [u8]) -> Result<(), BnError> {
        let table = bound();
        if table.version().is_at_least_1_1() {
            let len = c_len(buf.len())?;
            // SAFETY: `buf` writable for `len`.
            let ret = unsafe { (table.BN_bn2binpad())(self.as_ptr(), buf.as_mut_ptr(), len) };
            if ret != len {
                return Err(BnError::native(table, "BN_bn2binpad"));
            }
        } else {
            let needed = self.byte_len();
            let (pad, digits) = buf.split_at_mut(buf.len() - needed);
            pad.fill(0);
            // SAFETY: `digits` is exactly `byte_len()` long.
            let ret = unsafe { (table.BN_bn2bin())(self.as_ptr(), digits.as_mut_ptr()) };
            if usize::try_from(ret).ok() != Some(needed) {
                return Err(BnError::native(table, "BN_bn2bin"));
            }
        }
        Ok(())
    }

    /// Bits in the magnitude; 0 for zero.
    pub fn bit_len(&self) -> usize {
        // SAFETY: live value.
        let bits = unsafe { (bound().BN_num_bits())(self.as_ptr()) };
        usize::try_from(bits).unwrap_or(0)
    }

    /// Bytes in the magnitude; 0 for zero.
    pub fn byte_len(&self) -> usize {
        // SAFETY: live value.
        let bytes = unsafe { bound().bn_num_bytes(self.as_ptr()) };
        usize::try_from(bytes).unwrap_or(0)
    }

    pub fn copy_from(&mut self, src: &BigNumRef) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: both live; distinct by borrow rules.
        let raw = unsafe { (table.BN_copy())(self.as_ptr(), src.as_ptr()) };
        if raw.is_null() {
            return Err(BnError::native(table, "BN_copy"));
        }
        Ok(())
    }

    pub fn add(&mut self, a: &BigNumRef, b: &BigNumRef) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands.
        let ret = unsafe { (table.BN_add())(self.as_ptr(), a.as_ptr(), b.as_ptr()) };
        check(table, ret, "BN_add")
    }

    pub fn sub(&mut self, a: &BigNumRef, b: &BigNumRef) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands.
        let ret = unsafe { (table.BN_sub())(self.as_ptr(), a.as_ptr(), b.as_ptr()) };
        check(table, ret, "BN_sub")
    }

    pub fn mul(&mut self, a: &BigNumRef, b: &BigNumRef, ctx: &BnCtx) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands and context.
        let ret = unsafe { (table.BN_mul())(self.as_ptr(), a.as_ptr(), b.as_ptr(), ctx.as_ptr()) };
        check(table, ret, "BN_mul")
    }

    /// Truncated quotient `a / d`. Fails for `d == 0`.
    pub fn div(&mut self, a: &BigNumRef, d: &BigNumRef, ctx: &BnCtx) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands and context; no remainder output.
        let ret = unsafe {
            (table.BN_div())(
                self.as_ptr(),
                ptr::null_mut(),
                a.as_ptr(),
                d.as_ptr(),
                ctx.as_ptr(),
            )
        };
        check(table, ret, "BN_div")
    }

    /// Remainder of `a / m`, with the sign of `a`. Fails for `m == 0`.
    pub fn modulo(&mut self, a: &BigNumRef, m: &BigNumRef, ctx: &BnCtx) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands and context.
        let ret = unsafe { table.bn_mod(self.as_ptr(), a.as_ptr(), m.as_ptr(), ctx.as_ptr()) };
        check(table, ret, "BN_mod")
    }

    /// Non-negative `(a * b) mod m`.
    pub fn mod_mul(
        &mut self,
        a: &BigNumRef,
        b: &BigNumRef,
        m: &BigNumRef,
        ctx: &BnCtx,
    ) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands and context.
        let ret = unsafe {
            (table.BN_mod_mul())(self.as_ptr(), a.as_ptr(), b.as_ptr(), m.as_ptr(), ctx.as_ptr())
        };
        check(table, ret, "BN_mod_mul")
    }

    /// Montgomery product `a * b * R^-1 mod m` for the modulus of `mont`.
    pub fn mod_mul_montgomery(
        &mut self,
        a: &BigNumRef,
        b: &BigNumRef,
        mont: &MontCtx,
        ctx: &BnCtx,
    ) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands and contexts.
        let ret = unsafe {
            (table.BN_mod_mul_montgomery())(
                self.as_ptr(),
                a.as_ptr(),
                b.as_ptr(),
                mont.as_ptr(),
                ctx.as_ptr(),
            )
        };
        check(table, ret, "BN_mod_mul_montgomery")
    }

    /// `a ^ p`.
    pub fn exp(&mut self, a: &BigNumRef, p: &BigNumRef, ctx: &BnCtx) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands and context.
        let ret = unsafe { (table.BN_exp())(self.as_ptr(), a.as_ptr(), p.as_ptr(), ctx.as_ptr()) };
        check(table, ret, "BN_exp")
    }

    /// `a ^ p mod m`.
    ///
    /// With an even `m`, none of the operands may be marked constant-time.
    pub fn mod_exp(
        &mut self,
        a: &BigNumRef,
        p: &BigNumRef,
        m: &BigNumRef,
        ctx: &BnCtx,
    ) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands and context.
        let ret = unsafe {
            (table.BN_mod_exp())(self.as_ptr(), a.as_ptr(), p.as_ptr(), m.as_ptr(), ctx.as_ptr())
        };
        check(table, ret, "BN_mod_exp")
    }

    /// `a ^ p mod m` by Montgomery multiplication (`m` odd).
    ///
    /// Without `mont` a Montgomery context is built for this call only.
    pub fn mod_exp_mont(
        &mut self,
        a: &BigNumRef,
        p: &BigNumRef,
        m: &BigNumRef,
        ctx: &BnCtx,
        mont: Option<&MontCtx>,
    ) -> Result<(), BnError> {
        let table = bound();
        let mont = mont.map_or(ptr::null_mut(), MontCtx::as_ptr);
        // SAFETY: live operands and contexts; a null Montgomery context is
        // allowed.
        let ret = unsafe {
            (table.BN_mod_exp_mont())(
                self.as_ptr(),
                a.as_ptr(),
                p.as_ptr(),
                m.as_ptr(),
                ctx.as_ptr(),
                mont,
            )
        };
        check(table, ret, "BN_mod_exp_mont")
    }

    /// `a^-1 mod n`. Fails when `gcd(a, n) != 1`.
    pub fn mod_inverse(&mut self, a: &BigNumRef, n: &BigNumRef, ctx: &BnCtx) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands and context; the result is the receiver.
        let raw = unsafe {
            (table.BN_mod_inverse())(self.as_ptr(), a.as_ptr(), n.as_ptr(), ctx.as_ptr())
        };
        if raw.is_null() {
            return Err(BnError::native(table, "BN_mod_inverse"));
        }
        Ok(())
    }

    /// `a * 2^n`.
    pub fn lshift(&mut self, a: &BigNumRef, n: usize) -> Result<(), BnError> {
        let table = bound();
        let n = c_len(n)?;
        // SAFETY: live operands.
        let ret = unsafe { (table.BN_lshift())(self.as_ptr(), a.as_ptr(), n) };
        check(table, ret, "BN_lshift")
    }

    /// `a / 2^n`, truncated.
    pub fn rshift(&mut self, a: &BigNumRef, n: usize) -> Result<(), BnError> {
        let table = bound();
        let n = c_len(n)?;
        // SAFETY: live operands.
        let ret = unsafe { (table.BN_rshift())(self.as_ptr(), a.as_ptr(), n) };
        check(table, ret, "BN_rshift")
    }

    /// Bitwise OR of the magnitudes.
    pub fn bit_or(&mut self, a: &BigNumRef, b: &BigNumRef) -> Result<(), BnError> {
        let bytes = combine_be(&a.to_bytes()?, &b.to_bytes()?, |x, y| x | y);
        self.set_bytes(&bytes)
    }

    /// Bitwise AND of the magnitudes.
    pub fn bit_and(&mut self, a: &BigNumRef, b: &BigNumRef) -> Result<(), BnError> {
        let bytes = combine_be(&a.to_bytes()?, &b.to_bytes()?, |x, y| x & y);
        self.set_bytes(&bytes)
    }

    /// Uniform random value in `[0, range)`.
    pub fn rand_range(&mut self, range: &BigNumRef) -> Result<(), BnError> {
        let table = bound();
        // SAFETY: live operands.
        let ret = unsafe { (table.BN_rand_range())(self.as_ptr(), range.as_ptr()) };
        check(table, ret, "BN_rand_range")
    }

    /// Signed comparison.
    pub fn cmp_bn(&self, other: &BigNumRef) -> Ordering {
        // SAFETY: live operands.
        unsafe { (bound().BN_cmp())(self.as_ptr(), other.as_ptr()) }.cmp(&0)
    }

    /// Equality of the magnitudes in time that depends only on their byte
    /// lengths.
    pub fn constant_time_eq(&self, other: &BigNumRef) -> Result<bool, BnError> {
        let lhs = self.to_bytes()?;
        let rhs = other.to_bytes()?;
        Ok(bool::from(lhs.as_slice().ct_eq(rhs.as_slice())))
    }

    /// Route exponentiation, division and inversion involving this value
    /// through the branch-free code paths.
    pub fn set_const_time(&mut self) -> &mut Self {
        // SAFETY: live, heap-owned value.
        unsafe { bound().bn_set_flags(self.as_ptr(), BN_FLG_CONSTTIME) };
        self
    }

    /// Miller-Rabin primality test.
    ///
    /// 1.x runs [`bn_prime_checks_for_size`] rounds for this size; 3.x picks
    /// its own. A temporary context is allocated when `ctx` is `None`.
    pub fn is_probably_prime(&self, ctx: Option<&BnCtx>) -> Result<bool, BnError> {
        let table = bound();
        let scratch;
        let ctx = match ctx {
            Some(ctx) => ctx,
            None => {
                scratch = BnCtx::new()?;
                &scratch
            }
        };
        // SAFETY: live value and context; no progress callback.
        let (ret, operation) = unsafe {
            if table.version().is_legacy_1() {
                let bits = c_int::try_from(self.bit_len()).unwrap_or(c_int::MAX);
                let checks = bn_prime_checks_for_size(bits);
                (
                    (table.BN_is_prime_ex())(self.as_ptr(), checks, ctx.as_ptr(), ptr::null_mut()),
                    "BN_is_prime_ex",
                )
            } else {
                (
                    (table.BN_check_prime())(self.as_ptr(), ctx.as_ptr(), ptr::null_mut()),
                    "BN_check_prime",
                )
            }
        };
        if ret < 0 {
            return Err(BnError::native(table, operation));
        }
        Ok(ret == 1)
    }
}

#[derive(Clone, Copy)]
enum Radix {
    Decimal,
    Hex,
}

/// Apply `op` bytewise to two big-endian magnitudes, the shorter one
/// zero-extended.
fn combine_be(a: &[u8], b: &[u8], op: impl Fn(u8, u8) -> u8) -> Vec<u8> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let offset = long.len() - short.len();
    long.iter()
        .enumerate()
        .map(|(i, &x)| op(x, i.checked_sub(offset).map_or(0, |j| short[j])))
        .collect()
}

/// How a textual bignum is read.
#[derive(Debug, PartialEq, Eq)]
enum TextForm<'a> {
    /// `0x`/`0X` prefix: hexadecimal digits only.
    Hex(&'a str),
    /// Decimal first, then bare hexadecimal.
    DecimalOrHex(&'a str),
}

fn text_form(s: &str) -> TextForm<'_> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) if !digits.is_empty() => TextForm::Hex(digits),
        _ => TextForm::DecimalOrHex(s),
    }
}

impl FromStr for BigNum {
    type Err = BnError;

    /// `0x`-prefixed hexadecimal, else decimal, else bare hexadecimal.
    fn from_str(s: &str) -> Result<Self, BnError> {
        let mut bn = Self::new()?;
        match text_form(s) {
            TextForm::Hex(digits) => bn.set_hex_str(digits)?,
            TextForm::DecimalOrHex(text) => {
                if bn.set_dec_str(text).is_err() {
                    bn.set_hex_str(text)?;
                }
            }
        }
        Ok(bn)
    }
}

impl PartialEq for BigNumRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_bn(other) == Ordering::Equal
    }
}

impl Eq for BigNumRef {}

impl PartialOrd for BigNumRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNumRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_bn(other)
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl Eq for BigNum {}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> Ordering {
        (**self).cmp(&**other)
    }
}

impl fmt::Display for BigNumRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_dec_string().map_err(|_| fmt::Error)?;
        f.pad_integral(!text.starts_with('-'), "", text.trim_start_matches('-'))
    }
}

impl fmt::Debug for BigNumRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_hex_string() {
            Ok(hex) => write!(f, "BigNum(0x{hex})"),
            Err(_) => f.write_str("BigNum(<unreadable>)"),
        }
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

impl fmt::Debug for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl Serialize for BigNumRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let hex = self.to_hex_string().map_err(ser::Error::custom)?;
        serializer.serialize_str(&format!("0x{hex}"))
    }
}

impl Serialize for BigNum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (**self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BigNum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        // An empty string decodes to zero; `FromStr` still rejects it.
        if text.is_empty() {
            return Self::new().map_err(de::Error::custom);
        }
        text.parse().map_err(de::Error::custom)
    }
}
