//! Scratch and Montgomery contexts.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use bnlink_abi::DispatchTable;
use bnlink_abi::ffi::{BIGNUM, BN_CTX, BN_MONT_CTX};

use crate::bn::BigNumRef;
use crate::error::BnError;
use crate::init;

/// Pool of temporary bignums used by multiplication, division and
/// exponentiation.
///
/// A context belongs to one thread of execution: the native pool allocator
/// performs no locking, so `BnCtx` is neither `Send` nor `Sync`.
pub struct BnCtx {
    ptr: NonNull<BN_CTX>,
    table: &'static DispatchTable,
}

impl BnCtx {
    /// Secure-heap context on 1.1 and later, plain one on 1.0.
    pub fn new() -> Result<Self, BnError> {
        let table = init::table()?;
        let version = table.version();
        // SAFETY: allocation calls bound for the detected version; a null
        // library context selects the default one.
        let (raw, operation) = unsafe {
            if version.is_3() {
                (
                    (table.BN_CTX_secure_new_ex())(std::ptr::null_mut()),
                    "BN_CTX_secure_new_ex",
                )
            } else if version.is_1_1() {
                ((table.BN_CTX_secure_new())(), "BN_CTX_secure_new")
            } else {
                ((table.BN_CTX_new())(), "BN_CTX_new")
            }
        };
        let ptr = NonNull::new(raw).ok_or_else(|| BnError::native(table, operation))?;
        Ok(Self { ptr, table })
    }

    /// Open a frame; values taken from it are released when it ends.
    pub fn start(&self) -> CtxFrame<'_> {
        // SAFETY: live context.
        unsafe { (self.table.BN_CTX_start())(self.ptr.as_ptr()) };
        CtxFrame { ctx: self }
    }

    pub(crate) fn as_ptr(&self) -> *mut BN_CTX {
        self.ptr.as_ptr()
    }
}

impl Drop for BnCtx {
    fn drop(&mut self) {
        // SAFETY: owned, freed exactly once.
        unsafe { (self.table.BN_CTX_free())(self.ptr.as_ptr()) };
    }
}

/// `BN_CTX_start` .. `BN_CTX_end` scope.
pub struct CtxFrame<'ctx> {
    ctx: &'ctx BnCtx,
}

impl<'ctx> CtxFrame<'ctx> {
    /// Borrow a zeroed scratch value for the rest of the frame.
    pub fn get(&self) -> Result<Scratch<'_>, BnError> {
        let table = self.ctx.table;
        // SAFETY: inside a started frame of a live context.
        let raw = unsafe { (table.BN_CTX_get())(self.ctx.as_ptr()) };
        let ptr = NonNull::new(raw).ok_or_else(|| BnError::native(table, "BN_CTX_get"))?;
        Ok(Scratch {
            ptr,
            _frame: PhantomData,
        })
    }

    /// The context the frame belongs to, for operations inside the frame.
    pub fn ctx(&self) -> &'ctx BnCtx {
        self.ctx
    }

    /// End the frame now instead of at scope exit.
    pub fn end(self) {}
}

impl Drop for CtxFrame<'_> {
    fn drop(&mut self) {
        // SAFETY: matches the `BN_CTX_start` in `BnCtx::start`.
        unsafe { (self.ctx.table.BN_CTX_end())(self.ctx.as_ptr()) };
    }
}

/// Bignum owned by a context frame; released when the frame ends.
pub struct Scratch<'frame> {
    ptr: NonNull<BIGNUM>,
    _frame: PhantomData<&'frame BnCtx>,
}

impl Deref for Scratch<'_> {
    type Target = BigNumRef;

    fn deref(&self) -> &BigNumRef {
        // SAFETY: live until the frame ends, which outlives `self`.
        unsafe { BigNumRef::from_ptr(self.ptr.as_ptr()) }
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut BigNumRef {
        // SAFETY: as above; each `get` hands out a distinct value.
        unsafe { BigNumRef::from_ptr_mut(self.ptr.as_ptr()) }
    }
}

/// Precomputed Montgomery form of a modulus.
pub struct MontCtx {
    ptr: NonNull<BN_MONT_CTX>,
    table: &'static DispatchTable,
}

impl MontCtx {
    pub fn new() -> Result<Self, BnError> {
        let table = init::table()?;
        // SAFETY: no arguments.
        let raw = unsafe { (table.BN_MONT_CTX_new())() };
        let ptr = NonNull::new(raw).ok_or_else(|| BnError::native(table, "BN_MONT_CTX_new"))?;
        Ok(Self { ptr, table })
    }

    /// Precompute for `modulus` (odd).
    pub fn set(&mut self, modulus: &BigNumRef, ctx: &BnCtx) -> Result<(), BnError> {
        // SAFETY: all pointers live.
        let ret = unsafe {
            (self.table.BN_MONT_CTX_set())(self.ptr.as_ptr(), modulus.as_ptr(), ctx.as_ptr())
        };
        if ret != 1 {
            return Err(BnError::native(self.table, "BN_MONT_CTX_set"));
        }
        Ok(())
    }

    pub(crate) fn as_ptr(&self) -> *mut BN_MONT_CTX {
        self.ptr.as_ptr()
    }
}

impl Drop for MontCtx {
    fn drop(&mut self) {
        // SAFETY: owned, freed exactly once.
        unsafe { (self.table.BN_MONT_CTX_free())(self.ptr.as_ptr()) };
    }
}
