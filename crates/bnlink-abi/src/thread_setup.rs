//! Locking shim for 1.0.x, which leaves thread safety to the caller.
//!
//! 1.0 asks for `CRYPTO_num_locks()` mutexes and two process-wide
//! callbacks: one naming the calling thread, one locking or unlocking lock
//! `n`. The pool is allocated once and lives until process exit; the native
//! library is the only thing that locks or unlocks it.
//!
//! Installing twice leaks the first pool. Exactly-once installation is the
//! caller's job (see `bnlink::init`).

use std::cell::Cell;
use std::ffi::{c_char, c_int, c_ulong};
use std::sync::atomic::{AtomicPtr, AtomicU64, Ordering};

use parking_lot::RawMutex;
use parking_lot::lock_api::RawMutex as _;

use crate::ffi::{CRYPTO_LOCK, IdCallback, LockingCallback};
use crate::table::DispatchTable;

/// Fixed-length array of raw mutexes indexed by the native lock number.
pub struct MutexPool {
    locks: Box<[RawMutex]>,
}

impl MutexPool {
    /// Allocate `count` unlocked mutexes, or `None` if allocation fails.
    #[must_use]
    pub fn try_new(count: usize) -> Option<Self> {
        let mut locks = Vec::new();
        locks.try_reserve_exact(count).ok()?;
        locks.extend((0..count).map(|_| RawMutex::INIT));
        Some(Self {
            locks: locks.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Block until lock `n` is held. `false` if `n` is out of range.
    pub fn lock(&self, n: usize) -> bool {
        match self.locks.get(n) {
            Some(m) => {
                m.lock();
                true
            }
            None => false,
        }
    }

    /// Release lock `n`. `false` if `n` is out of range.
    ///
    /// # Safety
    ///
    /// Lock `n` must be held in the current context.
    pub unsafe fn unlock(&self, n: usize) -> bool {
        match self.locks.get(n) {
            Some(m) => {
                // SAFETY: held per the caller.
                unsafe { m.unlock() };
                true
            }
            None => false,
        }
    }

    /// Whether lock `n` is currently held by anyone.
    #[must_use]
    pub fn is_locked(&self, n: usize) -> Option<bool> {
        self.locks.get(n).map(|m| m.is_locked())
    }
}

static POOL: AtomicPtr<MutexPool> = AtomicPtr::new(std::ptr::null_mut());

/// Pool registered by the last successful [`install_thread_safety`].
#[must_use]
pub fn installed_pool() -> Option<&'static MutexPool> {
    let ptr = POOL.load(Ordering::Acquire);
    // SAFETY: non-null values come from Box::into_raw and are never freed.
    unsafe { ptr.as_ref() }
}

/// Allocate the pool and register the id and locking callbacks.
///
/// Returns `false` (registering nothing) when the pool cannot be allocated,
/// including a negative lock count. Requires a 1.0 table.
pub fn install_thread_safety(table: &DispatchTable) -> bool {
    // SAFETY: nullary query bound for 1.0.
    let count = unsafe { (table.CRYPTO_num_locks())() };
    let Ok(count) = usize::try_from(count) else {
        return false;
    };
    let Some(pool) = MutexPool::try_new(count) else {
        return false;
    };
    POOL.store(Box::into_raw(Box::new(pool)), Ordering::Release);

    // SAFETY: both callbacks match the 1.0 callback signatures and stay valid
    // for the process lifetime.
    unsafe {
        (table.CRYPTO_set_id_callback())(Some(thread_id_callback as IdCallback));
        (table.CRYPTO_set_locking_callback())(Some(locking_callback as LockingCallback));
    }
    true
}

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static SELF_ID: Cell<u64> = const { Cell::new(0) };
}

/// Stable, non-zero numeric identity of the calling thread.
#[must_use]
pub fn current_thread_id() -> u64 {
    SELF_ID.with(|slot| {
        let existing = slot.get();
        if existing != 0 {
            return existing;
        }
        let fresh = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        slot.set(fresh);
        fresh
    })
}

extern "C" fn thread_id_callback() -> c_ulong {
    current_thread_id() as c_ulong
}

unsafe extern "C" fn locking_callback(mode: c_int, n: c_int, _file: *const c_char, _line: c_int) {
    let Some(pool) = installed_pool() else {
        return;
    };
    let Ok(n) = usize::try_from(n) else {
        return;
    };
    if mode & CRYPTO_LOCK != 0 {
        pool.lock(n);
    } else {
        // SAFETY: the native library unlocks only what it locked.
        unsafe { pool.unlock(n) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool() {
        let pool = MutexPool::try_new(0).expect("empty pool");
        assert!(pool.is_empty());
        assert!(!pool.lock(0));
        assert_eq!(pool.is_locked(0), None);
    }

    #[test]
    fn lock_unlock_round_trip() {
        let pool = MutexPool::try_new(3).expect("pool");
        assert_eq!(pool.len(), 3);
        assert!(pool.lock(2));
        assert_eq!(pool.is_locked(2), Some(true));
        assert_eq!(pool.is_locked(1), Some(false));
        assert!(unsafe { pool.unlock(2) });
        assert_eq!(pool.is_locked(2), Some(false));
        assert!(!pool.lock(3));
    }

    #[test]
    fn oversized_pool_fails_instead_of_aborting() {
        assert!(MutexPool::try_new(usize::MAX).is_none());
    }

    #[test]
    fn thread_ids_are_stable_and_distinct() {
        let here = current_thread_id();
        assert_ne!(here, 0);
        assert_eq!(here, current_thread_id());
        let there = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
    }
}
