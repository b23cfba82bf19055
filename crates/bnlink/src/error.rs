//! Error types for initialization and bignum operations.

use std::ffi::{CStr, c_char};
use std::fmt;

use bnlink_abi::ffi::ERR_STRING_BUF_LEN;
use bnlink_abi::{DispatchTable, DlError};
use bnlink_core::VersionError;
use thiserror::Error;

/// One entry of the native error queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub code: u64,
    pub message: String,
}

/// Native errors pending on the calling thread, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorStack {
    errors: Vec<NativeError>,
}

impl ErrorStack {
    /// Pop every queued error, rendering each one into a fixed-size buffer.
    pub fn drain(table: &DispatchTable) -> Self {
        let mut errors = Vec::new();
        loop {
            // SAFETY: nullary query of the thread-local error queue.
            let code = unsafe { (table.ERR_get_error())() };
            if code == 0 {
                break;
            }
            let mut buf = [0 as c_char; ERR_STRING_BUF_LEN];
            // SAFETY: `buf` holds `ERR_STRING_BUF_LEN` bytes and the callee
            // NUL-terminates within `len`.
            unsafe { (table.ERR_error_string_n())(code, buf.as_mut_ptr(), buf.len()) };
            // SAFETY: NUL-terminated above.
            let message = unsafe { CStr::from_ptr(buf.as_ptr()) }
                .to_string_lossy()
                .into_owned();
            errors.push(NativeError {
                code: u64::from(code),
                message,
            });
        }
        Self { errors }
    }

    #[must_use]
    pub fn errors(&self) -> &[NativeError] {
        &self.errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<Vec<NativeError>> for ErrorStack {
    fn from(errors: Vec<NativeError>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for ErrorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("no native error queued");
        }
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&err.message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BnError {
    #[error(transparent)]
    Load(#[from] DlError),
    #[error("can't load libcrypto using any known version suffix")]
    NoLibrary,
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("thread setup failed: {0}")]
    ThreadSetup(ErrorStack),
    #[error("crypto init failed: {0}")]
    CryptoInit(ErrorStack),
    #[error("{operation} failed: {stack}")]
    Native {
        operation: &'static str,
        stack: ErrorStack,
    },
    #[error("invalid parse")]
    InvalidParse,
    #[error("buffer too small to fit value: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("length {0} does not fit a native int")]
    LengthOverflow(usize),
}

impl BnError {
    /// Failure of `operation`, carrying whatever the library queued for it.
    pub fn native(table: &DispatchTable, operation: &'static str) -> Self {
        Self::Native {
            operation,
            stack: ErrorStack::drain(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_display() {
        assert_eq!(ErrorStack::default().to_string(), "no native error queued");
    }

    #[test]
    fn native_error_lists_queue_in_order() {
        let stack = ErrorStack::from(vec![
            NativeError {
                code: 0x0300_0066,
                message: "error:03000066:bignum routines::div by zero".to_string(),
            },
            NativeError {
                code: 0x0300_006c,
                message: "error:0300006C:bignum routines::no inverse".to_string(),
            },
        ]);
        let err = BnError::Native {
            operation: "BN_div",
            stack,
        };
        assert_eq!(
            err.to_string(),
            "BN_div failed: error:03000066:bignum routines::div by zero; \
             error:0300006C:bignum routines::no inverse"
        );
    }

    #[test]
    fn version_errors_pass_through() {
        let err = BnError::from(VersionError::Unsupported { major: 1, minor: 2 });
        assert_eq!(err.to_string(), "libcrypto version 1.2 is not supported");
        assert_eq!(
            BnError::from(VersionError::Undetectable).to_string(),
            "can't retrieve libcrypto version"
        );
    }

    #[test]
    fn buffer_too_small_names_sizes() {
        let err = BnError::BufferTooSmall {
            needed: 4,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "buffer too small to fit value: need 4 bytes, have 2"
        );
    }
}
