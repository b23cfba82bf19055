//! Library generation detection.
//!
//! Two probing strategies are chained: the single-call major/minor queries
//! exported since 3.0, then the legacy packed version number exported under
//! `OpenSSL_version_num` (1.1.x) or `SSLeay` (1.0.x).
//!
//! The packed number follows `MNNFFPPS` (major, minor, fix, patch, status).
//! Only minor 0 and 1 of major 1 are distinguished, so decoding is a range
//! check rather than a field split.

use thiserror::Error;

/// Symbol of the 3.x major version query.
pub const SYM_VERSION_MAJOR: &str = "OPENSSL_version_major";
/// Symbol of the 3.x minor version query.
pub const SYM_VERSION_MINOR: &str = "OPENSSL_version_minor";
/// Packed version number query, 1.1.x naming.
pub const SYM_VERSION_NUM: &str = "OpenSSL_version_num";
/// Packed version number query, 1.0.x naming.
pub const SYM_SSLEAY: &str = "SSLeay";

/// Packed-number probes in the order they are tried.
pub const PACKED_VERSION_SYMBOLS: [&str; 2] = [SYM_VERSION_NUM, SYM_SSLEAY];

/// Lowest packed number of the 1.x line (`0x10000000`).
pub const PACKED_1_0_MIN: u64 = 0x1000_0000;
/// Lowest packed number of the 1.1 line.
pub const PACKED_1_1_MIN: u64 = 0x1010_0000;
/// First packed number past the 1.1 line (would be 1.2).
pub const PACKED_1_2_MIN: u64 = 0x1020_0000;
/// First packed number past the 1.x line.
pub const PACKED_2_0_MIN: u64 = 0x2000_0000;

/// Sentinel returned by the detectors for an unsupported or unknown library.
pub const UNSUPPORTED: i32 = -1;

/// Source of raw version answers, typically backed by a library handle.
///
/// Each method returns `None` when the corresponding symbol is not exported.
pub trait VersionProbe {
    /// Result of `OPENSSL_version_major()`.
    fn query_major(&self) -> Option<u32>;
    /// Result of `OPENSSL_version_minor()`.
    fn query_minor(&self) -> Option<u32>;
    /// Result of the first packed-number query in [`PACKED_VERSION_SYMBOLS`]
    /// that resolves.
    fn packed_number(&self) -> Option<u64>;
}

/// Decode the major version from a packed number. 0 (no symbol) is unsupported.
#[must_use]
pub const fn decode_packed_major(num: u64) -> i32 {
    if num < PACKED_1_0_MIN || num >= PACKED_2_0_MIN {
        return UNSUPPORTED;
    }
    1
}

/// Decode the minor version from a packed number.
#[must_use]
pub const fn decode_packed_minor(num: u64) -> i32 {
    if num < PACKED_1_0_MIN || num >= PACKED_1_2_MIN {
        return UNSUPPORTED;
    }
    if num >= PACKED_1_1_MIN {
        return 1;
    }
    0
}

/// Detect the major version, or [`UNSUPPORTED`].
///
/// A direct query answer outside the recognized majors (1 and 3) is reported
/// as unsupported too.
pub fn detect_major<P: VersionProbe + ?Sized>(probe: &P) -> i32 {
    if let Some(major) = probe.query_major() {
        return match major {
            1 | 3 => major as i32,
            _ => UNSUPPORTED,
        };
    }
    decode_packed_major(probe.packed_number().unwrap_or(0))
}

/// Detect the minor version, or [`UNSUPPORTED`].
pub fn detect_minor<P: VersionProbe + ?Sized>(probe: &P) -> i32 {
    if let Some(minor) = probe.query_minor() {
        return i32::try_from(minor).unwrap_or(UNSUPPORTED);
    }
    decode_packed_minor(probe.packed_number().unwrap_or(0))
}

/// One of the three ABI-incompatible library families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Generation {
    /// 1.0.x (1.0.0 through 1.0.2).
    V1_0,
    /// 1.1.0 and 1.1.1.
    V1_1,
    /// 3.x, ABI-stable across minors.
    V3,
}

impl Generation {
    /// Short label used in reports (`1.0`, `1.1`, `3`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V3 => "3",
        }
    }

    /// Whether the library leaves locking to the caller (lock/id callbacks).
    #[must_use]
    pub const fn needs_locking_callbacks(self) -> bool {
        matches!(self, Self::V1_0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("can't retrieve libcrypto version")]
    Undetectable,
    #[error("libcrypto version {major}.{minor} is not supported")]
    Unsupported { major: i32, minor: i32 },
}

/// A supported `(major, minor)` pair. Immutable once detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionTag {
    major: u32,
    minor: u32,
}

impl VersionTag {
    pub const V1_0: Self = Self { major: 1, minor: 0 };
    pub const V1_1: Self = Self { major: 1, minor: 1 };
    pub const V3_0: Self = Self { major: 3, minor: 0 };

    /// Validate detector output.
    ///
    /// Either half being [`UNSUPPORTED`] means detection failed; otherwise
    /// only 1.0, 1.1 and any 3.x are accepted.
    pub fn from_detected(major: i32, minor: i32) -> Result<Self, VersionError> {
        if major == UNSUPPORTED || minor == UNSUPPORTED {
            return Err(VersionError::Undetectable);
        }
        let supported = match major {
            1 => minor == 0 || minor == 1,
            3 => minor >= 0,
            _ => false,
        };
        if !supported {
            return Err(VersionError::Unsupported { major, minor });
        }
        Ok(Self {
            major: major as u32,
            minor: minor as u32,
        })
    }

    /// Run both detectors against `probe` and validate the result.
    pub fn detect<P: VersionProbe + ?Sized>(probe: &P) -> Result<Self, VersionError> {
        Self::from_detected(detect_major(probe), detect_minor(probe))
    }

    #[must_use]
    pub const fn major(self) -> u32 {
        self.major
    }

    #[must_use]
    pub const fn minor(self) -> u32 {
        self.minor
    }

    #[must_use]
    pub const fn generation(self) -> Generation {
        match (self.major, self.minor) {
            (1, 0) => Generation::V1_0,
            (1, _) => Generation::V1_1,
            _ => Generation::V3,
        }
    }

    #[must_use]
    pub const fn is_legacy_1(self) -> bool {
        self.major == 1
    }

    #[must_use]
    pub const fn is_1_1(self) -> bool {
        self.major == 1 && self.minor == 1
    }

    /// 1.1.x or 3.x.
    #[must_use]
    pub const fn is_at_least_1_1(self) -> bool {
        self.is_3() || self.is_1_1()
    }

    #[must_use]
    pub const fn is_3(self) -> bool {
        self.major == 3
    }
}

impl std::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
