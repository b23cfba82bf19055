//! Library location policy.
//!
//! The library to load is chosen by the `BNLINK_LIBCRYPTO_VERSION`
//! environment variable:
//! - non-empty: the value is used as the only version suffix
//!   (`BNLINK_LIBCRYPTO_VERSION=1.1.1k-fips` → `libcrypto.so.1.1.1k-fips`);
//! - unset or empty: the well-known suffixes in [`KNOWN_VERSIONS`] are tried
//!   from newest to oldest.

/// Environment variable carrying an explicit version suffix.
pub const VERSION_OVERRIDE_ENV: &str = "BNLINK_LIBCRYPTO_VERSION";

/// Supported and well-known libcrypto suffixes, in decreasing version order.
///
/// FreeBSD numbers its libraries independently of upstream (11 before 111).
/// 1.0.2 ships as either `1.0.2` or `1.0.0` depending on the distribution,
/// and Fedora derivatives use `10`.
pub const KNOWN_VERSIONS: [&str; 7] = ["3", "1.1", "11", "111", "1.0.2", "1.0.0", "10"];

/// Shared-library extension for the build target.
#[must_use]
pub const fn library_extension() -> &'static str {
    if cfg!(target_os = "macos") {
        ".dylib"
    } else {
        ".so"
    }
}

/// File name for a version suffix, e.g. `libcrypto.so.3`.
#[must_use]
pub fn library_file_name(version: &str) -> String {
    format!("libcrypto{}.{version}", library_extension())
}

/// Where to look for libcrypto.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    version_override: Option<String>,
}

impl LoaderConfig {
    /// Probe the known suffixes.
    #[must_use]
    pub fn search() -> Self {
        Self::default()
    }

    /// Load exactly `version`; an empty value means search.
    #[must_use]
    pub fn with_override(version: impl Into<String>) -> Self {
        let version = version.into();
        let trimmed = version.trim();
        Self {
            version_override: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    /// Read [`VERSION_OVERRIDE_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(VERSION_OVERRIDE_ENV) {
            Ok(raw) => Self::with_override(raw),
            Err(_) => Self::search(),
        }
    }

    #[must_use]
    pub fn version_override(&self) -> Option<&str> {
        self.version_override.as_deref()
    }

    /// File names to try, in order.
    #[must_use]
    pub fn candidates(&self) -> Vec<String> {
        match &self.version_override {
            Some(version) => vec![library_file_name(version)],
            None => KNOWN_VERSIONS.iter().map(|v| library_file_name(v)).collect(),
        }
    }
}
