//! Symbol requirements: which name to bind, and for which generations.
//!
//! Each bound function is described once by a [`SymbolRequirement`]. The
//! requirement is either a direct binding gated by an [`Availability`]
//! predicate, or a renamed binding that is always required but resolves the
//! historical name on generations older than the rename.

use crate::version::{Generation, VersionTag};

/// Version range in which a directly-bound symbol must exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Every supported generation.
    Always,
    /// 1.0.x only.
    Legacy1_0,
    /// Any 1.x.
    Legacy1,
    /// 1.1.x and 3.x.
    Since1_1,
    /// 3.x only.
    Since3_0,
}

impl Availability {
    /// Evaluate the predicate for `version`.
    #[must_use]
    pub const fn includes(self, version: VersionTag) -> bool {
        let major = version.major();
        let minor = version.minor();
        match self {
            Self::Always => true,
            Self::Legacy1_0 => major == 1 && minor == 0,
            Self::Legacy1 => major == 1,
            Self::Since1_1 => major == 3 || (major == 1 && minor == 1),
            Self::Since3_0 => major == 3,
        }
    }
}

/// How a requirement picks its symbol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Bind the canonical name when the predicate holds; skip otherwise.
    Direct(Availability),
    /// Always bind: `legacy` strictly before `since`, the canonical name from
    /// `since` on.
    Renamed {
        legacy: &'static str,
        since: Generation,
    },
}

impl Binding {
    pub const ALWAYS: Self = Self::Direct(Availability::Always);
    pub const LEGACY_1_0: Self = Self::Direct(Availability::Legacy1_0);
    pub const LEGACY_1: Self = Self::Direct(Availability::Legacy1);
    pub const SINCE_1_1: Self = Self::Direct(Availability::Since1_1);
    pub const SINCE_3_0: Self = Self::Direct(Availability::Since3_0);

    /// Renamed in 1.1.0 (1.0.x exports `legacy`).
    #[must_use]
    pub const fn renamed_1_1(legacy: &'static str) -> Self {
        Self::Renamed {
            legacy,
            since: Generation::V1_1,
        }
    }

    /// Renamed in 3.0 (every 1.x exports `legacy`).
    #[must_use]
    pub const fn renamed_3_0(legacy: &'static str) -> Self {
        Self::Renamed {
            legacy,
            since: Generation::V3,
        }
    }
}

/// Static record describing one bound function.
///
/// `id` is the stable identity callers use; `name` is the canonical (modern)
/// symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRequirement<I> {
    pub id: I,
    pub name: &'static str,
    pub binding: Binding,
}

impl<I: Copy> SymbolRequirement<I> {
    #[must_use]
    pub const fn new(id: I, name: &'static str, binding: Binding) -> Self {
        Self { id, name, binding }
    }

    /// Symbol to resolve for `version`, or `None` when the slot stays empty.
    #[must_use]
    pub fn symbol_for(&self, version: VersionTag) -> Option<&'static str> {
        match self.binding {
            Binding::Direct(availability) => availability.includes(version).then_some(self.name),
            Binding::Renamed { legacy, since } => {
                if version.generation() < since {
                    Some(legacy)
                } else {
                    Some(self.name)
                }
            }
        }
    }

    /// Whether the requirement binds anything for `version`.
    #[must_use]
    pub fn is_required(&self, version: VersionTag) -> bool {
        self.symbol_for(version).is_some()
    }
}
