//! Declarative generation of the bound-function list.
//!
//! Provides the `bn_functions!` macro: one line per native entry point
//! (binding rule + C signature) expands into
//! - the `FnId` identity enum and its static name table,
//! - `REQUIREMENTS`, the data table iterated by the resolver,
//! - `sig::*` function-pointer type aliases,
//! - a typed accessor on `DispatchTable` per entry.
//!
//! Resolution itself is plain iteration over `REQUIREMENTS`; the macro only
//! keeps the identity, the name and the signature of each entry in one place.

/// Symbol looked up for an entry: the explicit alias, else the identifier.
macro_rules! bn_symbol_name {
    ($name:ident) => {
        stringify!($name)
    };
    ($name:ident $symbol:literal) => {
        $symbol
    };
}

/// Declare the bound functions.
///
/// # Usage
///
/// ```ignore
/// bn_functions! {
///     /// Doc comment for the accessor.
///     [Binding::ALWAYS] => fn BN_num_bits(a: *const BIGNUM) -> c_int;
///     [Binding::renamed_1_1("SSLeay_version")] => fn OpenSSL_version(kind: c_int) -> *const c_char;
///     // Same symbol, different signature per generation.
///     [Binding::LEGACY_1_0] => fn CRYPTO_free_1_0 = "CRYPTO_free"(ptr: *mut c_void);
/// }
/// ```
macro_rules! bn_functions {
    (
        $(
            $(#[$meta:meta])*
            [$binding:expr] => fn $name:ident $(= $symbol:literal)? ( $($arg:ident : $argty:ty),* $(,)? ) $(-> $ret:ty)?;
        )*
    ) => {
        /// Stable identity of a bound function, named after its modern symbol.
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum FnId {
            $( $name, )*
        }

        impl FnId {
            /// Every identity, in declaration order.
            pub const ALL: &'static [FnId] = &[ $( FnId::$name, )* ];
            /// Number of slots in a dispatch table.
            pub const COUNT: usize = Self::ALL.len();

            #[inline]
            #[must_use]
            pub const fn index(self) -> usize {
                self as usize
            }

            /// Identifier of this entry, distinct per slot.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( FnId::$name => stringify!($name), )*
                }
            }

            /// Symbol looked up for this identity (modern name for renamed entries).
            #[must_use]
            pub const fn symbol(self) -> &'static str {
                match self {
                    $( FnId::$name => bn_symbol_name!($name $($symbol)?), )*
                }
            }
        }

        /// Binding rule of every bound function, in [`FnId`] order.
        pub static REQUIREMENTS: &[bnlink_core::SymbolRequirement<FnId>] = &[
            $( bnlink_core::SymbolRequirement::new(FnId::$name, bn_symbol_name!($name $($symbol)?), $binding), )*
        ];

        /// Function-pointer types of the bound functions.
        #[allow(non_camel_case_types)]
        pub mod sig {
            use super::*;

            $(
                pub type $name = unsafe extern "C" fn( $($argty),* ) $(-> $ret)?;
            )*
        }

        impl $crate::table::DispatchTable {
            $(
                $(#[$meta])*
                ///
                /// # Panics
                ///
                /// If the detected version does not bind this function.
                #[allow(non_snake_case)]
                #[inline]
                #[must_use]
                #[track_caller]
                pub fn $name(&self) -> sig::$name {
                    let ptr = self.expect_resolved(FnId::$name);
                    // SAFETY: the slot was filled by resolving this exact symbol,
                    // whose C signature is the one declared above.
                    unsafe { std::mem::transmute::<*mut std::ffi::c_void, sig::$name>(ptr) }
                }
            )*
        }
    };
}
