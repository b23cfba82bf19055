use std::ffi::{c_uint, c_ulong};

use bnlink_abi::{detect_major, detect_minor, detect_version};
use bnlink_core::{Generation, VersionError, VersionTag};

#[macro_use]
mod common;

use common::FakeLibcrypto;

extern "C" fn ssleay_1_0_2o() -> c_ulong {
    0x1000_20ff
}

extern "C" fn version_num_1_1_1q() -> c_ulong {
    0x1010_111f
}

extern "C" fn version_num_3_0_2() -> c_ulong {
    0x3000_0020
}

extern "C" fn major_3() -> c_uint {
    3
}

extern "C" fn major_4() -> c_uint {
    4
}

extern "C" fn minor_2() -> c_uint {
    2
}

#[test]
fn legacy_1_0_via_ssleay() {
    let lib = FakeLibcrypto::empty().with("SSLeay", addr!(ssleay_1_0_2o));
    unsafe {
        assert_eq!(detect_major(&lib), 1);
        assert_eq!(detect_minor(&lib), 0);
        assert_eq!(detect_version(&lib), Ok(VersionTag::V1_0));
    }
}

#[test]
fn release_1_1_via_version_num() {
    let lib = FakeLibcrypto::empty().with("OpenSSL_version_num", addr!(version_num_1_1_1q));
    let version = unsafe { detect_version(&lib) }.expect("1.1 detected");
    assert_eq!(version, VersionTag::V1_1);
    assert_eq!(version.generation(), Generation::V1_1);
}

#[test]
fn version_num_is_tried_before_ssleay() {
    let lib = FakeLibcrypto::empty()
        .with("OpenSSL_version_num", addr!(version_num_1_1_1q))
        .with("SSLeay", addr!(ssleay_1_0_2o));
    assert_eq!(unsafe { detect_minor(&lib) }, 1);
}

#[test]
fn release_3_via_direct_queries() {
    let lib = FakeLibcrypto::empty()
        .with("OPENSSL_version_major", addr!(major_3))
        .with("OPENSSL_version_minor", addr!(minor_2))
        .with("OpenSSL_version_num", addr!(version_num_3_0_2));
    let version = unsafe { detect_version(&lib) }.expect("3.x detected");
    assert_eq!((version.major(), version.minor()), (3, 2));
    assert_eq!(version.generation(), Generation::V3);
    assert_eq!(version.to_string(), "3.2");
    // The direct queries answer first; the packed number is never consulted.
    assert!(!lib.lookups().iter().any(|name| name == "SSLeay"));
}

#[test]
fn unknown_direct_major_is_unsupported() {
    let lib = FakeLibcrypto::empty()
        .with("OPENSSL_version_major", addr!(major_4))
        .with("OPENSSL_version_minor", addr!(minor_2));
    assert_eq!(unsafe { detect_major(&lib) }, -1);
    assert_eq!(unsafe { detect_version(&lib) }, Err(VersionError::Undetectable));
}

#[test]
fn packed_3_without_direct_queries_is_unsupported() {
    let lib = FakeLibcrypto::empty().with("OpenSSL_version_num", addr!(version_num_3_0_2));
    assert_eq!(unsafe { detect_major(&lib) }, -1);
    assert_eq!(unsafe { detect_minor(&lib) }, -1);
}

#[test]
fn nothing_exported_is_undetectable() {
    let lib = FakeLibcrypto::empty();
    unsafe {
        assert_eq!(detect_major(&lib), -1);
        assert_eq!(detect_minor(&lib), -1);
        assert_eq!(detect_version(&lib), Err(VersionError::Undetectable));
    }
}
