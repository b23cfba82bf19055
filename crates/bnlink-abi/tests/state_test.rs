use bnlink_abi::{dispatch, publish, try_load_functions};
use bnlink_core::VersionTag;

mod common;

use common::FakeLibcrypto;

#[test]
fn first_published_table_wins() {
    assert!(dispatch().is_none());

    let first = try_load_functions(&FakeLibcrypto::stubbed_for(VersionTag::V1_1), VersionTag::V1_1)
        .expect("1.1 table");
    let second = try_load_functions(&FakeLibcrypto::stubbed_for(VersionTag::V3_0), VersionTag::V3_0)
        .expect("3.0 table");

    let published = publish(first);
    assert_eq!(published.version(), VersionTag::V1_1);

    let again = publish(second);
    assert!(std::ptr::eq(published, again));
    assert_eq!(again.version(), VersionTag::V1_1);
    assert!(std::ptr::eq(dispatch().expect("published"), published));
}
