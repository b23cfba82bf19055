//! Process-wide dispatch table slot.
//!
//! Written once during initialization, read lock-free afterwards.

use std::sync::OnceLock;

use crate::table::DispatchTable;

static TABLE: OnceLock<DispatchTable> = OnceLock::new();

/// Publish `table` as the process-wide dispatch table and return the
/// published one.
///
/// Only the first call wins; a later table is dropped and the first one is
/// returned instead.
pub fn publish(table: DispatchTable) -> &'static DispatchTable {
    TABLE.get_or_init(|| table)
}

/// The published table, if initialization has completed.
#[must_use]
pub fn dispatch() -> Option<&'static DispatchTable> {
    TABLE.get()
}
