//! Probe tooling for runtime libcrypto binding.
//!
//! This crate provides:
//! - Probing: open, detect and resolve against a library without
//!   initializing it, logging each stage as JSONL
//! - Requirement matrices: which symbol every bound function resolves to for
//!   a given version

#![forbid(unsafe_code)]

pub mod probe;
pub mod structured_log;

pub use probe::{RequirementRow, probe_logged, requirement_matrix};
pub use structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, Stage};
