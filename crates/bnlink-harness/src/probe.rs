//! Logged probe runs and requirement matrices.

use std::time::Instant;

use bnlink::{BnError, LoaderConfig, ProbeReport, VersionTag};
use bnlink_abi::REQUIREMENTS;
use serde::Serialize;

use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, Stage};

/// Stage a probe error stopped at.
fn failed_stage(err: &BnError) -> Stage {
    match err {
        BnError::Load(_) | BnError::NoLibrary => Stage::LibraryOpen,
        BnError::Version(_) => Stage::VersionDetect,
        _ => Stage::TableBuild,
    }
}

/// Run [`bnlink::probe`] and record one stage entry per initialization step.
///
/// A probe failure is logged at the stage it stopped at and then returned.
pub fn probe_logged(
    config: &LoaderConfig,
    log: &mut LogEmitter,
) -> std::io::Result<Result<ProbeReport, BnError>> {
    let started = Instant::now();
    let result = bnlink::probe(config);
    let elapsed = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            log.emit_entry(
                LogEntry::new(String::new(), LogLevel::Error, "probe_failed")
                    .with_stage(failed_stage(&err))
                    .with_outcome(Outcome::Fail)
                    .with_duration_us(elapsed)
                    .with_details(serde_json::json!({ "error": err.to_string() })),
            )?;
            log.flush()?;
            return Ok(Err(err));
        }
    };

    log.emit_entry(
        LogEntry::new(String::new(), LogLevel::Info, "library_opened")
            .with_stage(Stage::LibraryOpen)
            .with_library(&report.library)
            .with_outcome(Outcome::Pass),
    )?;
    log.emit_entry(
        LogEntry::new(String::new(), LogLevel::Info, "version_detected")
            .with_stage(Stage::VersionDetect)
            .with_library(&report.library)
            .with_version(&report.version)
            .with_outcome(Outcome::Pass)
            .with_details(serde_json::json!({ "generation": report.generation })),
    )?;
    for symbol in &report.missing {
        log.emit_entry(
            LogEntry::new(String::new(), LogLevel::Error, "symbol_missing")
                .with_stage(Stage::TableBuild)
                .with_version(&report.version)
                .with_symbol(*symbol)
                .with_outcome(Outcome::Fail),
        )?;
    }
    let (level, outcome) = if report.is_complete() {
        (LogLevel::Info, Outcome::Pass)
    } else {
        (LogLevel::Error, Outcome::Fail)
    };
    log.emit_entry(
        LogEntry::new(String::new(), level, "table_built")
            .with_stage(Stage::TableBuild)
            .with_version(&report.version)
            .with_outcome(outcome)
            .with_duration_us(elapsed)
            .with_details(serde_json::json!({
                "bound": report.bound.len(),
                "skipped": report.skipped.len(),
                "missing": report.missing.len(),
            })),
    )?;
    let thread_setup = if report.needs_locking_shim {
        Outcome::Pass
    } else {
        Outcome::Skip
    };
    log.emit_entry(
        LogEntry::new(String::new(), LogLevel::Info, "thread_setup_decided")
            .with_stage(Stage::ThreadSetup)
            .with_version(&report.version)
            .with_outcome(thread_setup)
            .with_details(serde_json::json!({ "locking_shim": report.needs_locking_shim })),
    )?;
    log.flush()?;
    Ok(Ok(report))
}

/// One bound function and what it resolves to for a given version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementRow {
    pub function: &'static str,
    pub symbol: Option<&'static str>,
    pub required: bool,
}

/// Resolution plan for `version`, in dispatch table order.
#[must_use]
pub fn requirement_matrix(version: VersionTag) -> Vec<RequirementRow> {
    REQUIREMENTS
        .iter()
        .map(|req| RequirementRow {
            function: req.id.name(),
            symbol: req.symbol_for(version),
            required: req.is_required(version),
        })
        .collect()
}
