//! CLI entry point for the bnlink probe harness.

use std::path::PathBuf;

use bnlink::{LoaderConfig, VersionTag};
use bnlink_harness::{LogEmitter, probe_logged, requirement_matrix};
use clap::{Parser, Subcommand};

/// Runtime libcrypto binding probe.
#[derive(Debug, Parser)]
#[command(name = "bnlink-harness")]
#[command(about = "Probe libcrypto symbol resolution without initializing it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open, detect and resolve, then print the probe report as JSON.
    Probe {
        /// Library version suffix to load instead of searching
        /// (`libcrypto.so.<suffix>`). Defaults to BNLINK_LIBCRYPTO_VERSION.
        #[arg(long = "version")]
        suffix: Option<String>,
        /// JSONL stage log destination; stdout stays the report.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Run identifier stamped into every log entry.
        #[arg(long, default_value = "probe")]
        run_id: String,
    },
    /// Print which symbol each bound function resolves to for a version.
    Requirements {
        /// Version as `major.minor`, e.g. `1.0`, `1.1`, `3.2`.
        #[arg(long, value_parser = parse_version)]
        version: VersionTag,
        /// Only list functions bound for this version.
        #[arg(long)]
        required_only: bool,
    },
}

fn parse_version(text: &str) -> Result<VersionTag, String> {
    let (major, minor) = text
        .split_once('.')
        .ok_or_else(|| format!("expected major.minor, got '{text}'"))?;
    let major: i32 = major
        .parse()
        .map_err(|e| format!("bad major '{major}': {e}"))?;
    let minor: i32 = minor
        .parse()
        .map_err(|e| format!("bad minor '{minor}': {e}"))?;
    VersionTag::from_detected(major, minor).map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Probe {
            suffix,
            log,
            run_id,
        } => {
            let config = match suffix {
                Some(suffix) => LoaderConfig::with_override(suffix),
                None => LoaderConfig::from_env(),
            };
            let mut emitter = match &log {
                Some(path) => LogEmitter::to_file(path, &run_id)?,
                None => LogEmitter::to_buffer(&run_id),
            };
            let report = probe_logged(&config, &mut emitter)??;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if let Some(path) = log {
                eprintln!("Stage log written to {}", path.display());
            }
            if !report.is_complete() {
                return Err(format!(
                    "{} required symbol(s) missing from {}",
                    report.missing.len(),
                    report.library
                )
                .into());
            }
        }
        Command::Requirements {
            version,
            required_only,
        } => {
            let rows: Vec<_> = requirement_matrix(version)
                .into_iter()
                .filter(|row| !required_only || row.required)
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}
