//! Stage logs produced by probe runs validate against the log schema.

use std::path::PathBuf;

use bnlink::{BnError, LoaderConfig};
use bnlink_harness::structured_log::{validate_log_file, validate_log_line};
use bnlink_harness::{LogEmitter, probe_logged};

fn temp_log(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("bnlink-{name}-{}.jsonl", std::process::id()))
}

#[test]
fn missing_library_logs_one_failed_open_stage() {
    let path = temp_log("missing");
    let mut log = LogEmitter::to_file(&path, "missing").unwrap();
    let result = probe_logged(&LoaderConfig::with_override("0.bnlink-absent"), &mut log).unwrap();
    drop(log);
    assert!(matches!(result, Err(BnError::Load(_))), "{result:?}");

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    let entry = validate_log_line(lines[0], 1).unwrap();
    assert_eq!(entry.event, "probe_failed");
    assert_eq!(entry.trace_id, "bnlink::missing::001");
    let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(parsed["stage"], "library_open");
    assert_eq!(parsed["outcome"], "fail");
    assert!(
        parsed["details"]["error"]
            .as_str()
            .unwrap()
            .contains("0.bnlink-absent")
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn host_probe_logs_every_stage() {
    let path = temp_log("host");
    let mut log = LogEmitter::to_file(&path, "host").unwrap();
    let result = probe_logged(&LoaderConfig::search(), &mut log).unwrap();
    drop(log);
    let report = match result {
        Ok(report) => report,
        Err(BnError::NoLibrary) => {
            eprintln!("Skipping: no libcrypto on this host");
            let _ = std::fs::remove_file(&path);
            return;
        }
        Err(err) => panic!("probe failed: {err}"),
    };

    let (count, errors) = validate_log_file(&path).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(count, 4 + report.missing.len());

    let content = std::fs::read_to_string(&path).unwrap();
    let stages: Vec<String> = content
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["stage"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(stages.first().map(String::as_str), Some("library_open"));
    assert_eq!(stages.last().map(String::as_str), Some("thread_setup"));
    let _ = std::fs::remove_file(&path);
}
