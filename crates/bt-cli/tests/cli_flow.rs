//! End-to-end tests for the `bt` binary.
//!
//! Each test runs with an isolated HOME so no user configuration leaks in.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn bt_binary() -> String {
    env!("CARGO_BIN_EXE_bt").to_string()
}

/// Build a `bt` command isolated from the user's environment.
fn bt(home: &Path) -> Command {
    let mut command = Command::new(bt_binary());
    command
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("BT_DEFAULT_PRESET")
        .env_remove("BT_ESTIMATION__NAP_DURATION_MINUTES")
        .env_remove("BT_ESTIMATION__MIN_GAP_MINUTES");
    command
}

fn write_events(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("events.json");
    std::fs::write(&path, json).unwrap();
    path
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "bt should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

const THREE_EVENTS: &str = r#"[
    {"id": "a", "kind": "feeding"},
    {"id": "b", "kind": "diaper"},
    {"id": "c", "kind": "nap"}
]"#;

#[test]
fn test_validate_reports_all_violations_and_fails() {
    let temp = TempDir::new().unwrap();

    let output = bt(temp.path())
        .args([
            "validate",
            "--start",
            "2099-01-01T12:00:00Z",
            "--end",
            "2099-01-01T10:00:00Z",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Start time must be before end time"));
    assert!(stdout.contains("End time cannot be in the future"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("time window is invalid"));
}

#[test]
fn test_validate_accepts_preset() {
    let temp = TempDir::new().unwrap();

    let output = bt(temp.path())
        .args(["validate", "--preset", "24h", "--json"])
        .output()
        .unwrap();

    let report = stdout_json(&output);
    assert_eq!(report["valid"], true);
    assert_eq!(report["violations"], serde_json::json!([]));
}

#[test]
fn test_estimate_spreads_events_across_window() {
    let temp = TempDir::new().unwrap();
    let events = write_events(temp.path(), THREE_EVENTS);

    let output = bt(temp.path())
        .arg("estimate")
        .arg("--events")
        .arg(&events)
        .args([
            "--start",
            "2025-01-15T09:00:00Z",
            "--end",
            "2025-01-15T13:00:00Z",
            "--json",
        ])
        .output()
        .unwrap();

    let result = stdout_json(&output);
    assert_eq!(result["is_overflowed"], false);
    assert_eq!(result["total_duration_ms"], 85 * 60_000);
    assert_eq!(result["gap_time_ms"], 155 * 60_000);
    let times: Vec<_> = result["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["estimated_time"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        times,
        vec![
            "2025-01-15T09:00:00Z",
            "2025-01-15T10:11:40Z",
            "2025-01-15T11:08:20Z"
        ]
    );
}

#[test]
fn test_config_file_changes_durations() {
    let temp = TempDir::new().unwrap();
    let events = write_events(temp.path(), THREE_EVENTS);
    let config = temp.path().join("bt.toml");
    std::fs::write(&config, "[estimation]\nnap_duration_minutes = 240\n").unwrap();

    let output = bt(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("estimate")
        .arg("--events")
        .arg(&events)
        .args([
            "--start",
            "2025-01-15T09:00:00Z",
            "--end",
            "2025-01-15T13:00:00Z",
            "--json",
        ])
        .output()
        .unwrap();

    let result = stdout_json(&output);
    assert_eq!(result["is_overflowed"], true);
    assert_eq!(result["total_duration_ms"], 265 * 60_000);
}

#[test]
fn test_env_overrides_min_gap() {
    let temp = TempDir::new().unwrap();
    let events = write_events(
        temp.path(),
        r#"[{"id": "a", "kind": "diaper"}, {"id": "b", "kind": "diaper"}]"#,
    );

    let output = bt(temp.path())
        .env("BT_ESTIMATION__MIN_GAP_MINUTES", "20")
        .arg("estimate")
        .arg("--events")
        .arg(&events)
        .args([
            "--start",
            "2025-01-15T09:00:00Z",
            "--end",
            "2025-01-15T09:30:00Z",
            "--json",
        ])
        .output()
        .unwrap();

    let result = stdout_json(&output);
    // Without the override the second diaper lands at 09:15.
    assert_eq!(result["events"][1]["estimated_time"], "2025-01-15T09:20:00Z");
}

#[test]
fn test_batch_outputs_submission_for_drafts() {
    let temp = TempDir::new().unwrap();
    let events = write_events(
        temp.path(),
        r#"[
            {"id": "old", "kind": "nap", "is_existing": true,
             "existing_reference_id": "nap-3", "estimated_time": "2020-01-01T00:00:00Z"},
            {"id": "a", "kind": "feeding", "payload": {"amount_ml": 120}},
            {"id": "b", "kind": "diaper"}
        ]"#,
    );

    let output = bt(temp.path())
        .arg("batch")
        .arg("--events")
        .arg(&events)
        .args(["--preset", "2h"])
        .output()
        .unwrap();

    let submission = stdout_json(&output);
    let entries = submission["entries"].as_array().unwrap();
    let ids: Vec<_> = entries.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(entries[0]["payload"]["amount_ml"], 120);
    assert_eq!(entries[0]["time"], submission["window"]["start_time"]);
}

#[test]
fn test_batch_rejects_oversized_window() {
    let temp = TempDir::new().unwrap();
    let events = write_events(temp.path(), THREE_EVENTS);

    let output = bt(temp.path())
        .arg("batch")
        .arg("--events")
        .arg(&events)
        .args([
            "--start",
            "2025-01-13T09:00:00Z",
            "--end",
            "2025-01-15T09:00:00Z",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Time window cannot exceed 24 hours"));
}

#[test]
fn test_presets_lists_all_windows() {
    let temp = TempDir::new().unwrap();

    let output = bt(temp.path()).arg("presets").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 6);
    assert!(stdout.contains("Last 4 hours"));
    assert!(stdout.contains("(default)"));
}
