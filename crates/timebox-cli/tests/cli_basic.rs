//! Basic CLI E2E tests.
//!
//! Tests invoke the built CLI binary and verify outputs. Each test gets its
//! own HOME so the config file never touches the real one.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run a CLI command with `home` as HOME and return (stdout, stderr, code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_timebox-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("TIMEBOX_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn parse(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

const EXISTING: &str = r#"[
    {"title": "Standup", "startTime": "2026-02-16T09:00:00Z", "endTime": "2026-02-16T10:00:00Z", "isFixed": true},
    {"title": "Reading", "startTime": "2026-02-16T14:00:00Z", "endTime": "2026-02-16T15:00:00Z", "category": "social"}
]"#;

#[test]
fn test_check_reports_fixed_conflict_with_alternatives() {
    let dir = TempDir::new().unwrap();
    let existing = write_file(&dir, "existing.json", EXISTING);
    let candidate = write_file(
        &dir,
        "candidate.json",
        r#"{"title": "Call", "startTime": "2026-02-16T10:14:00Z", "endTime": "2026-02-16T11:14:00Z"}"#,
    );

    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &[
            "check",
            "--candidate",
            candidate.to_str().unwrap(),
            "--existing",
            existing.to_str().unwrap(),
            "--buffer",
            "15",
        ],
    );
    assert_eq!(code, 0, "check failed: {stderr}");
    let json = parse(&stdout);
    assert_eq!(json["hasConflict"], true);
    assert_eq!(json["action"], "FIND_ALTERNATIVES");
    assert!(!json["alternativeSlots"].as_array().unwrap().is_empty());
}

#[test]
fn test_check_rounds_candidate_duration_for_alternatives() {
    let dir = TempDir::new().unwrap();
    let existing = write_file(&dir, "existing.json", EXISTING);
    let candidate = write_file(
        &dir,
        "candidate.json",
        r#"{"title": "Call", "startTime": "2026-02-16T09:30:00Z", "endTime": "2026-02-16T10:14:30Z"}"#,
    );

    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &[
            "check",
            "--candidate",
            candidate.to_str().unwrap(),
            "--existing",
            existing.to_str().unwrap(),
            "--buffer",
            "15",
        ],
    );
    assert_eq!(code, 0, "check failed: {stderr}");
    let json = parse(&stdout);
    let slots = json["alternativeSlots"].as_array().unwrap();
    assert!(!slots.is_empty());
    assert!(slots.iter().all(|s| s["durationMinutes"] == 45));
}

#[test]
fn test_check_at_buffer_edge_is_clear() {
    let dir = TempDir::new().unwrap();
    let existing = write_file(&dir, "existing.json", EXISTING);
    let candidate = write_file(
        &dir,
        "candidate.json",
        r#"{"title": "Call", "startTime": "2026-02-16T10:15:00Z", "endTime": "2026-02-16T11:15:00Z"}"#,
    );

    let (stdout, _, code) = run_cli(
        dir.path(),
        &[
            "check",
            "--candidate",
            candidate.to_str().unwrap(),
            "--existing",
            existing.to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0);
    let json = parse(&stdout);
    assert_eq!(json["hasConflict"], false);
    assert!(json["alternativeSlots"].as_array().unwrap().is_empty());
}

#[test]
fn test_slots_on_empty_day() {
    let dir = TempDir::new().unwrap();
    let existing = write_file(&dir, "existing.json", "[]");

    let (stdout, _, code) = run_cli(
        dir.path(),
        &[
            "slots",
            "--existing",
            existing.to_str().unwrap(),
            "--duration",
            "60",
            "--date",
            "2026-02-16",
        ],
    );
    assert_eq!(code, 0);
    let json = parse(&stdout);
    let slots = json.as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["durationMinutes"], 60);
}

#[test]
fn test_burnout_flags_long_block() {
    let dir = TempDir::new().unwrap();
    let activities = write_file(
        &dir,
        "day.json",
        r#"[{"title": "Marathon", "startTime": "2026-02-16T09:00:00Z", "endTime": "2026-02-16T12:30:00Z", "category": "deep_work"}]"#,
    );

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["burnout", "--activities", activities.to_str().unwrap()],
    );
    assert_eq!(code, 0);
    let json = parse(&stdout);
    assert_eq!(json[0]["continuousMinutes"], 210);
}

#[test]
fn test_triage_within_capacity() {
    let dir = TempDir::new().unwrap();
    let activities = write_file(&dir, "day.json", EXISTING);

    let (stdout, _, code) = run_cli(
        dir.path(),
        &[
            "triage",
            "--activities",
            activities.to_str().unwrap(),
            "--date",
            "2026-02-16",
        ],
    );
    assert_eq!(code, 0);
    let json = parse(&stdout);
    assert_eq!(json["isOverload"], false);
    assert_eq!(json["totalDurationMinutes"], 135);
}

#[test]
fn test_validate_rejects_fixed_conflict() {
    let dir = TempDir::new().unwrap();
    let existing = write_file(&dir, "existing.json", EXISTING);
    let proposal = write_file(
        &dir,
        "proposal.json",
        r#"{
            "action": "DRAFT_CREATED",
            "summary": "two blocks",
            "data": {"new_activities": [
                {"title": "Gym", "start": "2026-02-16T17:00:00Z", "end": "2026-02-16T18:00:00Z", "is_fixed": false, "category": "health", "priority": 2},
                {"title": "Call", "start": "2026-02-16T09:30:00Z", "end": "2026-02-16T10:00:00Z", "is_fixed": false, "category": "admin", "priority": 3}
            ]},
            "ai_reasoning": "fits"
        }"#,
    );

    let (stdout, _, code) = run_cli(
        dir.path(),
        &[
            "validate",
            "--proposal",
            proposal.to_str().unwrap(),
            "--existing",
            existing.to_str().unwrap(),
            "--date",
            "2026-02-16",
        ],
    );
    assert_eq!(code, 0);
    let json = parse(&stdout);
    assert_eq!(json["verdict"], "rejected");
    assert_eq!(json["index"], 1);
    assert!(json["alternativeSlots"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["durationMinutes"] == 30));
}

#[test]
fn test_invalid_activity_file_fails() {
    let dir = TempDir::new().unwrap();
    let activities = write_file(
        &dir,
        "bad.json",
        r#"[{"title": "Backwards", "startTime": "2026-02-16T10:00:00Z", "endTime": "2026-02-16T09:00:00Z"}]"#,
    );

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["burnout", "--activities", activities.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "policy.buffer_minutes", "30"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "policy.buffer_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");
}

#[test]
fn test_config_rejects_out_of_range_buffer() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "policy.buffer_minutes", "90"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_list_and_reset() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["config", "set", "throttle.limit", "5"]);

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let json = parse(&stdout);
    assert_eq!(json["throttle"]["limit"], 10);
    assert_eq!(json["policy"]["buffer_minutes"], 15);
}
