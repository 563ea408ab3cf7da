//! CLI integration tests
//!
//! Runs the `tm` binary against the sample project with a DuckDB file in a
//! temporary directory.

use std::path::Path;
use std::process::{Command, Output};

/// Path to the compiled tm binary (resolved at compile time)
fn tm_bin() -> String {
    env!("CARGO_BIN_EXE_tm").to_string()
}

fn sample_project_dir() -> &'static str {
    "tests/fixtures/sample_project"
}

fn tm(db: &Path, args: &[&str]) -> Output {
    Command::new(tm_bin())
        .args(["--project-dir", sample_project_dir()])
        .arg("--database")
        .arg(db)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("TIDEMARK_DATABASE")
        .output()
        .expect("Failed to run tm")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "tm should succeed.\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_full_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lifecycle.duckdb");

    let output = tm(&db, &["init"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "init: 0 -> 1");

    let output = tm(&db, &["up"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "up: 1 -> 4");

    let output = tm(&db, &["version"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "4");

    let output = tm(&db, &["down"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "down: 4 -> 3");

    let output = tm(&db, &["reset"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "reset: 3 -> 1");

    let output = tm(&db, &["version"]);
    assert_eq!(stdout(&output), "1");
}

#[test]
fn test_up_to_target_then_status_json() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("status.duckdb");

    assert_success(&tm(&db, &["init"]));
    let output = tm(&db, &["up", "2"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "up: 1 -> 2");

    let output = tm(&db, &["status", "--output", "json"]);
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["current"], 2);
    assert_eq!(json["last_applied"]["name"], "create_accounts");

    let entries = json["entries"].as_array().unwrap();
    let applied: Vec<bool> = entries
        .iter()
        .map(|e| e["applied"].as_bool().unwrap())
        .collect();
    assert_eq!(applied, vec![true, true, false, false]);
}

#[test]
fn test_status_table() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("table.duckdb");
    assert_success(&tm(&db, &["init"]));

    let output = tm(&db, &["status"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.starts_with("VERSION"), "unexpected output: {text}");
    assert!(text.contains("create_sessions"));
    assert!(text.contains("3 pending migration(s)"));
}

#[test]
fn test_set_version_alias() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("set.duckdb");
    assert_success(&tm(&db, &["init"]));

    let output = tm(&db, &["set-version", "3"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "set_version: 1 -> 3");

    // Only migration 4 runs; 2 and 3 were recorded without executing
    let output = tm(&db, &["up"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[M001]"), "stderr: {stderr}");
    assert!(stderr.contains("4_seed_admin.up.sql"), "stderr: {stderr}");
}

#[test]
fn test_set_version_unknown_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("unknown.duckdb");
    assert_success(&tm(&db, &["init"]));

    let output = tm(&db, &["set_version", "99"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[M003]"), "stderr: {stderr}");
    assert!(stderr.contains("still at version 1"), "stderr: {stderr}");
}

#[test]
fn test_init_twice_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("twice.duckdb");
    assert_success(&tm(&db, &["init"]));

    let output = tm(&db, &["init"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[D004]"), "stderr: {stderr}");
}

#[test]
fn test_usage_errors_do_not_panic() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("usage.duckdb");

    for args in [&["set_version"][..], &["up", "latest"][..], &["migrate"][..]] {
        let output = tm(&db, args);
        assert_eq!(output.status.code(), Some(2), "args: {args:?}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("panicked"), "stderr: {stderr}");
    }
    assert!(!db.exists());
}

#[test]
fn test_missing_config_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(tm_bin())
        .args(["--project-dir"])
        .arg(dir.path())
        .arg("version")
        .env_remove("TIDEMARK_DATABASE")
        .output()
        .expect("Failed to run tm");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[E001]"), "stderr: {stderr}");
}
