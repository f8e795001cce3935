//! End-to-end tests for the complete tracking flow.
//!
//! Drives the compiled binary against a scratch database:
//! start → stop → entries → export.

use std::process::{Command, Output};

use tempfile::TempDir;

fn wt_binary() -> String {
    env!("CARGO_BIN_EXE_wt").to_string()
}

fn run_wt(temp: &TempDir, args: &[&str]) -> Output {
    Command::new(wt_binary())
        .env("WT_DATABASE_PATH", temp.path().join("wt.db"))
        .args(args)
        .output()
        .expect("failed to run wt")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_start_stop_records_an_entry() {
    let temp = TempDir::new().unwrap();

    let output = run_wt(&temp, &["start", "1"]);
    assert!(
        output.status.success(),
        "start should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout_of(&output).contains("Started Workspace 1."));

    let output = run_wt(&temp, &["stop", "-m", "write release notes"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Recorded"));
    assert!(stdout.contains("write release notes"));

    let output = run_wt(&temp, &["entries"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("write release notes"));
    assert!(stdout.contains("1 entries, total"));
}

#[test]
fn test_timer_state_survives_separate_invocations() {
    let temp = TempDir::new().unwrap();

    run_wt(&temp, &["start", "2"]);

    // A separate process still sees the running timer.
    let output = run_wt(&temp, &["status"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let running_line = stdout
        .lines()
        .find(|line| line.contains("(running)"))
        .expect("status should mark the running workspace");
    assert!(running_line.contains("Workspace 2"));

    let output = run_wt(&temp, &["stop"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("No description"));
}

#[test]
fn test_switching_workspaces_flushes_the_previous_one() {
    let temp = TempDir::new().unwrap();

    run_wt(&temp, &["start", "1"]);
    let output = run_wt(&temp, &["start", "2"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("on Workspace 1"));
    assert!(stdout.contains("Started Workspace 2."));

    // Exactly one entry exists, attributed to workspace 1.
    let output = run_wt(&temp, &["entries", "--workspace", "1"]);
    assert!(stdout_of(&output).contains("1 entries, total"));
    let output = run_wt(&temp, &["entries", "--workspace", "2"]);
    assert!(stdout_of(&output).contains("No entries recorded."));
}

#[test]
fn test_stop_without_running_timer_reports_it() {
    let temp = TempDir::new().unwrap();

    let output = run_wt(&temp, &["stop"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("No timer is running."));
}

#[test]
fn test_export_produces_csv_with_header() {
    let temp = TempDir::new().unwrap();

    run_wt(&temp, &["workspaces", "rename", "1", "client work"]);
    run_wt(&temp, &["start", "1"]);
    run_wt(&temp, &["stop", "-m", "invoice prep"]);

    let output = run_wt(&temp, &["export"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Workspace,Date,Start Time,End Time,Duration,Duration (seconds),Description"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("\"client work\","));
    assert!(row.ends_with("\"invoice prep\""));
}

#[test]
fn test_export_with_no_entries_fails_with_a_message() {
    let temp = TempDir::new().unwrap();

    let output = run_wt(&temp, &["export"]);
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("no entries to export")
    );
}

#[test]
fn test_workspace_count_round_trip_preserves_history() {
    let temp = TempDir::new().unwrap();

    let output = run_wt(&temp, &["workspaces", "count", "3"]);
    assert!(output.status.success());

    run_wt(&temp, &["start", "3"]);
    run_wt(&temp, &["stop", "-m", "kept through resize"]);

    run_wt(&temp, &["workspaces", "count", "1"]);
    let output = run_wt(&temp, &["entries"]);
    assert!(stdout_of(&output).contains("No entries recorded."));

    run_wt(&temp, &["workspaces", "count", "3"]);
    let output = run_wt(&temp, &["entries"]);
    assert!(stdout_of(&output).contains("kept through resize"));
}

#[test]
fn test_describe_delete_and_clear() {
    let temp = TempDir::new().unwrap();

    run_wt(&temp, &["start", "1"]);
    run_wt(&temp, &["stop", "-m", "first"]);
    run_wt(&temp, &["start", "1"]);
    run_wt(&temp, &["stop", "-m", "second"]);

    // Entry ids are assigned in creation order.
    let output = run_wt(&temp, &["describe", "1", "first, revised"]);
    assert!(output.status.success());
    let output = run_wt(&temp, &["entries"]);
    assert!(stdout_of(&output).contains("first, revised"));

    let output = run_wt(&temp, &["delete", "2"]);
    assert!(output.status.success());
    let output = run_wt(&temp, &["entries"]);
    let stdout = stdout_of(&output);
    assert!(!stdout.contains("second"));
    assert!(stdout.contains("1 entries, total"));

    let output = run_wt(&temp, &["clear"]);
    assert!(output.status.success());
    let output = run_wt(&temp, &["entries"]);
    assert!(stdout_of(&output).contains("No entries recorded."));
}

#[test]
fn test_invalid_workspace_count_is_rejected() {
    let temp = TempDir::new().unwrap();

    let output = run_wt(&temp, &["workspaces", "count", "0"]);
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("workspace count must be at least 1")
    );
}
