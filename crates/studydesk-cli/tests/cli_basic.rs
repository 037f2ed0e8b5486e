//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated data directory and verify
//! outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against `home` and return (code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_studydesk"))
        .args(args)
        .env("STUDYDESK_HOME", home)
        .env("STUDYDESK_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_timer_modes() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["timer", "modes"]);
    assert_eq!(code, 0, "Timer modes failed");
    let modes = parse_json(&stdout);
    assert_eq!(modes[0]["mode"], "focus");
    assert_eq!(modes[0]["duration"], "25:00");
    assert_eq!(modes[1]["duration"], "05:00");
    assert_eq!(modes[2]["duration"], "15:00");
}

#[test]
fn test_timer_simulate_one_focus_phase() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["timer", "simulate", "--ticks", "1500"]);
    assert_eq!(code, 0, "Timer simulate failed");
    let summary = parse_json(&stdout);
    assert_eq!(summary["state"]["mode"], "short_break");
    assert_eq!(summary["state"]["remaining_secs"], 300);
    assert_eq!(summary["state"]["is_running"], false);
    assert_eq!(summary["stats"]["completed_pomodoros"], 1);
}

#[test]
fn test_timer_simulate_long_break_after_four() {
    let home = tempfile::tempdir().unwrap();
    // 3 x (1500 + 300) + 1500 ticks lands exactly on the 4th focus expiry.
    let (code, stdout, _) = run_cli(
        home.path(),
        &["timer", "simulate", "--ticks", "6900", "--auto-start"],
    );
    assert_eq!(code, 0);
    let summary = parse_json(&stdout);
    assert_eq!(summary["state"]["mode"], "long_break");
    assert_eq!(summary["state"]["focus_cycle_count"], 4);
    assert_eq!(summary["stats"]["focus_hours"], 1);
}

#[test]
fn test_timer_run_uses_configured_durations() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "timer.short_break", "1"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(
        home.path(),
        &["timer", "run", "--mode", "short", "--tick-ms", "1", "--json"],
    );
    assert_eq!(code, 0, "Timer run failed");

    let lines: Vec<&str> = stdout.lines().collect();
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["type"], "TimerStarted");
    assert_eq!(first["remaining_secs"], 60);
    assert!(stdout.contains("\"PhaseCompleted\""));
    assert_eq!(
        stdout.lines().filter(|l| l.contains("\"type\":\"Tick\"")).count(),
        59
    );
}

#[test]
fn test_timer_rejects_unknown_mode() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["timer", "simulate", "--ticks", "1", "--mode", "nap"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "timer.focus_duration"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "25");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "timer.focus_duration", "50"]);
    assert_eq!(code, 0, "Config set failed");

    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "timer.focus_duration"]);
    assert_eq!(stdout.trim(), "50");
    assert!(home.path().join("config.toml").exists());
}

#[test]
fn test_config_rejects_bad_values() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "timer.nope", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(home.path(), &["config", "set", "timer.long_break_interval", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_notes_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["notes", "add", "Ohm's law", "--subject", "Physics"],
    );
    assert_eq!(code, 0, "Notes add failed");
    let note = parse_json(&stdout);
    let id = note["id"].as_str().unwrap().to_string();

    let (code, stdout, _) = run_cli(home.path(), &["notes", "list", "--subject", "Physics", "--json"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout).as_array().unwrap().len(), 1);

    let (code, _, _) = run_cli(home.path(), &["notes", "remove", &id]);
    assert_eq!(code, 0, "Notes remove failed");

    let (_, stdout, _) = run_cli(home.path(), &["notes", "list", "--json"]);
    assert!(parse_json(&stdout).as_array().unwrap().is_empty());
}

#[test]
fn test_notes_reject_blank_text() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["notes", "add", "   "]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Please write something"));
}

#[test]
fn test_notes_subjects_without_store() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["notes", "subjects"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().next(), Some("All"));
    assert!(stdout.contains("Computer Science"));
    assert!(!home.path().join("studydesk.db").exists());
}

#[test]
fn test_notes_survive_separate_invocations() {
    let home = tempfile::tempdir().unwrap();
    for text in ["first", "second", "third"] {
        let (code, _, _) = run_cli(home.path(), &["notes", "add", text]);
        assert_eq!(code, 0);
    }
    let (_, stdout, _) = run_cli(home.path(), &["notes", "list", "--json"]);
    assert_eq!(parse_json(&stdout).as_array().unwrap().len(), 3);
}

#[test]
fn test_profile_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["profile", "show", "--json"]);
    assert_eq!(code, 0, "Profile show failed");
    let profile = parse_json(&stdout);
    assert_eq!(profile["role"], "Student");
    assert_eq!(profile["bloodGroup"], "AB+");

    let (code, stdout, _) = run_cli(home.path(), &["profile", "set", "rollNumber", "22CT140"]);
    assert_eq!(code, 0, "Profile set failed");
    assert_eq!(parse_json(&stdout)["rollNumber"], "22CT140");

    let (code, _, stderr) = run_cli(home.path(), &["profile", "set", "dob", "yesterday"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    run_cli(home.path(), &["notes", "add", "Ohm's law"]);
    let (code, stdout, _) = run_cli(home.path(), &["profile", "logout"]);
    assert_eq!(code, 0, "Profile logout failed");
    assert!(stdout.contains("Logged out"));

    let (_, stdout, _) = run_cli(home.path(), &["profile", "show", "--json"]);
    assert_eq!(parse_json(&stdout)["rollNumber"], "");
    let (_, stdout, _) = run_cli(home.path(), &["notes", "list", "--json"]);
    assert!(parse_json(&stdout).as_array().unwrap().is_empty());
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("studydesk"));
}

#[test]
fn test_completions_leave_data_dir_untouched() {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("data");
    let output = Command::new(env!("CARGO_BIN_EXE_studydesk"))
        .args(["completions", "zsh"])
        .env("STUDYDESK_HOME", &data)
        .env_remove("STUDYDESK_LOG")
        .output()
        .expect("Failed to execute CLI command");
    assert!(output.status.success());
    assert!(!data.exists());
}
