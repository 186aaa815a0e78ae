//! Integration tests for headless mode.

use super::common::{run_headless, run_with_config};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_headless_basic_execution() {
    let out = run_headless("key:esc", &[]);

    assert_eq!(out.code, 0, "stderr: {}", out.stderr);
    assert!(out.stdout.contains("----- START CONSOLE -----"));
    assert!(out.stdout.contains("Events: 1 executed"));
}

#[test]
fn test_headless_help_overview() {
    let out = run_headless(
        "type:help,key:enter,assert:contains:aarontburn.Debug_Console:",
        &["--size", "120x60"],
    );

    assert_eq!(out.code, 0, "stdout: {}", out.stdout);
    assert!(out.stdout.contains("'clear': Clears the console. Not reversible."));
    assert!(out
        .stdout
        .contains("You can access all commands as '<moduleID>.<command>'"));
}

#[test]
fn test_headless_unknown_command() {
    let out = run_headless(
        "type:frobnicate,key:enter,assert:contains:'frobnicate' is not recognized as a command.",
        &[],
    );

    assert_eq!(out.code, 0, "stdout: {}", out.stdout);
    assert!(out.stdout.contains("[ERROR]"));
}

#[test]
fn test_headless_assertion_failure_sets_exit_code() {
    let out = run_headless(
        "type:hello,assert:contains:goodbye",
        &["--output", "json"],
    );

    assert_eq!(out.code, 1);
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(parsed["assertions"]["passed"], 0);
    assert_eq!(parsed["assertions"]["failed"], 1);
    assert_eq!(parsed["state"]["input_text"], "hello");
}

#[test]
fn test_headless_json_state_after_clear() {
    let out = run_headless("type:clear,key:enter", &["--output", "json"]);

    assert_eq!(out.code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(parsed["state"]["message_count"], 0);
    assert_eq!(parsed["state"]["history_count"], 1);
    assert_eq!(parsed["state"]["command_count"], 7);
}

#[test]
fn test_headless_frames_output() {
    let out = run_headless("type:ar,type:gv", &["--output", "frames"]);

    assert_eq!(out.code, 0);
    assert!(out.stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(out.stdout.contains("=== FRAME 2 (type:gv) ==="));
    assert!(out.stdout.contains(">> argv"));
}

#[test]
fn test_headless_reads_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        r#"
[console]
show_timestamps = false
show_module_ids = true

[module]
id = "acme.Console"
name = "Acme Console"
"#,
    )
    .unwrap();

    let out = run_with_config(
        dir.path(),
        &[
            "--headless",
            "--size",
            "120x40",
            "--events",
            "type:help acme.Console,key:enter",
        ],
    );

    assert_eq!(out.code, 0, "stderr: {}", out.stderr);
    assert!(out.stdout.contains(" Acme Console "));
    assert!(out
        .stdout
        .contains("[acme.Console] [INFO]"));
    assert!(out
        .stdout
        .contains("Module 'acme.Console' has the following commands:"));
}

#[test]
fn test_headless_requires_events() {
    let dir = TempDir::new().unwrap();
    let out = run_with_config(dir.path(), &["--headless"]);

    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("--headless requires --events or --script"));
}

#[test]
fn test_headless_invalid_event() {
    let out = run_headless("jump:high", &[]);

    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("Unknown event type: 'jump'"));
}
