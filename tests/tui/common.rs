//! Common test utilities for headless binary runs.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Output of one binary run.
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs the console binary with `args` against `config_dir`.
///
/// The config file inside `config_dir` is used if present; defaults apply otherwise.
pub fn run_with_config(config_dir: &Path, args: &[&str]) -> RunOutput {
    let config_path = config_dir.join("config.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_debug-console"))
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute debug-console");

    RunOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Runs headless with default settings, timestamps hidden.
pub fn run_headless(events: &str, extra: &[&str]) -> RunOutput {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut args = vec!["--headless", "--no-timestamps", "--events", events];
    args.extend_from_slice(extra);
    run_with_config(dir.path(), &args)
}
