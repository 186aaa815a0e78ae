//! Command-line argument parsing.

use crate::config::Config;
use crate::tui::headless::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// An interactive debug console with prefix-routed commands.
#[derive(Parser, Debug)]
#[command(name = "debug-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Module id of the console itself (owner of the built-in commands)
    #[arg(long, value_name = "ID")]
    pub module_id: Option<String>,

    /// Directory opened by `dir` without arguments
    #[arg(long, value_name = "PATH")]
    pub storage_dir: Option<PathBuf>,

    /// Hide the time column
    #[arg(long)]
    pub no_timestamps: bool,

    /// Hide the level column
    #[arg(long)]
    pub no_log_levels: bool,

    /// Show the module id column
    #[arg(long)]
    pub show_module_ids: bool,

    // === Headless mode options ===
    /// Run in headless mode (no terminal UI, for testing/automation)
    #[arg(long)]
    pub headless: bool,

    /// Comma-separated events to execute in headless mode (e.g., "type:help,key:enter")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// Path to script file with events (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Screen size for headless mode (WIDTHxHEIGHT, e.g., "80x24")
    #[arg(long, value_name = "SIZE", default_value = "80x24")]
    pub size: String,

    /// Output format for headless mode (text, json or frames)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write output to file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop on first assertion failure
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the --config path or the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(module_id) = &self.module_id {
            config.module.id = module_id.clone();
        }
        if let Some(storage_dir) = &self.storage_dir {
            config.module.storage_dir = Some(storage_dir.clone());
        }
        if self.no_timestamps {
            config.console.show_timestamps = false;
        }
        if self.no_log_levels {
            config.console.show_log_levels = false;
        }
        if self.show_module_ids {
            config.console.show_module_ids = true;
        }
    }

    /// Parses the screen size from the --size argument.
    pub fn parse_screen_size(&self) -> std::result::Result<(u16, u16), String> {
        let (width, height) = self.size.split_once('x').ok_or_else(|| {
            format!(
                "Invalid size format: '{}'. Expected WIDTHxHEIGHT (e.g., 80x24)",
                self.size
            )
        })?;
        let width = width
            .parse::<u16>()
            .map_err(|_| format!("Invalid width: '{width}'"))?;
        let height = height
            .parse::<u16>()
            .map_err(|_| format!("Invalid height: '{height}'"))?;
        Ok((width, height))
    }

    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Validates headless mode arguments.
    pub fn validate_headless(&self) -> std::result::Result<(), String> {
        if !self.headless {
            return Ok(());
        }
        if self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }
        self.parse_screen_size()?;
        self.parse_output_format()?;
        Ok(())
    }
}
