//! Configuration management for the debug console.
//!
//! Handles loading configuration from a TOML file, with defaults for every
//! field so a missing or partial file still yields a usable console.

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Module identifier the built-in commands register under.
pub const DEFAULT_MODULE_ID: &str = "aarontburn.Debug_Console";

/// Human-readable module name.
pub const DEFAULT_MODULE_NAME: &str = "Debug Console";

/// Host module that answers dev tools and reload requests.
pub const DEFAULT_HOST_MAIN_MODULE: &str = "nexus.Main";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Log viewer configuration.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Identity and storage of this module.
    #[serde(default)]
    pub module: ModuleConfig,

    /// Host runtime configuration.
    #[serde(default)]
    pub host: HostConfig,
}

/// Display toggles for the log viewer. These can change while the console runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Prefix each line with `[HH:MM:SS]`.
    pub show_timestamps: bool,
    /// Prefix each line with `[LEVEL]`.
    pub show_log_levels: bool,
    /// Prefix each line with the emitting module id, when known.
    pub show_module_ids: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            show_log_levels: true,
            show_module_ids: false,
        }
    }
}

/// Log viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    #[serde(default = "default_true")]
    pub show_log_levels: bool,

    #[serde(default)]
    pub show_module_ids: bool,

    /// Maximum number of log lines kept in the viewer.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_messages() -> usize {
    5000
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            show_log_levels: true,
            show_module_ids: false,
            max_messages: default_max_messages(),
        }
    }
}

impl ConsoleConfig {
    /// Returns the display toggles as runtime settings.
    pub fn settings(&self) -> ConsoleSettings {
        ConsoleSettings {
            show_timestamps: self.show_timestamps,
            show_log_levels: self.show_log_levels,
            show_module_ids: self.show_module_ids,
        }
    }
}

/// Identity and storage of this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Reserved source identifier for built-in commands.
    #[serde(default = "default_module_id")]
    pub id: String,

    /// Display name.
    #[serde(default = "default_module_name")]
    pub name: String,

    /// Directory opened by `dir` when no path is given.
    pub storage_dir: Option<PathBuf>,
}

fn default_module_id() -> String {
    DEFAULT_MODULE_ID.to_string()
}

fn default_module_name() -> String {
    DEFAULT_MODULE_NAME.to_string()
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            id: default_module_id(),
            name: default_module_name(),
            storage_dir: None,
        }
    }
}

impl ModuleConfig {
    /// Returns the configured storage directory or the platform data directory.
    pub fn storage_path(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("debug-console")
                .join("storage")
        })
    }
}

/// Host runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Module that receives `open-dev-tools` and `reload` requests.
    #[serde(default = "default_main_module")]
    pub main_module: String,
}

fn default_main_module() -> String {
    DEFAULT_HOST_MAIN_MODULE.to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            main_module: default_main_module(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("debug-console")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::config(format!("Failed to read config file: {e}")))?;

        let config = Self::parse_toml(&content, path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ConsoleError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Checks values serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.console.max_messages == 0 {
            return Err(ConsoleError::config(
                "console.max_messages must be greater than zero",
            ));
        }
        if self.module.id.trim().is_empty() || self.module.id.contains(char::is_whitespace) {
            return Err(ConsoleError::config(format!(
                "module.id '{}' must be a non-empty token without whitespace",
                self.module.id
            )));
        }
        if self.host.main_module.trim().is_empty() {
            return Err(ConsoleError::config("host.main_module must not be empty"));
        }
        Ok(())
    }
}
