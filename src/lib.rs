//! Debug Console: an interactive console with prefix-routed commands.
//!
//! Modules register named commands into a shared [`commands::CommandRegistry`].
//! A command can be invoked by its bare name while that name is unique, or by
//! its `<moduleID>.<name>` form at any time. The library also exposes the
//! console process, the terminal viewer and the headless runner.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod log_buffer;
pub mod logging;
pub mod output;
pub mod process;
pub mod tui;
