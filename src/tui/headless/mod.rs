//! Headless mode for scripted runs and automation.
//!
//! Drives the viewer and the console process without a terminal, renders
//! into a ratatui `TestBackend` and reports the screen, the viewer state and
//! assertion results.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser};
pub use output::{HeadlessOutput, OutputFormat, ScreenRenderer};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::host::{HostClient, HostEvent};
use crate::output::{drain, ConsoleEvent, ConsoleOutput};
use crate::process::ConsoleProcess;
use crate::tui::app::{App, AppAction};
use crate::tui::ui;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Settings for one headless run.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    pub output_format: OutputFormat,
    /// Stop at the first failed assertion.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

impl HeadlessConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (width, height) = cli.parse_screen_size().map_err(ConsoleError::config)?;
        let output_format = cli.parse_output_format().map_err(ConsoleError::config)?;

        Ok(Self {
            width,
            height,
            output_format,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        })
    }
}

/// Result of a headless run.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen.
    pub screen: String,
    pub screen_lines: Vec<String>,
    pub events_executed: usize,
    pub duration: Duration,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    /// Failed assertions in DSL form.
    pub failures: Vec<String>,
    pub state: HeadlessState,
    /// Screens captured in frames mode.
    pub frames: Vec<Frame>,
}

/// Snapshot of the viewer state, queried by `assert:state:` and printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessState {
    pub input_text: String,
    /// Lines held by the log buffer.
    pub message_count: usize,
    /// Lines passing the level filter.
    pub visible_count: usize,
    pub scroll: usize,
    pub filter: Vec<String>,
    pub history_count: usize,
    /// Commands in the registry.
    pub command_count: usize,
    pub running: bool,
    pub show_timestamps: bool,
    pub show_log_levels: bool,
    pub show_module_ids: bool,
}

impl HeadlessState {
    fn capture(app: &App, process: &ConsoleProcess) -> Self {
        Self {
            input_text: app.input.text.clone(),
            message_count: app.log.len(),
            visible_count: app.log.visible().count(),
            scroll: app.scroll,
            filter: app
                .log
                .filter()
                .iter()
                .map(|level| level.as_str().to_string())
                .collect(),
            history_count: app.history.len(),
            command_count: process.registry().len(),
            running: app.running,
            show_timestamps: app.settings.show_timestamps,
            show_log_levels: app.settings.show_log_levels,
            show_module_ids: app.settings.show_module_ids,
        }
    }

    /// Returns a field rendered as text. Strings are unquoted.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        match value.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A captured screen.
#[derive(Debug, Clone)]
pub struct Frame {
    /// 0 for the initial screen.
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    pub screen: String,
}

/// Runs scripted events against a console without a terminal.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    process: ConsoleProcess,
    output: mpsc::UnboundedReceiver<ConsoleEvent>,
    events: Vec<Event>,
    frames: Vec<Frame>,
    assertions_passed: usize,
    assertions_failed: usize,
    failures: Vec<String>,
}

impl HeadlessRunner {
    /// Creates a runner with a fresh console built from `console_config`.
    pub fn new(
        config: HeadlessConfig,
        console_config: &Config,
        host: Arc<dyn HostClient>,
    ) -> Result<Self> {
        let terminal = Terminal::new(TestBackend::new(config.width, config.height))
            .map_err(|e| ConsoleError::internal(format!("Failed to create test terminal: {e}")))?;

        let (console_output, output) = ConsoleOutput::channel();
        let mut process = ConsoleProcess::new(console_config, host, console_output)?;
        process.handle_event(HostEvent::Init);

        let mut runner = Self {
            config,
            terminal,
            app: App::new(console_config),
            process,
            output,
            events: Vec::new(),
            frames: Vec::new(),
            assertions_passed: 0,
            assertions_failed: 0,
            failures: Vec::new(),
        };
        runner.pump_output();
        Ok(runner)
    }

    /// Gives access to the console, e.g. to register extra commands before running.
    pub fn process_mut(&mut self) -> &mut ConsoleProcess {
        &mut self.process
    }

    /// Loads comma- or newline-separated events.
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin for `-`.
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ConsoleError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| ConsoleError::internal(format!("Failed to read script file: {e}")))?
        };
        self.load_events(&content)
    }

    /// Runs every loaded event and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let start_time = Instant::now();
        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            let event_str = event.to_string();
            debug!("Headless event: {}", event_str);

            let keep_going = self.execute(&event).await?;
            events_executed += 1;
            self.pump_output();

            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            }
            if !keep_going || !self.app.running {
                break;
            }
        }

        self.draw()?;
        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();

        info!(
            "Headless run finished: {} events, {} assertions failed",
            events_executed, self.assertions_failed
        );

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            failures: self.failures,
            state: HeadlessState::capture(&self.app, &self.process),
            frames: self.frames,
        })
    }

    /// Executes one event. Returns false to stop the run.
    async fn execute(&mut self, event: &Event) -> Result<bool> {
        match event {
            Event::Key(key) => {
                if let AppAction::Submit(line) = self.app.handle_key(*key) {
                    self.process.handle_input(&line);
                }
            }
            Event::Type(text) => self.app.input.insert_str(text),
            Event::Wait(duration) => tokio::time::sleep(*duration).await,
            Event::Resize(width, height) => self
                .terminal
                .resize(Rect::new(0, 0, *width, *height))
                .map_err(|e| ConsoleError::internal(format!("Resize failed: {e}")))?,
            Event::Snapshot(_) => {}
            Event::Assert(assertion) => {
                self.pump_output();
                self.draw()?;
                let screen = self.render_screen();
                let state = HeadlessState::capture(&self.app, &self.process);
                if assertion.check(&screen, &state) {
                    self.assertions_passed += 1;
                } else {
                    self.assertions_failed += 1;
                    self.failures.push(event.to_string());
                    if self.config.fail_fast {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    /// Moves queued console output into the viewer.
    fn pump_output(&mut self) {
        for event in drain(&mut self.output) {
            self.app.apply(event);
        }
    }

    fn draw(&mut self) -> Result<()> {
        let app = &self.app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| ConsoleError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        let screen = self.render_screen();
        self.frames.push(Frame {
            number: self.frames.len(),
            event,
            screen,
        });
        Ok(())
    }
}

/// Runs headless mode from CLI arguments. Returns the process exit code.
pub async fn run_headless(cli: &Cli, console_config: &Config, host: Arc<dyn HostClient>) -> Result<i32> {
    cli.validate_headless().map_err(ConsoleError::config)?;

    let config = HeadlessConfig::from_cli(cli)?;
    let mut runner = HeadlessRunner::new(config.clone(), console_config, host)?;

    if let Some(events) = &cli.events {
        runner.load_events(events)?;
    } else if let Some(script) = &cli.script {
        runner.load_script(script)?;
    }

    let result = runner.run().await?;
    let output = HeadlessOutput::new(config.output_format).format(&result);

    if let Some(path) = &config.output_file {
        std::fs::write(path, &output)
            .map_err(|e| ConsoleError::internal(format!("Failed to write output file: {e}")))?;
    } else {
        print!("{output}");
    }

    Ok(if result.assertions_failed > 0 { 1 } else { 0 })
}
