//! Leveled console output.
//!
//! Everything the console shows (command results, diagnostics, viewer
//! signals) travels as a [`ConsoleEvent`] over an unbounded channel. Emitting
//! never blocks, so command handlers can report from synchronous dispatch and
//! from spawned tasks alike.

use crate::config::ConsoleSettings;
use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// Severity of a console line. `Input` marks echoed user input.
///
/// Ordering follows the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Input,
    Log,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// All levels, in filter-bar order.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Input,
        LogLevel::Log,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Lowercase name used in filters and scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Uppercase tag shown in front of a line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Log => "LOG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: LogLevel,
    pub timestamp: NaiveTime,
    pub text: String,
    /// Module that emitted the line, if known.
    pub module_id: Option<String>,
}

impl LogMessage {
    /// Creates a message stamped with the current local time.
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self::at(level, text, Local::now().time())
    }

    /// Creates a message with an explicit timestamp.
    pub fn at(level: LogLevel, text: impl Into<String>, timestamp: NaiveTime) -> Self {
        Self {
            level,
            timestamp,
            text: text.into(),
            module_id: None,
        }
    }

    /// Attaches the emitting module id.
    pub fn with_module(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = Some(module_id.into());
        self
    }

    /// Returns the timestamp as `HH:MM:SS`.
    pub fn time_string(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Signals sent from the console process to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// Append a line.
    Message(LogMessage),
    /// Drop the whole log history.
    Clear,
    /// Display settings changed.
    Settings(ConsoleSettings),
    /// The viewer became visible; focus the input line.
    Focus,
}

/// Cloneable sender for console output.
#[derive(Debug, Clone)]
pub struct ConsoleOutput {
    sender: mpsc::UnboundedSender<ConsoleEvent>,
    module_id: Option<String>,
}

impl ConsoleOutput {
    /// Creates an output handle and the receiver the viewer drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ConsoleEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender,
                module_id: None,
            },
            receiver,
        )
    }

    /// Returns a handle that tags every line with `module_id`.
    pub fn for_module(&self, module_id: impl Into<String>) -> Self {
        Self {
            sender: self.sender.clone(),
            module_id: Some(module_id.into()),
        }
    }

    pub fn log(&self, text: impl Into<String>) {
        self.emit(LogLevel::Log, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.emit(LogLevel::Info, text);
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.emit(LogLevel::Warn, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.emit(LogLevel::Error, text);
    }

    /// Emits a line at the given level.
    pub fn emit(&self, level: LogLevel, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(target: "console", %level, "{}", text);

        let mut message = LogMessage::new(level, text);
        message.module_id = self.module_id.clone();
        self.send(ConsoleEvent::Message(message));
    }

    /// Asks the viewer to clear its history.
    pub fn clear(&self) {
        self.send(ConsoleEvent::Clear);
    }

    /// Pushes new display settings to the viewer.
    pub fn settings(&self, settings: ConsoleSettings) {
        self.send(ConsoleEvent::Settings(settings));
    }

    /// Asks the viewer to focus its input.
    pub fn focus(&self) {
        self.send(ConsoleEvent::Focus);
    }

    fn send(&self, event: ConsoleEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!("Console viewer is gone; dropping output");
        }
    }
}

/// Takes every event currently queued on `receiver` without waiting.
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<ConsoleEvent>) -> Vec<ConsoleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

/// Returns `(level, text)` for the message events in `events`.
pub fn messages(events: &[ConsoleEvent]) -> Vec<(LogLevel, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            ConsoleEvent::Message(m) => Some((m.level, m.text.clone())),
            _ => None,
        })
        .collect()
}
