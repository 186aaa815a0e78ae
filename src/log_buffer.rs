//! Bounded log history shown by the viewer.

use crate::config::ConsoleSettings;
use crate::output::{LogLevel, LogMessage};
use std::collections::{BTreeSet, VecDeque};

/// First line of a fresh console.
pub const START_BANNER: &str = "----- START CONSOLE -----";

/// Hint shown under the banner.
pub const HELP_HINT: &str = "Type '?' or 'help' to see all available commands.";

/// Marker in front of echoed input.
pub const INPUT_MARKER: &str = ">> ";

/// Log lines in arrival order, capped at a fixed capacity.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    messages: VecDeque<LogMessage>,
    capacity: usize,
    /// Levels selected in the filter bar. Empty shows everything.
    filter: BTreeSet<LogLevel>,
}

impl LogBuffer {
    /// Creates a buffer holding the start banner and help hint.
    pub fn new(capacity: usize) -> Self {
        let mut buffer = Self {
            messages: VecDeque::new(),
            capacity: capacity.max(1),
            filter: BTreeSet::new(),
        };
        buffer.push(LogMessage::new(LogLevel::Log, START_BANNER));
        buffer.push(LogMessage::new(LogLevel::Info, HELP_HINT));
        buffer
    }

    /// Appends a line, dropping the oldest when full.
    pub fn push(&mut self, message: LogMessage) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Drops every line, banner included.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Adds `level` to the filter, or removes it if already selected.
    pub fn toggle_filter(&mut self, level: LogLevel) {
        if !self.filter.remove(&level) {
            self.filter.insert(level);
        }
    }

    /// Selected filter levels in filter-bar order.
    pub fn filter(&self) -> Vec<LogLevel> {
        self.filter.iter().copied().collect()
    }

    pub fn is_filtered(&self, level: LogLevel) -> bool {
        self.filter.contains(&level)
    }

    /// Lines passing the current filter, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &LogMessage> + '_ {
        self.messages
            .iter()
            .filter(|m| self.filter.is_empty() || self.is_filtered(m.level))
    }
}

/// Formats a line the way the viewer prints it.
pub fn format_line(message: &LogMessage, settings: &ConsoleSettings) -> String {
    let mut line = String::new();
    if settings.show_timestamps {
        line.push_str(&format!("[{}] ", message.time_string()));
    }
    if settings.show_module_ids {
        if let Some(module_id) = &message.module_id {
            line.push_str(&format!("[{module_id}] "));
        }
    }
    if settings.show_log_levels {
        line.push_str(&format!("[{}] ", message.level.label()));
    }
    if message.level == LogLevel::Input {
        line.push_str(INPUT_MARKER);
    }
    line.push_str(&message.text);
    line
}
