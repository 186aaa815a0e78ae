//! Application state for the console viewer.
//!
//! Holds the log buffer, input line and history, and maps key presses to
//! state changes. Submitting a line is reported back to the caller as an
//! [`AppAction`]; the viewer itself never dispatches commands.

use super::history::InputHistory;
use crate::config::{Config, ConsoleSettings};
use crate::log_buffer::LogBuffer;
use crate::output::{ConsoleEvent, LogLevel, LogMessage};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Lines moved by PageUp/PageDown.
pub const PAGE_SCROLL: usize = 10;

/// Input state for text editing.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte offset of the character at `index`.
    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor);
        self.text.insert(offset, c);
        self.cursor += 1;
    }

    /// Inserts a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert(c);
        }
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset(self.cursor);
            self.text.remove(offset);
        }
    }

    /// Deletes the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let offset = self.byte_offset(self.cursor);
            self.text.remove(offset);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Replaces the whole line and moves the cursor to its end.
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.move_end();
    }

    /// Clears the input and returns the previous text.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    None,
    /// Send this line to the console process.
    Submit(String),
    Quit,
}

/// Main viewer state.
pub struct App {
    /// Whether the viewer is still running.
    pub running: bool,
    pub input: InputState,
    pub history: InputHistory,
    pub log: LogBuffer,
    pub settings: ConsoleSettings,
    /// Log scroll offset in lines from the bottom.
    pub scroll: usize,
    /// Module name shown in the header.
    pub title: String,
}

impl App {
    /// Creates the viewer state for `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            running: true,
            input: InputState::new(),
            history: InputHistory::new(),
            log: LogBuffer::new(config.console.max_messages),
            settings: config.console.settings(),
            scroll: 0,
            title: config.module.name.clone(),
        }
    }

    /// Applies an event from the console process.
    pub fn apply(&mut self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::Message(message) => self.push(message),
            ConsoleEvent::Clear => self.clear_log(),
            ConsoleEvent::Settings(settings) => self.settings = settings,
            // The input line always has focus.
            ConsoleEvent::Focus => {}
        }
    }

    /// Appends a line and jumps back to the bottom.
    pub fn push(&mut self, message: LogMessage) {
        self.log.push(message);
        self.scroll = 0;
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.scroll = 0;
    }

    /// Number of rendered lines in the visible log.
    pub fn total_log_lines(&self) -> usize {
        self.log
            .visible()
            .map(|m| m.text.lines().count().max(1))
            .sum()
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.total_log_lines());
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Takes the input line, echoes it into the log and records it.
    ///
    /// Empty lines are submitted too.
    pub fn submit_input(&mut self) -> String {
        let line = self.input.take();
        self.history.record(&line);
        self.push(LogMessage::new(LogLevel::Input, line.as_str()));
        line
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                return AppAction::Quit;
            }
            KeyCode::Char('l') if ctrl => self.clear_log(),
            KeyCode::Char('a') if ctrl => self.input.move_home(),
            KeyCode::Char('e') if ctrl => self.input.move_end(),
            KeyCode::Char('u') if ctrl => {
                self.input.take();
            }
            KeyCode::Enter => return AppAction::Submit(self.submit_input()),
            KeyCode::F(n @ 1..=5) => {
                let level = LogLevel::ALL[usize::from(n) - 1];
                self.log.toggle_filter(level);
                self.scroll = 0;
            }
            KeyCode::Up => {
                if let Some(line) = self.history.older(&self.input.text) {
                    let line = line.to_string();
                    self.input.set(&line);
                }
            }
            KeyCode::Down => {
                if let Some(line) = self.history.newer() {
                    let line = line.to_string();
                    self.input.set(&line);
                }
            }
            KeyCode::PageUp => self.scroll_up(PAGE_SCROLL),
            KeyCode::PageDown => self.scroll_down(PAGE_SCROLL),
            KeyCode::Home => self.scroll = self.total_log_lines(),
            KeyCode::End => self.scroll = 0,
            KeyCode::Esc => {
                self.input.take();
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Char(c) if !ctrl => self.input.insert(c),
            _ => {}
        }
        AppAction::None
    }
}
