//! Event DSL for headless runs.
//!
//! Parses strings like `type:help`, `key:enter`, `wait:100ms` or
//! `assert:contains:Module` into [`Event`]s.

use super::HeadlessState;
use crate::error::{ConsoleError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;
use std::fmt;
use std::time::Duration;

/// A check against the rendered screen or the viewer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen contains text (case-sensitive).
    ContainsExact(String),
    /// Screen does not contain text (case-insensitive).
    NotContains(String),
    /// Screen matches a regex.
    Matches(String),
    /// State field equals value.
    StateEquals { field: String, value: String },
    /// Numeric state comparison (`>=`, `<=`, `>`, `<`).
    StateCompare {
        field: String,
        op: String,
        value: String,
    },
}

impl Assertion {
    pub fn check(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text.as_str()),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => Regex::new(pattern)
                .map(|re| re.is_match(screen))
                .unwrap_or(false),
            Self::StateEquals { field, value } => {
                state.field(field).as_deref() == Some(value.as_str())
            }
            Self::StateCompare { field, op, value } => {
                compare_values(state.field(field).as_deref(), op, value)
            }
        }
    }
}

fn compare_values(actual: Option<&str>, op: &str, expected: &str) -> bool {
    let actual = actual.and_then(|a| a.parse::<i64>().ok());
    let (Some(actual), Ok(expected)) = (actual, expected.parse::<i64>()) else {
        return false;
    };
    match op {
        ">=" => actual >= expected,
        "<=" => actual <= expected,
        ">" => actual > expected,
        "<" => actual < expected,
        _ => false,
    }
}

/// A scripted headless event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Typed text, inserted into the input line.
    Type(String),
    Wait(Duration),
    Resize(u16, u16),
    /// Named marker; recorded as a frame.
    Snapshot(String),
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                let mut parts = Vec::new();
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    parts.push("ctrl".to_string());
                }
                if key.modifiers.contains(KeyModifiers::ALT) {
                    parts.push("alt".to_string());
                }
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    parts.push("shift".to_string());
                }
                parts.push(key_code_name(&key.code));
                write!(f, "key:{}", parts.join("+"))
            }
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Snapshot(name) => write!(f, "snapshot:{name}"),
            Self::Assert(a) => match a {
                Assertion::Contains(t) => write!(f, "assert:contains:{t}"),
                Assertion::ContainsExact(t) => write!(f, "assert:contains-exact:{t}"),
                Assertion::NotContains(t) => write!(f, "assert:not-contains:{t}"),
                Assertion::Matches(p) => write!(f, "assert:matches:{p}"),
                Assertion::StateEquals { field, value } => {
                    write!(f, "assert:state:{field}={value}")
                }
                Assertion::StateCompare { field, op, value } => {
                    write!(f, "assert:state:{field}{op}{value}")
                }
            },
        }
    }
}

fn key_code_name(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("f{n}"),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        _ => "unknown".to_string(),
    }
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses comma- or newline-separated events. Lines starting with `#` are skipped.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| self.parse_one(part))
            .collect()
    }

    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();
        let (event_type, value) = input.split_once(':').ok_or_else(|| {
            ConsoleError::config(format!(
                "Invalid event syntax: '{input}'. Expected format: type:value"
            ))
        })?;

        match event_type.trim().to_lowercase().as_str() {
            "key" => self.parse_key(value.trim()),
            // Leading spaces are part of typed text.
            "type" => Ok(Event::Type(value.to_string())),
            "wait" => self.parse_wait(value.trim()),
            "resize" => self.parse_resize(value.trim()),
            "snapshot" => Ok(Event::Snapshot(value.trim().to_string())),
            "assert" => self.parse_assert(value.trim()),
            other => Err(ConsoleError::config(format!(
                "Unknown event type: '{other}'. Valid types: key, type, wait, resize, snapshot, assert"
            ))),
        }
    }

    /// Parses keys like `enter`, `ctrl+l` or `f4`.
    fn parse_key(&self, value: &str) -> Result<Event> {
        let mut parts: Vec<&str> = value.split('+').collect();
        let key = parts.pop().unwrap_or_default();

        let mut modifiers = KeyModifiers::empty();
        for part in parts {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => {
                    return Err(ConsoleError::config(format!(
                        "Unknown modifier: '{part}'. Valid modifiers: ctrl, alt, shift"
                    )))
                }
            };
        }

        Ok(Event::Key(KeyEvent::new(self.parse_key_code(key)?, modifiers)))
    }

    fn parse_key_code(&self, s: &str) -> Result<KeyCode> {
        let lower = s.to_lowercase();

        if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(KeyCode::F(n));
            }
        }

        let code = match lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        return Err(ConsoleError::config(format!(
                            "Unknown key: '{s}'. Use single characters or named keys like enter, esc, f1"
                        )))
                    }
                }
            }
        };
        Ok(code)
    }

    /// Parses `100ms`, `2s` or a bare number of milliseconds.
    fn parse_wait(&self, value: &str) -> Result<Event> {
        let lower = value.to_lowercase();
        let invalid = || ConsoleError::config(format!("Invalid duration: '{value}'"));

        let duration = if let Some(ms) = lower.strip_suffix("ms") {
            Duration::from_millis(ms.trim().parse().map_err(|_| invalid())?)
        } else if let Some(secs) = lower.strip_suffix('s') {
            Duration::from_secs(secs.trim().parse().map_err(|_| invalid())?)
        } else {
            Duration::from_millis(lower.parse().map_err(|_| invalid())?)
        };
        Ok(Event::Wait(duration))
    }

    /// Parses `WIDTHxHEIGHT`.
    fn parse_resize(&self, value: &str) -> Result<Event> {
        let (width, height) = value.split_once('x').ok_or_else(|| {
            ConsoleError::config(format!(
                "Invalid resize format: '{value}'. Expected WIDTHxHEIGHT"
            ))
        })?;
        let width = width
            .parse()
            .map_err(|_| ConsoleError::config(format!("Invalid width: '{width}'")))?;
        let height = height
            .parse()
            .map_err(|_| ConsoleError::config(format!("Invalid height: '{height}'")))?;
        Ok(Event::Resize(width, height))
    }

    fn parse_assert(&self, value: &str) -> Result<Event> {
        let (kind, rest) = value.split_once(':').ok_or_else(|| {
            ConsoleError::config(format!(
                "Invalid assertion syntax: '{value}'. Expected assert:type:value"
            ))
        })?;
        let rest = rest.trim().to_string();

        let assertion = match kind.trim().to_lowercase().as_str() {
            "contains" => Assertion::Contains(rest),
            "contains-exact" => Assertion::ContainsExact(rest),
            "not-contains" => Assertion::NotContains(rest),
            "matches" => {
                Regex::new(&rest)
                    .map_err(|e| ConsoleError::config(format!("Invalid pattern '{rest}': {e}")))?;
                Assertion::Matches(rest)
            }
            "state" => self.parse_state_assertion(&rest)?,
            other => {
                return Err(ConsoleError::config(format!(
                    "Unknown assertion type: '{other}'. Valid types: contains, contains-exact, not-contains, matches, state"
                )))
            }
        };
        Ok(Event::Assert(assertion))
    }

    /// Parses `field=value` or `field>=number`.
    fn parse_state_assertion(&self, value: &str) -> Result<Assertion> {
        for op in [">=", "<=", ">", "<", "="] {
            if let Some((field, expected)) = value.split_once(op) {
                let field = field.trim().to_string();
                let expected = expected.trim().to_string();
                return Ok(if op == "=" {
                    Assertion::StateEquals {
                        field,
                        value: expected,
                    }
                } else {
                    Assertion::StateCompare {
                        field,
                        op: op.to_string(),
                        value: expected,
                    }
                });
            }
        }
        Err(ConsoleError::config(format!(
            "Invalid state assertion: '{value}'. Expected field=value or field>=value"
        )))
    }
}
