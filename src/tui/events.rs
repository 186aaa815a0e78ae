//! Terminal event polling.

use crate::error::{ConsoleError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Viewer input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Nothing happened within the tick rate.
    Tick,
}

impl From<CrosstermEvent> for Event {
    fn from(event: CrosstermEvent) -> Self {
        match event {
            // Release and repeat events are reported on some platforms only.
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Self::Key(key),
            CrosstermEvent::Resize(width, height) => Self::Resize(width, height),
            _ => Self::Tick,
        }
    }
}

/// Polls crossterm for terminal events.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::with_tick_rate(Duration::from_millis(100))
    }

    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Blocks for at most the tick rate waiting for the next event.
    pub fn next(&self) -> Result<Event> {
        let ready = event::poll(self.tick_rate)
            .map_err(|e| ConsoleError::internal(format!("Failed to poll events: {e}")))?;
        if !ready {
            return Ok(Event::Tick);
        }
        let event = event::read()
            .map_err(|e| ConsoleError::internal(format!("Failed to read event: {e}")))?;
        Ok(event.into())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
