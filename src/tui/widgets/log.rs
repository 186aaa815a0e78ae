//! Log panel widget.
//!
//! Renders the visible part of the log buffer, newest line at the bottom.

use crate::config::ConsoleSettings;
use crate::log_buffer::{format_line, LogBuffer};
use crate::output::LogLevel;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Color used for a level.
pub fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Input => Style::default().fg(Color::Cyan),
        LogLevel::Log => Style::default(),
        LogLevel::Info => Style::default().fg(Color::Green),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red),
    }
}

/// Computes the first line to show so that `scroll` lines below the view are hidden.
pub fn top_line(total: usize, height: usize, scroll: usize) -> usize {
    let max_top = total.saturating_sub(height);
    max_top.saturating_sub(scroll)
}

/// Log panel widget.
pub struct LogPanel<'a> {
    log: &'a LogBuffer,
    settings: &'a ConsoleSettings,
    scroll: usize,
}

impl<'a> LogPanel<'a> {
    pub fn new(log: &'a LogBuffer, settings: &'a ConsoleSettings, scroll: usize) -> Self {
        Self {
            log,
            settings,
            scroll,
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        self.log
            .visible()
            .flat_map(|message| {
                let style = level_style(message.level);
                let text = format_line(message, self.settings);
                let mut parts: Vec<Line<'static>> = text
                    .lines()
                    .map(|part| Line::from(Span::styled(part.to_string(), style)))
                    .collect();
                if parts.is_empty() {
                    parts.push(Line::default());
                }
                parts
            })
            .collect()
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.scroll > 0 {
            format!(" Console [+{}] ", self.scroll)
        } else {
            " Console ".to_string()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title);

        let lines = self.lines();
        let height = block.inner(area).height as usize;
        let top = top_line(lines.len(), height, self.scroll);

        Paragraph::new(lines)
            .block(block)
            .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}
