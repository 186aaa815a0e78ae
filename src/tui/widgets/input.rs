//! Input widget for the viewer.

use crate::log_buffer::INPUT_MARKER;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Width taken by the borders, the prompt and the trailing cursor cell.
pub const CHROME_WIDTH: u16 = 2 + INPUT_MARKER.len() as u16 + 1;

/// Calculates the number of characters to skip so the cursor stays visible.
pub fn calculate_scroll_offset(cursor: usize, available_width: usize) -> usize {
    cursor.saturating_sub(available_width)
}

/// Input bar widget.
pub struct InputBar<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> InputBar<'a> {
    pub fn new(text: &'a str, cursor: usize) -> Self {
        Self { text, cursor }
    }

    /// Column of the terminal cursor relative to the left edge of `area`.
    pub fn cursor_column(&self, area: Rect) -> u16 {
        let available = area.width.saturating_sub(CHROME_WIDTH) as usize;
        let visible = self.cursor - calculate_scroll_offset(self.cursor, available);
        1 + INPUT_MARKER.len() as u16 + visible as u16
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let prompt_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);

        let available = area.width.saturating_sub(CHROME_WIDTH) as usize;
        let skip = calculate_scroll_offset(self.cursor, available);
        let visible: String = self.text.chars().skip(skip).collect();

        let line = Line::from(vec![
            Span::styled(INPUT_MARKER, prompt_style),
            Span::raw(visible),
        ]);

        Paragraph::new(line).block(block).render(area, buf);
    }
}
