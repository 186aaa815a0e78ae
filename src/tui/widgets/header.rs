//! Header widget for the viewer.
//!
//! Shows the module name, the level filter toggles and the clear shortcut.

use crate::output::LogLevel;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

const CLEAR_HINT: &str = " ^L clear ";

/// Header bar widget.
pub struct Header<'a> {
    title: &'a str,
    filter: &'a [LogLevel],
}

impl<'a> Header<'a> {
    /// `filter` is the set of selected levels; empty means none highlighted.
    pub fn new(title: &'a str, filter: &'a [LogLevel]) -> Self {
        Self { title, filter }
    }

    /// Label drawn for the toggle of `level`, e.g. `F4 WARN`.
    pub fn toggle_label(index: usize, level: LogLevel) -> String {
        format!(" F{} {} ", index + 1, level.label())
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left = Span::styled(format!(" {} ", self.title), style);
        let mut x = area.x;
        let (end, _) = buf.set_span(x, area.y, &left, area.width);
        x = end;

        for (index, level) in LogLevel::ALL.iter().enumerate() {
            let label = Self::toggle_label(index, *level);
            let toggle_style = if self.filter.contains(level) {
                Style::default().bg(Color::Yellow).fg(Color::Black)
            } else {
                Style::default().bg(Color::Blue).fg(Color::Gray)
            };
            let remaining = area.right().saturating_sub(x);
            if remaining == 0 {
                return;
            }
            let (end, _) = buf.set_span(x, area.y, &Span::styled(label, toggle_style), remaining);
            x = end;
        }

        let hint_width = CLEAR_HINT.len() as u16;
        if x + hint_width <= area.right() {
            buf.set_string(area.right() - hint_width, area.y, CLEAR_HINT, style);
        }
    }
}
