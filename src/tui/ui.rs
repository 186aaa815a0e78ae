//! UI rendering for the viewer.
//!
//! Header on top, log panel in the middle, input line at the bottom.

use super::app::App;
use super::widgets::{header, input, log};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, layout[0], app);
    render_log(frame, layout[1], app);
    render_input(frame, layout[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let filter = app.log.filter();
    frame.render_widget(header::Header::new(&app.title, &filter), area);
}

fn render_log(frame: &mut Frame, area: Rect, app: &App) {
    let widget = log::LogPanel::new(&app.log, &app.settings, app.scroll);
    frame.render_widget(widget, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let widget = input::InputBar::new(&app.input.text, app.input.cursor);
    let cursor_x = area.x + widget.cursor_column(area);
    frame.render_widget(widget, area);
    frame.set_cursor_position((cursor_x, area.y + 1));
}
