//! Output formats for headless runs: text, JSON and frames.

use super::{HeadlessResult, HeadlessState};
use ratatui::buffer::Buffer;
use serde::Serialize;
use std::str::FromStr;

/// Output format for headless mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Final screen as plain text.
    #[default]
    Text,
    /// Screen, state and assertion counts as JSON.
    Json,
    /// One screen per executed event.
    Frames,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "frames" => Ok(Self::Frames),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text, json, or frames"
            )),
        }
    }
}

/// Renders a ratatui buffer to text.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Returns the buffer rows with trailing spaces and trailing blank rows removed.
    pub fn render(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut lines: Vec<String> = (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        format!("{}\n", lines.join("\n"))
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    screen: &'a str,
    screen_lines: &'a [String],
    events_executed: usize,
    duration_ms: u64,
    assertions: AssertionSummary<'a>,
    state: &'a HeadlessState,
}

#[derive(Debug, Serialize)]
struct AssertionSummary<'a> {
    passed: usize,
    failed: usize,
    failures: &'a [String],
}

/// Formats headless results.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, result: &HeadlessResult) -> String {
        match self.format {
            OutputFormat::Text => Self::format_text(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Frames => Self::format_frames(result),
        }
    }

    fn assertion_lines(result: &HeadlessResult) -> String {
        if result.assertions_passed == 0 && result.assertions_failed == 0 {
            return String::new();
        }
        let mut text = format!(
            "Assertions: {} passed, {} failed\n",
            result.assertions_passed, result.assertions_failed
        );
        for failure in &result.failures {
            text.push_str(&format!("  FAILED {failure}\n"));
        }
        text
    }

    fn format_text(result: &HeadlessResult) -> String {
        format!(
            "{}\nEvents: {} executed in {}ms\n{}",
            result.screen,
            result.events_executed,
            result.duration.as_millis(),
            Self::assertion_lines(result)
        )
    }

    fn format_json(result: &HeadlessResult) -> String {
        let output = JsonOutput {
            screen: &result.screen,
            screen_lines: &result.screen_lines,
            events_executed: result.events_executed,
            duration_ms: u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
            assertions: AssertionSummary {
                passed: result.assertions_passed,
                failed: result.assertions_failed,
                failures: &result.failures,
            },
            state: &result.state,
        };

        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    fn format_frames(result: &HeadlessResult) -> String {
        let frames: String = result
            .frames
            .iter()
            .map(|frame| {
                format!(
                    "=== FRAME {} ({}) ===\n{}\n",
                    frame.number,
                    frame.event.as_deref().unwrap_or("initial"),
                    frame.screen
                )
            })
            .collect();

        format!(
            "{}Total: {} frames, {} events executed in {}ms\n{}",
            frames,
            result.frames.len(),
            result.events_executed,
            result.duration.as_millis(),
            Self::assertion_lines(result)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::headless::Frame;
    use ratatui::layout::Rect;
    use ratatui::style::Style;
    use std::time::Duration;

    fn make_result() -> HeadlessResult {
        HeadlessResult {
            screen: "[INFO] hello\n".to_string(),
            screen_lines: vec!["[INFO] hello".to_string()],
            events_executed: 3,
            duration: Duration::from_millis(150),
            assertions_passed: 1,
            assertions_failed: 1,
            failures: vec!["assert:contains:bye".to_string()],
            state: HeadlessState {
                input_text: "he".to_string(),
                message_count: 4,
                visible_count: 4,
                scroll: 0,
                filter: vec!["warn".to_string()],
                history_count: 1,
                command_count: 7,
                running: true,
                show_timestamps: false,
                show_log_levels: true,
                show_module_ids: false,
            },
            frames: vec![
                Frame {
                    number: 0,
                    event: None,
                    screen: "Initial\n".to_string(),
                },
                Frame {
                    number: 1,
                    event: Some("type:he".to_string()),
                    screen: "Typed\n".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_trims_trailing_space() {
        let area = Rect::new(0, 0, 10, 4);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "top", Style::default());
        buffer.set_string(2, 1, "x", Style::default());

        assert_eq!(ScreenRenderer::render(&buffer), "top\n  x\n");
    }

    #[test]
    fn test_text_output() {
        let text = HeadlessOutput::new(OutputFormat::Text).format(&make_result());

        assert!(text.starts_with("[INFO] hello\n"));
        assert!(text.contains("Events: 3 executed in 150ms"));
        assert!(text.contains("Assertions: 1 passed, 1 failed"));
        assert!(text.contains("  FAILED assert:contains:bye"));
    }

    #[test]
    fn test_json_output() {
        let json = HeadlessOutput::new(OutputFormat::Json).format(&make_result());
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["events_executed"], 3);
        assert_eq!(parsed["state"]["input_text"], "he");
        assert_eq!(parsed["state"]["filter"][0], "warn");
        assert_eq!(parsed["assertions"]["failed"], 1);
        assert_eq!(parsed["assertions"]["failures"][0], "assert:contains:bye");
    }

    #[test]
    fn test_frames_output() {
        let frames = HeadlessOutput::new(OutputFormat::Frames).format(&make_result());

        assert!(frames.contains("=== FRAME 0 (initial) ===\nInitial\n"));
        assert!(frames.contains("=== FRAME 1 (type:he) ==="));
        assert!(frames.contains("Total: 2 frames, 3 events executed"));
    }
}
