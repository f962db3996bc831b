//! Shared test utilities for TUI testing with ratatui TestBackend.
//!
//! Provides helpers for creating test terminals, extracting buffer content,
//! asserting colors, and building message fixtures.

#![cfg(test)]

use crate::chat::message::{ChatMessage, MessageId};
use crate::tui::app::App;
use crate::Status;
use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};

/// Agent used by the fixtures.
pub const TEST_AGENT: &str = "Sarah Johnson";

/// Creates a Terminal with TestBackend at the specified dimensions.
pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("failed to create test terminal")
}

/// Extracts all text from a specific row in the buffer as a single String.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if row >= area.height {
        return String::new();
    }
    (0..area.width)
        .map(|col| {
            buffer
                .cell((col, row))
                .map(|cell| cell.symbol())
                .unwrap_or(" ")
        })
        .collect()
}

/// Checks if a specific row contains the given substring.
pub fn row_contains(buffer: &Buffer, row: u16, text: &str) -> bool {
    row_text(buffer, row).contains(text)
}

/// Finds the first row index that contains the given text, or None if not found.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    (0..buffer.area().height).find(|&row| row_contains(buffer, row, text))
}

/// Asserts that the cell at (col, row) has the specified foreground color.
pub fn assert_fg_color(buffer: &Buffer, col: u16, row: u16, color: Color) {
    let cell = buffer
        .cell((col, row))
        .unwrap_or_else(|| panic!("cell at ({}, {}) does not exist", col, row));
    assert_eq!(
        cell.fg, color,
        "expected fg color {:?} at ({}, {}), got {:?}",
        color, col, row, cell.fg
    );
}

/// Finds the first occurrence of `text` in the specified row and checks
/// if the first character of that text has the specified foreground color.
///
/// Columns are counted in characters, so box-drawing borders earlier in the
/// row do not shift the lookup.
pub fn assert_text_fg_in_row(buffer: &Buffer, row: u16, text: &str, color: Color) {
    let row_string = row_text(buffer, row);
    let byte_idx = row_string
        .find(text)
        .unwrap_or_else(|| panic!("text '{}' not found in row {}: '{}'", text, row, row_string));
    let col = row_string[..byte_idx].chars().count();
    assert_fg_color(buffer, col as u16, row, color);
}

pub fn make_system(id: u64, content: &str) -> ChatMessage {
    ChatMessage::system(MessageId::new(id), content)
}

pub fn make_user(id: u64, content: &str) -> ChatMessage {
    ChatMessage::user(MessageId::new(id), content)
}

pub fn make_agent(id: u64, content: &str) -> ChatMessage {
    ChatMessage::agent(MessageId::new(id), TEST_AGENT, content)
}

/// An App whose agent has already joined.
pub fn connected_app() -> App {
    let mut app = App::new(TEST_AGENT, 3);
    app.status = Status::Connected;
    app.queue_position = 0;
    app
}

/// Renders the full chat to a buffer and returns the buffer for inspection.
pub fn render_chat_to_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal = test_terminal(width, height);
    terminal
        .draw(|frame| crate::tui::ui::render_chat(frame, app))
        .expect("draw failed");
    terminal.backend().buffer().clone()
}

#[test]
fn test_row_text_out_of_bounds_is_empty() {
    let terminal = test_terminal(10, 2);
    assert_eq!(row_text(terminal.backend().buffer(), 5), "");
}

#[test]
fn test_find_row_with_text_locates_header() {
    let mut app = App::new(TEST_AGENT, 3);
    let buffer = render_chat_to_buffer(&mut app, 60, 12);
    assert_eq!(find_row_with_text(&buffer, "Connecting..."), Some(1));
}
