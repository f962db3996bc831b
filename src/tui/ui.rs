//! Rendering for the terminal chat.
//!
//! Provides [`render_chat`], which composes the header, transcript,
//! quick-action row, input line and footer.

use crate::chat::message::{ChatMessage, Sender};
use crate::chat::settings::name_initial;
use crate::tui::app::{App, QUICK_ACTIONS};
use crate::Status;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Title shown on the header border.
const HEADER_TITLE: &str = " CloudTech Support ";

/// Footer text showing available keybindings.
const FOOTER_TEXT: &str = "[Enter] Send  [F1-F3] Quick actions  [↑/↓] Scroll  [Esc] Close chat";

/// Indent of agent message bodies, past the avatar.
const AGENT_INDENT: &str = "    ";

/// Renders the full chat layout.
///
/// Clamps `app.scroll_offset` to the transcript height, so scrolling past
/// the first message stops there.
pub fn render_chat(frame: &mut Frame, app: &mut App) {
    let connected = app.status == Status::Connected;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                             // header
            Constraint::Min(3),                                // transcript
            Constraint::Length(if connected { 1 } else { 0 }), // quick actions
            Constraint::Length(3),                             // input
            Constraint::Length(1),                             // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_transcript(frame, app, chunks[1]);
    if connected {
        frame.render_widget(Paragraph::new(quick_actions_line()), chunks[2]);
    }
    render_input(frame, app, chunks[3]);
    frame.render_widget(Paragraph::new(footer_line(app)), chunks[4]);
}

/// Color of the status dot in the header.
pub fn status_color(status: Status) -> Color {
    match status {
        Status::Connecting => Color::Gray,
        Status::Waiting => Color::Yellow,
        Status::Connected => Color::Green,
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            HEADER_TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let line = Line::from(vec![
        Span::styled("● ", Style::default().fg(status_color(app.status))),
        Span::raw(app.header_text()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_transcript(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let height = inner.height as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in &app.messages {
        lines.extend(message_lines(message, width));
        lines.push(Line::raw(""));
    }
    if app.pending_replies > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} is typing...", app.agent_name),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let max_offset = lines.len().saturating_sub(height);
    app.scroll_offset = app.scroll_offset.min(max_offset);
    let start = max_offset - app.scroll_offset;
    let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

/// Lines for one message at the given transcript width.
pub fn message_lines(message: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let time = message.display_time();
    match message.sender() {
        Sender::System => wrap_text(message.content(), width)
            .into_iter()
            .map(|text| {
                Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
                    .alignment(Alignment::Center)
            })
            .collect(),
        Sender::Agent => {
            let name = message.agent_name().unwrap_or("Agent").to_string();
            let avatar = format!(" {} ", name_initial(&name));
            let mut lines = vec![Line::from(vec![
                Span::styled(avatar, Style::default().fg(Color::Black).bg(Color::Green)),
                Span::raw(" "),
                Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", time), Style::default().fg(Color::DarkGray)),
            ])];
            let body_width = width.saturating_sub(AGENT_INDENT.len());
            lines.extend(
                wrap_text(message.content(), body_width)
                    .into_iter()
                    .map(|text| Line::raw(format!("{}{}", AGENT_INDENT, text))),
            );
            lines
        }
        Sender::User => {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    "You",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", time), Style::default().fg(Color::DarkGray)),
            ])
            .alignment(Alignment::Right)];
            lines.extend(wrap_text(message.content(), width).into_iter().map(|text| {
                Line::from(Span::styled(text, Style::default().fg(Color::Cyan)))
                    .alignment(Alignment::Right)
            }));
            lines
        }
    }
}

fn quick_actions_line() -> Line<'static> {
    let mut spans = Vec::new();
    for (i, label) in QUICK_ACTIONS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("F{}", i + 1),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw(format!(" {}", label)));
    }
    Line::from(spans)
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let line = if app.input.is_empty() {
        Line::from(Span::styled(
            app.placeholder(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::raw(app.input.clone())
    };
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(line).block(block), area);

    if app.can_type() && inner.width > 0 && inner.height > 0 {
        let typed = u16::try_from(app.input.width()).unwrap_or(u16::MAX);
        let x = inner.x + typed.min(inner.width - 1);
        frame.set_cursor_position((x, inner.y));
    }
}

fn footer_line(app: &App) -> Line<'static> {
    match &app.status_message {
        Some((msg, expiry)) if Instant::now() < *expiry => Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Yellow),
        )),
        _ => Line::from(Span::styled(FOOTER_TEXT, Style::default().fg(Color::DarkGray))),
    }
}

/// Splits `text` into lines of at most `width` terminal columns, breaking at
/// spaces where possible. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;
        for word in paragraph.split_whitespace() {
            let mut word_width = word.width();
            let mut word = word.to_string();
            // Break overlong words onto their own lines
            if word_width > width {
                if current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                let mut piece = String::new();
                let mut piece_width = 0;
                for c in word.chars() {
                    let w = c.width().unwrap_or(0);
                    if piece_width + w > width && piece_width > 0 {
                        lines.push(std::mem::take(&mut piece));
                        piece_width = 0;
                    }
                    piece.push(c);
                    piece_width += w;
                }
                word = piece;
                word_width = piece_width;
            }
            if current_width > 0 && current_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&word);
            current_width += word_width;
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::MessageId;
    use crate::tui::test_utils::*;

    // -- wrap_text ----------------------------------------------------------

    #[test]
    fn test_wrap_text_short_line_unchanged() {
        assert_eq!(wrap_text("hello there", 20), vec!["hello there"]);
    }

    #[test]
    fn test_wrap_text_breaks_at_spaces() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_text_keeps_explicit_newlines() {
        assert_eq!(wrap_text("one\ntwo", 20), vec!["one", "two"]);
    }

    #[test]
    fn test_wrap_text_empty_input_gives_one_empty_line() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_text_zero_width_returns_input() {
        assert_eq!(wrap_text("abc", 0), vec!["abc"]);
    }

    #[test]
    fn test_wrap_text_counts_wide_chars_as_two_columns() {
        let lines = wrap_text("你好世界", 4);
        assert_eq!(lines, vec!["你好", "世界"]);
        assert!(lines.iter().all(|line| line.width() <= 4));
    }

    #[test]
    fn test_wrap_text_breaks_mixed_width_words() {
        let lines = wrap_text("hi 日本語 ok", 7);
        assert_eq!(lines, vec!["hi", "日本語", "ok"]);
        assert!(lines.iter().all(|line| line.width() <= 7));
    }

    #[test]
    fn test_wrap_text_wide_char_never_straddles_the_edge() {
        let lines = wrap_text("ab表c", 3);
        assert_eq!(lines, vec!["ab", "表c"]);
    }

    // -- message_lines ------------------------------------------------------

    #[test]
    fn test_agent_message_has_header_and_indented_body() {
        let message = ChatMessage::agent(MessageId::new(1), "Sarah Johnson", "Hi there");
        let lines = message_lines(&message, 40);
        assert_eq!(lines.len(), 2);
        let header: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(header.starts_with(" S  Sarah Johnson"), "header: {header}");
        let body: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(body, "    Hi there");
    }

    #[test]
    fn test_user_message_is_right_aligned() {
        let message = ChatMessage::user(MessageId::new(1), "Hello");
        let lines = message_lines(&message, 40);
        assert!(lines
            .iter()
            .all(|line| line.alignment == Some(Alignment::Right)));
    }

    #[test]
    fn test_system_message_is_centered() {
        let message = ChatMessage::system(MessageId::new(1), "You are now #2 in queue.");
        let lines = message_lines(&message, 40);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].alignment, Some(Alignment::Center));
    }

    // -- render_chat --------------------------------------------------------

    #[test]
    fn test_render_connecting_shows_header_and_placeholder() {
        let mut app = App::new("Sarah Johnson", 3);
        let buffer = render_chat_to_buffer(&mut app, 80, 20);

        assert!(find_row_with_text(&buffer, "CloudTech Support").is_some());
        let row = find_row_with_text(&buffer, "Connecting...").expect("header status");
        assert_text_fg_in_row(&buffer, row, "●", Color::Gray);
        assert!(find_row_with_text(&buffer, "Connecting to support...").is_some());
        assert!(find_row_with_text(&buffer, "F1 Reset Password").is_none());
    }

    #[test]
    fn test_render_waiting_shows_queue_position() {
        let mut app = App::new("Sarah Johnson", 3);
        app.status = Status::Waiting;
        app.queue_position = 2;
        let buffer = render_chat_to_buffer(&mut app, 80, 20);

        let row = find_row_with_text(&buffer, "Position in queue: #2").expect("header status");
        assert_text_fg_in_row(&buffer, row, "●", Color::Yellow);
        assert!(find_row_with_text(&buffer, "Please wait to be connected...").is_some());
    }

    #[test]
    fn test_render_connected_shows_quick_actions() {
        let mut app = connected_app();
        let buffer = render_chat_to_buffer(&mut app, 80, 20);

        let row = find_row_with_text(&buffer, "Connected to Sarah Johnson").expect("header");
        assert_text_fg_in_row(&buffer, row, "●", Color::Green);
        let row = find_row_with_text(&buffer, "F1 Reset Password").expect("quick actions");
        assert!(row_contains(&buffer, row, "F3 Technical Issue"));
        assert_text_fg_in_row(&buffer, row, "F2", Color::Yellow);
        assert!(find_row_with_text(&buffer, "Type your message...").is_some());
    }

    #[test]
    fn test_render_shows_messages() {
        let mut app = connected_app();
        app.messages = vec![
            make_system(1, "Sarah Johnson has joined the chat."),
            make_agent(2, "Hi! I'm Sarah."),
            make_user(3, "Hello"),
        ];
        let buffer = render_chat_to_buffer(&mut app, 80, 24);

        let row = find_row_with_text(&buffer, "has joined the chat.").expect("system");
        assert_text_fg_in_row(&buffer, row, "Sarah Johnson has", Color::DarkGray);
        assert!(find_row_with_text(&buffer, "Hi! I'm Sarah.").is_some());
        let row = find_row_with_text(&buffer, "Hello").expect("user message");
        // Right-aligned inside the bordered transcript
        assert!(row_text(&buffer, row).trim_end().ends_with("Hello│"));
    }

    #[test]
    fn test_render_typing_indicator_only_while_pending() {
        let mut app = connected_app();
        let buffer = render_chat_to_buffer(&mut app, 80, 20);
        assert!(find_row_with_text(&buffer, "is typing...").is_none());

        app.pending_replies = 1;
        let buffer = render_chat_to_buffer(&mut app, 80, 20);
        assert!(find_row_with_text(&buffer, "Sarah Johnson is typing...").is_some());
    }

    #[test]
    fn test_cursor_follows_display_width_of_input() {
        let mut app = connected_app();
        app.input = "你好".to_string();
        let mut terminal = test_terminal(80, 20);
        terminal
            .draw(|frame| render_chat(frame, &mut app))
            .expect("draw failed");
        let cursor = terminal.get_cursor_position().expect("cursor");
        // Left border plus two double-width characters
        assert_eq!(cursor.x, 1 + 4);
    }

    #[test]
    fn test_render_input_text_replaces_placeholder() {
        let mut app = connected_app();
        app.input = "my printer".to_string();
        let buffer = render_chat_to_buffer(&mut app, 80, 20);
        assert!(find_row_with_text(&buffer, "my printer").is_some());
        assert!(find_row_with_text(&buffer, "Type your message...").is_none());
    }

    #[test]
    fn test_render_footer_shows_status_message() {
        let mut app = connected_app();
        let buffer = render_chat_to_buffer(&mut app, 80, 20);
        assert!(row_contains(&buffer, 19, "[Esc] Close chat"));

        app.set_status_message("Please wait to be connected...");
        let buffer = render_chat_to_buffer(&mut app, 80, 20);
        assert_text_fg_in_row(&buffer, 19, "Please wait", Color::Yellow);
    }

    #[test]
    fn test_render_follows_newest_message() {
        let mut app = connected_app();
        app.messages = (1..=20)
            .map(|i| make_user(i, &format!("message {i}")))
            .collect();
        let buffer = render_chat_to_buffer(&mut app, 60, 16);
        assert!(find_row_with_text(&buffer, "message 20").is_some());
        assert!(find_row_with_text(&buffer, "message 1 ").is_none());
    }

    #[test]
    fn test_render_clamps_scroll_offset() {
        let mut app = connected_app();
        app.messages = (1..=20)
            .map(|i| make_user(i, &format!("message {i}")))
            .collect();
        app.scroll_offset = 10_000;
        let buffer = render_chat_to_buffer(&mut app, 60, 16);

        // 20 messages x 3 lines, 6 visible rows
        assert_eq!(app.scroll_offset, 60 - 6);
        assert!(find_row_with_text(&buffer, "message 1").is_some());
        assert!(find_row_with_text(&buffer, "message 20").is_none());
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut app = connected_app();
        app.input = "hello".to_string();
        app.messages = vec![make_agent(1, "A long reply that needs wrapping")];
        let _ = render_chat_to_buffer(&mut app, 10, 5);
    }
}
