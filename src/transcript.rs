//! Plain-text and JSON-lines rendering of chat messages.

use crate::chat::message::{ChatMessage, Sender};
use std::io::{self, Write};

/// Output format of a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `[HH:MM] Label: content`
    #[default]
    Text,
    /// One JSON object per message.
    JsonLines,
}

/// Label shown in front of a message: `You`, the agent's name, or `System`.
pub fn label(message: &ChatMessage) -> &str {
    match message.sender() {
        Sender::User => "You",
        Sender::Agent => message.agent_name().unwrap_or("Agent"),
        Sender::System => "System",
    }
}

/// Renders one message as a text line, without the trailing newline.
pub fn text_line(message: &ChatMessage) -> String {
    format!(
        "[{}] {}: {}",
        message.display_time(),
        label(message),
        message.content()
    )
}

/// Writes `message` to `out` in the given format, followed by a newline.
pub fn write_message<W: Write>(out: &mut W, message: &ChatMessage, format: Format) -> io::Result<()> {
    match format {
        Format::Text => writeln!(out, "{}", text_line(message)),
        Format::JsonLines => {
            serde_json::to_writer(&mut *out, message)?;
            writeln!(out)
        }
    }
}

/// Writes every message in order.
pub fn write_all<'a, W, I>(out: &mut W, messages: I, format: Format) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ChatMessage>,
{
    for message in messages {
        write_message(out, message, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::MessageId;

    fn sample() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(MessageId::new(1), "You are now #2 in queue."),
            ChatMessage::user(MessageId::new(2), "Hello"),
            ChatMessage::agent(MessageId::new(3), "Sarah Johnson", "Hi there"),
        ]
    }

    #[test]
    fn labels_by_sender() {
        let messages = sample();
        let labels: Vec<&str> = messages.iter().map(label).collect();
        assert_eq!(labels, vec!["System", "You", "Sarah Johnson"]);
    }

    #[test]
    fn text_line_has_time_label_and_content() {
        let messages = sample();
        let line = text_line(&messages[1]);
        assert!(line.starts_with('['));
        assert_eq!(&line[6..], "] You: Hello");
    }

    #[test]
    fn text_transcript_has_one_line_per_message() {
        let mut out = Vec::new();
        write_all(&mut out, &sample(), Format::Text).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("System: You are now #2 in queue."));
        assert!(lines[2].ends_with("Sarah Johnson: Hi there"));
    }

    #[test]
    fn json_lines_parse_back() {
        let mut out = Vec::new();
        write_all(&mut out, &sample(), Format::JsonLines).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let values: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).expect("valid json"))
            .collect();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0]["sender"], "system");
        assert_eq!(values[1]["content"], "Hello");
        assert_eq!(values[2]["agent_name"], "Sarah Johnson");
        assert!(values[2]["timestamp"].is_string());
    }
}
