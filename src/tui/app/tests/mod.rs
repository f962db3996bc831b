pub(crate) use super::*;
pub(crate) use crate::chat::message::ChatMessage;
pub(crate) use crate::chat::session::{SendOutcome, SessionEvent, SessionSnapshot};
pub(crate) use crate::Status;
pub(crate) use std::time::{Duration, Instant};
pub(crate) use crate::tui::test_utils::*;


/// An App that has walked through the queue with the given messages.
pub(crate) fn make_connected_app_with(messages: Vec<ChatMessage>) -> App {
    let mut app = connected_app();
    app.messages = messages;
    app
}
