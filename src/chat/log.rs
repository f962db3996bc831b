//! Append-only message log for one support session.

use crate::chat::message::{ChatMessage, MessageId};
use thiserror::Error;

/// Errors returned by [`MessageLog::append`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The message id does not come after the last appended id.
    #[error("message id {id} must be greater than the last appended id {last}")]
    DuplicateId {
        /// Id of the rejected message.
        id: MessageId,
        /// Id of the most recent message in the log.
        last: MessageId,
    },
}

/// Ordered, append-only sequence of chat messages.
///
/// `append` is the only mutator. Ids must strictly increase, which rules out
/// two entries sharing an id.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the end of the log.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::DuplicateId`] if the message id is not greater
    /// than the id of the last appended message. The log is left unchanged.
    pub fn append(&mut self, message: ChatMessage) -> Result<&ChatMessage, LogError> {
        if let Some(last) = self.messages.last() {
            if message.id() <= last.id() {
                return Err(LogError::DuplicateId {
                    id: message.id(),
                    last: last.id(),
                });
            }
        }
        self.messages.push(message);
        // Just pushed, so the log is non-empty.
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
