//! Chat message types for the support session.
//!
//! A [`ChatMessage`] is immutable once built. Messages can only be created
//! through the sender-specific constructors, which keeps `agent_name` set
//! exactly when the sender is an agent.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Identifier of a message within one session.
///
/// Ids are allocated by [`MessageIds`] and strictly increase in allocation
/// order, so they double as a creation sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Wraps a raw id value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id allocator owned by a single session.
#[derive(Debug)]
pub struct MessageIds {
    next: u64,
}

impl MessageIds {
    /// Creates an allocator whose first id is 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocates the next id.
    pub fn next_id(&mut self) -> MessageId {
        let id = MessageId(self.next);
        self.next += 1;
        id
    }
}

impl Default for MessageIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The customer using the chat.
    User,
    /// The support agent assigned to the session.
    Agent,
    /// Queue and connection notices.
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sender::User => "user",
            Sender::Agent => "agent",
            Sender::System => "system",
        };
        write!(f, "{}", s)
    }
}

/// A single entry of the chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    id: MessageId,
    sender: Sender,
    content: String,
    timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agent_name: Option<String>,
}

impl ChatMessage {
    /// Creates a system notice.
    pub fn system(id: MessageId, content: impl Into<String>) -> Self {
        Self::build(id, Sender::System, content.into(), None)
    }

    /// Creates a message typed by the customer.
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self::build(id, Sender::User, content.into(), None)
    }

    /// Creates a message written by the named agent.
    pub fn agent(id: MessageId, agent_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::build(id, Sender::Agent, content.into(), Some(agent_name.into()))
    }

    fn build(id: MessageId, sender: Sender, content: String, agent_name: Option<String>) -> Self {
        Self {
            id,
            sender,
            content,
            timestamp: Local::now(),
            agent_name,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Name of the authoring agent. `Some` only for [`Sender::Agent`].
    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }

    /// Creation time as `HH:MM`.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}
