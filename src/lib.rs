//! CloudTech live support simulator
//!
//! This crate simulates the CloudTech live-support chat: a session connects,
//! waits in a queue that counts down on a timer, and is then joined by an
//! agent who answers each customer message with a canned reply after a short
//! random delay. Nothing leaves the process; there is no transport and no
//! persistence.
//!
//! The simulator lives in [`chat`]. The terminal chat ([`tui`]) and the
//! `cloudtech-support` binary drive it, configured through [`config`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Support session simulator: state machine, message log, replies and the
/// async session driver.
pub mod chat;

/// Configuration file schema, loading and XDG path resolution.
pub mod config;

/// Tracing subscriber setup.
pub mod logging;

/// Plain-text and JSON rendering of a session's messages.
pub mod transcript;

/// Terminal chat front-end.
pub mod tui;

/// Connection status of a support session.
///
/// Variants are ordered by progress, so `status >= Status::Waiting` reads as
/// "has left the connecting phase".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Session opened, not yet placed in the queue
    Connecting,
    /// In the queue, waiting for an agent
    Waiting,
    /// An agent has joined
    Connected,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Connecting => "connecting",
            Status::Waiting => "waiting",
            Status::Connected => "connected",
        };
        write!(f, "{}", s)
    }
}

/// Error type for parsing Status from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid status: {}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "connecting" => Ok(Status::Connecting),
            "waiting" => Ok(Status::Waiting),
            "connected" => Ok(Status::Connected),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}
