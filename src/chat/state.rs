//! Connection state machine for a support session.
//!
//! The machine only moves forward: `Connecting -> Waiting -> Connected`.
//! Each trigger is accepted in exactly one state; anything else returns a
//! [`TransitionError`] and leaves the state unchanged.

use crate::Status;
use std::fmt;
use std::num::NonZeroU32;
use thiserror::Error;

/// Timer-driven events that advance the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The connect delay elapsed.
    ConnectElapsed,
    /// The queue interval ticked.
    QueueTick,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::ConnectElapsed => write!(f, "connect-elapsed"),
            Trigger::QueueTick => write!(f, "queue-tick"),
        }
    }
}

/// A trigger arrived in a state that does not accept it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{trigger} is not valid while {status}")]
pub struct TransitionError {
    /// Status the machine was in.
    pub status: Status,
    /// The rejected trigger.
    pub trigger: Trigger,
}

/// Result of a queue tick while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Moved one place up the queue.
    Advanced(NonZeroU32),
    /// Reached the front; the agent joined.
    Joined,
}

/// Session connection state with its queue position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the connect delay. Holds the position the user will be
    /// placed at.
    Connecting {
        /// Queue position assigned when the session starts waiting.
        initial_position: NonZeroU32,
    },
    /// In the queue.
    Waiting {
        /// Current queue position, never zero.
        position: NonZeroU32,
    },
    /// An agent joined. Terminal.
    Connected,
}

impl SessionState {
    /// Creates a machine in the connecting state.
    pub fn new(initial_position: NonZeroU32) -> Self {
        SessionState::Connecting { initial_position }
    }

    pub fn status(&self) -> Status {
        match self {
            SessionState::Connecting { .. } => Status::Connecting,
            SessionState::Waiting { .. } => Status::Waiting,
            SessionState::Connected => Status::Connected,
        }
    }

    /// Queue position shown to the user; 0 once connected.
    pub fn queue_position(&self) -> u32 {
        match self {
            SessionState::Connecting { initial_position } => initial_position.get(),
            SessionState::Waiting { position } => position.get(),
            SessionState::Connected => 0,
        }
    }

    /// Handles the end of the connect delay: `Connecting -> Waiting`.
    ///
    /// Returns the queue position the user was placed at.
    pub fn connect(&mut self) -> Result<NonZeroU32, TransitionError> {
        match *self {
            SessionState::Connecting { initial_position } => {
                *self = SessionState::Waiting {
                    position: initial_position,
                };
                Ok(initial_position)
            }
            SessionState::Waiting { .. } | SessionState::Connected => {
                Err(self.reject(Trigger::ConnectElapsed))
            }
        }
    }

    /// Handles a queue tick while waiting.
    ///
    /// Above position 1 the position drops by one; at position 1 the machine
    /// moves to `Connected` and the position becomes 0.
    pub fn tick(&mut self) -> Result<TickOutcome, TransitionError> {
        match *self {
            SessionState::Waiting { position } => match NonZeroU32::new(position.get() - 1) {
                Some(next) => {
                    *self = SessionState::Waiting { position: next };
                    Ok(TickOutcome::Advanced(next))
                }
                None => {
                    *self = SessionState::Connected;
                    Ok(TickOutcome::Joined)
                }
            },
            SessionState::Connecting { .. } | SessionState::Connected => {
                Err(self.reject(Trigger::QueueTick))
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, SessionState::Connected)
    }

    fn reject(&self, trigger: Trigger) -> TransitionError {
        TransitionError {
            status: self.status(),
            trigger,
        }
    }
}
