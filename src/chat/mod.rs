//! Support session simulator.
//!
//! [`SupportSession`] owns one open/close cycle. It drives the
//! [`SessionState`] machine from timers, appends to the [`MessageLog`] and
//! asks the [`ResponseGenerator`] for agent replies.

pub mod log;
pub mod message;
pub mod responder;
pub mod session;
pub mod settings;
pub mod state;

pub use log::{LogError, MessageLog};
pub use message::{ChatMessage, MessageId, MessageIds, Sender};
pub use responder::{rng_from_seed, CannedReply, ResponseGenerator};
pub use session::{SendOutcome, SessionError, SessionEvent, SessionSnapshot, SupportSession};
pub use settings::{SessionSettings, SettingsError, MAX_DELAY};
pub use state::{SessionState, TickOutcome, TransitionError, Trigger};
