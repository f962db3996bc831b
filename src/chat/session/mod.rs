//! Async owner of one support session.
//!
//! A [`SupportSession`] is opened inside a tokio runtime. Opening spawns a
//! driver task that walks the state machine through the connect delay and
//! the queue countdown; each accepted user message spawns a reply task. All
//! tasks hang off the session's [`CancellationToken`], and every append
//! re-checks the closed flag under the state lock, so nothing is appended
//! once [`SupportSession::close`] has returned.

use crate::chat::log::{LogError, MessageLog};
use crate::chat::message::{ChatMessage, MessageId, MessageIds};
use crate::chat::responder::ResponseGenerator;
use crate::chat::settings::{SessionSettings, SettingsError};
use crate::chat::state::{SessionState, TransitionError};
use crate::Status;
use rand::RngCore;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests;

mod driver;

/// Capacity of the event channel. Large enough for bursts such as the
/// join notice, greeting and status change arriving together.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Change notifications broadcast to subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The connection status moved forward.
    StatusChanged(Status),
    /// The queue position changed; 0 once connected.
    QueuePositionChanged(u32),
    /// A message was appended to the log.
    MessageAppended(ChatMessage),
    /// An agent reply was scheduled for an accepted user message.
    ReplyScheduled,
    /// The session was closed.
    Closed,
}

/// Result of [`SupportSession::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Appended with this id; one agent reply is scheduled.
    Accepted(MessageId),
    /// Empty or whitespace-only input. Nothing happened.
    Empty,
    /// No agent has joined yet. Nothing happened.
    NotConnected,
    /// The session is closed. Nothing happened.
    Closed,
}

/// Internal invariant breach inside a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Log(#[from] LogError),
}

/// Point-in-time copy of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: Status,
    /// 0 once connected.
    pub queue_position: u32,
    pub agent_name: String,
    pub messages: Vec<ChatMessage>,
    /// Replies scheduled but not yet delivered.
    pub pending_replies: usize,
}

/// Mutable session state, guarded by [`Shared::inner`].
#[derive(Debug)]
struct Inner {
    state: SessionState,
    log: MessageLog,
    ids: MessageIds,
    responder: ResponseGenerator,
    settings: SessionSettings,
    pending_replies: usize,
    closed: bool,
}

impl Inner {
    /// Allocates an id, appends the message and returns a copy for broadcast.
    fn push(
        &mut self,
        build: impl FnOnce(MessageId) -> ChatMessage,
    ) -> Result<ChatMessage, LogError> {
        let message = build(self.ids.next_id());
        self.log.append(message).cloned()
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.state.status(),
            queue_position: self.state.queue_position(),
            agent_name: self.settings.agent_name.clone(),
            messages: self.log.messages().to_vec(),
            pending_replies: self.pending_replies,
        }
    }
}

/// State shared between the session handle and its tasks.
#[derive(Debug)]
struct Shared {
    inner: Mutex<Inner>,
    events: broadcast::Sender<SessionEvent>,
    token: CancellationToken,
}

impl Shared {
    /// Whether appends are still allowed. Call with the lock held.
    fn is_open(&self, inner: &Inner) -> bool {
        !inner.closed && !self.token.is_cancelled()
    }

    fn emit(&self, event: SessionEvent) {
        match self.events.send(event) {
            Ok(count) => tracing::trace!(subscribers = count, "session event sent"),
            Err(_) => tracing::trace!("session event dropped, no subscribers"),
        }
    }
}

/// One simulated support chat, from open to close.
///
/// # Example
///
/// ```
/// use cloudtech_support::chat::{rng_from_seed, SessionSettings, SupportSession};
/// use cloudtech_support::Status;
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() {
///     let session = SupportSession::open(SessionSettings::default(), rng_from_seed(Some(1)))
///         .expect("default settings are valid");
///     session.wait_for_status(Status::Connected).await;
///     assert_eq!(session.snapshot().await.queue_position, 0);
///     session.close().await;
/// }
/// ```
#[derive(Debug)]
pub struct SupportSession {
    shared: Arc<Shared>,
    agent_name: String,
}

impl SupportSession {
    /// Opens a session and starts the connect/queue sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if `settings` cannot drive a session.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn open(
        settings: SessionSettings,
        rng: Box<dyn RngCore + Send>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let responder = ResponseGenerator::from_settings(&settings, rng)?;
        let (events, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let opened_at = Instant::now();
        let agent_name = settings.agent_name.clone();
        let timing = driver::Timing {
            opened_at,
            connect_delay: settings.connect_delay,
            queue_interval: settings.queue_interval,
        };

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                state: SessionState::new(settings.initial_queue_position),
                log: MessageLog::new(),
                ids: MessageIds::new(),
                responder,
                settings,
                pending_replies: 0,
                closed: false,
            }),
            events,
            token: CancellationToken::new(),
        });

        tokio::spawn(driver::run(Arc::clone(&shared), timing));
        tracing::info!(agent = %agent_name, "support session opened");

        Ok(Self { shared, agent_name })
    }

    /// Submits a customer message.
    ///
    /// Only [`SendOutcome::Accepted`] changes anything: the message is
    /// appended and one agent reply is scheduled. Other outcomes are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Log`] if the log rejects the message, which
    /// means the id allocator and the log disagree.
    pub async fn send(&self, content: &str) -> Result<SendOutcome, SessionError> {
        let mut inner = self.shared.inner.lock().await;
        if !self.shared.is_open(&inner) {
            tracing::debug!("send rejected: session closed");
            return Ok(SendOutcome::Closed);
        }
        if content.trim().is_empty() {
            tracing::debug!("send rejected: empty message");
            return Ok(SendOutcome::Empty);
        }
        if !inner.state.is_connected() {
            tracing::debug!(status = %inner.state.status(), "send rejected: not connected");
            return Ok(SendOutcome::NotConnected);
        }

        let message = inner.push(|id| ChatMessage::user(id, content))?;
        let id = message.id();
        let reply = inner.responder.next_reply();
        inner.pending_replies += 1;
        self.shared.emit(SessionEvent::MessageAppended(message));
        self.shared.emit(SessionEvent::ReplyScheduled);
        tracing::debug!(%id, delay_ms = reply.delay.as_millis() as u64, "agent reply scheduled");

        tokio::spawn(driver::deliver_reply(
            Arc::clone(&self.shared),
            self.shared.token.child_token(),
            reply,
        ));
        Ok(SendOutcome::Accepted(id))
    }

    /// Closes the session.
    ///
    /// Cancels every pending timer and discards the state. Once this returns
    /// no further message is appended.
    pub async fn close(self) {
        let mut inner = self.shared.inner.lock().await;
        inner.closed = true;
        self.shared.token.cancel();
        self.shared.emit(SessionEvent::Closed);
        tracing::info!(
            messages = inner.log.len(),
            pending_replies = inner.pending_replies,
            "support session closed"
        );
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.shared.inner.lock().await.snapshot()
    }

    pub async fn status(&self) -> Status {
        self.shared.inner.lock().await.state.status()
    }

    /// Agent assigned to this session. Fixed for its lifetime.
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Subscribes to change events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Snapshot plus a receiver for every event after it.
    ///
    /// Both are taken under the state lock, so no event is missed or seen twice.
    pub async fn watch(&self) -> (SessionSnapshot, broadcast::Receiver<SessionEvent>) {
        let inner = self.shared.inner.lock().await;
        (inner.snapshot(), self.shared.events.subscribe())
    }

    /// Resolves once the session has reached `status` or a later one.
    pub async fn wait_for_status(&self, status: Status) {
        self.wait_until(|inner| inner.state.status() >= status).await;
    }

    /// Resolves once no agent reply is pending.
    pub async fn wait_for_pending_replies(&self) {
        self.wait_until(|inner| inner.pending_replies == 0).await;
    }

    /// Re-checks `done` after every event. Subscribes before the first check
    /// so no change is missed.
    async fn wait_until(&self, done: impl Fn(&Inner) -> bool) {
        let mut rx = self.subscribe();
        loop {
            if done(&*self.shared.inner.lock().await) {
                return;
            }
            match rx.recv().await {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }
}

impl Drop for SupportSession {
    fn drop(&mut self) {
        self.shared.token.cancel();
    }
}
