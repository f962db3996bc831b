//! Timer tasks behind a session: the connect/queue driver and reply delivery.

use super::{SessionError, SessionEvent, Shared};
use crate::chat::message::ChatMessage;
use crate::chat::responder::CannedReply;
use crate::chat::state::TickOutcome;
use crate::Status;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, sleep, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Timer parameters captured at open.
#[derive(Debug, Clone, Copy)]
pub(super) struct Timing {
    pub opened_at: Instant,
    pub connect_delay: Duration,
    pub queue_interval: Duration,
}

/// First queue tick strictly after `from`, on the grid `opened_at + k * period`.
///
/// `None` when that instant is not representable.
pub(super) fn first_tick_after(
    opened_at: Instant,
    from: Instant,
    period: Duration,
) -> Option<Instant> {
    let elapsed = from.saturating_duration_since(opened_at).as_nanos();
    let period_ns = period.as_nanos().max(1);
    let k = u32::try_from(elapsed / period_ns + 1).ok()?;
    opened_at.checked_add(period.checked_mul(k)?)
}

/// Runs the connect delay and the queue countdown until the agent joins or
/// the session is cancelled.
pub(super) async fn run(shared: Arc<Shared>, timing: Timing) {
    let token = shared.token.clone();
    let Some(waiting_at) = timing.opened_at.checked_add(timing.connect_delay) else {
        tracing::warn!(delay = ?timing.connect_delay, "connect delay out of range");
        return;
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => return,
        _ = sleep_until(waiting_at) => {}
    }

    match enter_queue(&shared).await {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            tracing::warn!(error = %e, "session driver stopped");
            return;
        }
    }

    let first = first_tick_after(timing.opened_at, waiting_at, timing.queue_interval);
    let Some(start) = first else {
        tracing::warn!(interval = ?timing.queue_interval, "queue interval out of range");
        return;
    };
    let mut ticker = interval_at(start, timing.queue_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = ticker.tick() => {}
        }

        match queue_tick(&shared).await {
            Ok(Some(Status::Connected)) | Ok(None) => return,
            Ok(Some(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "session driver stopped");
                return;
            }
        }
    }
}

/// `Connecting -> Waiting`. Returns `false` if the session closed first.
async fn enter_queue(shared: &Shared) -> Result<bool, SessionError> {
    let mut inner = shared.inner.lock().await;
    if !shared.is_open(&inner) {
        return Ok(false);
    }

    let position = inner.state.connect()?;
    let notice = inner.push(|id| {
        ChatMessage::system(
            id,
            format!(
                "You are currently #{} in queue. Average wait time is 2-3 minutes.",
                position
            ),
        )
    })?;
    tracing::info!(position = position.get(), "session waiting in queue");

    shared.emit(SessionEvent::StatusChanged(Status::Waiting));
    shared.emit(SessionEvent::QueuePositionChanged(position.get()));
    shared.emit(SessionEvent::MessageAppended(notice));
    Ok(true)
}

/// Handles one queue tick. Returns the status afterwards, or `None` if the
/// session closed first.
async fn queue_tick(shared: &Shared) -> Result<Option<Status>, SessionError> {
    let mut inner = shared.inner.lock().await;
    if !shared.is_open(&inner) {
        return Ok(None);
    }

    match inner.state.tick()? {
        TickOutcome::Advanced(position) => {
            let notice = inner.push(|id| {
                ChatMessage::system(id, format!("You are now #{} in queue.", position))
            })?;
            tracing::debug!(position = position.get(), "queue advanced");
            shared.emit(SessionEvent::QueuePositionChanged(position.get()));
            shared.emit(SessionEvent::MessageAppended(notice));
            Ok(Some(Status::Waiting))
        }
        TickOutcome::Joined => {
            let agent = inner.settings.agent_name.clone();
            let greeting = inner.settings.greeting();
            let joined = inner.push(|id| {
                ChatMessage::system(id, format!("{} has joined the chat.", agent))
            })?;
            let hello = inner.push(|id| ChatMessage::agent(id, agent.as_str(), greeting))?;
            tracing::info!(agent = %agent, "agent joined the chat");

            shared.emit(SessionEvent::StatusChanged(Status::Connected));
            shared.emit(SessionEvent::QueuePositionChanged(0));
            shared.emit(SessionEvent::MessageAppended(joined));
            shared.emit(SessionEvent::MessageAppended(hello));
            Ok(Some(Status::Connected))
        }
    }
}

/// Waits out the reply delay, then appends the agent's reply.
pub(super) async fn deliver_reply(shared: Arc<Shared>, token: CancellationToken, reply: CannedReply) {
    tokio::select! {
        biased;
        _ = token.cancelled() => return,
        _ = sleep(reply.delay) => {}
    }

    let mut inner = shared.inner.lock().await;
    if !shared.is_open(&inner) {
        return;
    }

    inner.pending_replies = inner.pending_replies.saturating_sub(1);
    let agent = inner.settings.agent_name.clone();
    match inner.push(|id| ChatMessage::agent(id, agent, reply.content)) {
        Ok(message) => {
            tracing::debug!(id = %message.id(), "agent reply delivered");
            shared.emit(SessionEvent::MessageAppended(message));
        }
        Err(e) => tracing::warn!(error = %e, "agent reply dropped"),
    }
}
