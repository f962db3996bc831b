//! Tests for SupportSession.
//!
//! All tests run on tokio's paused clock, so timers fire exactly at their
//! deadlines and the suite finishes instantly.
//! - `timeline`: connect delay, queue countdown and agent join
//! - `send`: accepted and rejected sends, reply delivery
//! - `close`: cancellation on close and drop


use super::{SessionEvent, SupportSession};
use crate::chat::responder::rng_from_seed;
use crate::chat::settings::SessionSettings;
use crate::Status;
use std::time::Duration;
use tokio::sync::broadcast;

pub(super) const SEED: u64 = 7;

/// Opens a session with default settings and a fixed seed.
pub(super) fn open_default() -> SupportSession {
    open_with(SessionSettings::default())
}

pub(super) fn open_with(settings: SessionSettings) -> SupportSession {
    SupportSession::open(settings, rng_from_seed(Some(SEED))).expect("valid settings")
}

/// Opens a default session and waits until the agent has joined.
pub(super) async fn open_connected() -> SupportSession {
    let session = open_default();
    session.wait_for_status(Status::Connected).await;
    session
}

pub(super) fn secs_f(secs: f64) -> Duration {
    Duration::from_secs_f64(secs)
}

/// Drains every event already queued on `rx`.
pub(super) fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => return events,
        }
    }
}
