//! `simulate` subcommand: a headless session that prints its transcript.
//!
//! Waits for the agent to join, sends each scripted message in turn and
//! waits for its reply. Messages are printed as they are appended.

use super::{load_config, CommandError};
use cloudtech_support::chat::{
    rng_from_seed, ChatMessage, SendOutcome, Sender, SessionEvent, SessionSettings,
    SupportSession,
};
use cloudtech_support::logging::{self, Fallback};
use cloudtech_support::transcript::{self, Format};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::timeout;

/// Extra time allowed on top of the configured delays before giving up.
const DEADLINE_SLACK: Duration = Duration::from_secs(5);

/// Runs `simulate` with the config at `config_path` and prints to stdout.
pub(crate) async fn run_simulate_command(
    config_path: Option<&Path>,
    seed: Option<u64>,
    messages: &[String],
    json: bool,
) -> Result<(), CommandError> {
    let config = load_config(config_path)?;
    logging::init(&config.log, Fallback::Stderr)?;

    let settings = config.session.to_settings()?;
    let format = if json { Format::JsonLines } else { Format::Text };
    let mut out = std::io::stdout();
    simulate(settings, seed, messages, &mut out, format).await
}

/// Drives one session to completion, writing every message to `out`.
pub(crate) async fn simulate<W: Write>(
    settings: SessionSettings,
    seed: Option<u64>,
    messages: &[String],
    out: &mut W,
    format: Format,
) -> Result<(), CommandError> {
    let join_deadline = settings
        .queue_interval
        .saturating_mul(settings.initial_queue_position.get().saturating_add(1))
        .saturating_add(settings.connect_delay)
        .saturating_add(DEADLINE_SLACK);
    let reply_deadline = settings.reply_delay_max.saturating_add(DEADLINE_SLACK);

    let session = SupportSession::open(settings, rng_from_seed(seed))?;
    let (snapshot, mut events) = session.watch().await;
    transcript::write_all(out, &snapshot.messages, format)?;

    // The greeting is the first agent message
    let joined = |m: &ChatMessage| m.sender() == Sender::Agent;
    timeout(join_deadline, follow(&mut events, out, format, joined))
        .await
        .map_err(|_| CommandError::Timeout("the agent to join"))??;

    for text in messages {
        let sent = match session.send(text).await? {
            SendOutcome::Accepted(id) => id,
            outcome => {
                tracing::warn!(?outcome, message = %text, "scripted message not sent");
                continue;
            }
        };
        let replied = move |m: &ChatMessage| m.sender() == Sender::Agent && m.id() > sent;
        timeout(reply_deadline, follow(&mut events, out, format, replied))
            .await
            .map_err(|_| CommandError::Timeout("an agent reply"))??;
    }

    session.close().await;
    Ok(())
}

/// Writes appended messages to `out` until one satisfies `done`.
async fn follow<W: Write>(
    events: &mut broadcast::Receiver<SessionEvent>,
    out: &mut W,
    format: Format,
    done: impl Fn(&ChatMessage) -> bool,
) -> Result<(), CommandError> {
    loop {
        match events.recv().await {
            Ok(SessionEvent::MessageAppended(message)) => {
                transcript::write_message(out, &message, format)?;
                out.flush()?;
                if done(&message) {
                    return Ok(());
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "transcript output fell behind, messages skipped");
            }
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}
