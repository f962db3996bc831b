//! `chat` subcommand: the terminal chat.

use super::{load_config, CommandError};
use cloudtech_support::chat::{rng_from_seed, SupportSession};
use cloudtech_support::logging::{self, Fallback};
use cloudtech_support::tui::app::App;
use std::path::Path;

/// Opens a session and hands the terminal to it until the customer leaves.
pub(crate) async fn run_chat_command(
    config_path: Option<&Path>,
    seed: Option<u64>,
) -> Result<(), CommandError> {
    let config = load_config(config_path)?;
    // The chat owns the screen, so logs only go to a configured file
    logging::init(&config.log, Fallback::Discard)?;

    let settings = config.session.to_settings()?;
    let tick_rate = config.tui.tick_rate()?;
    let session = SupportSession::open(settings, rng_from_seed(seed))?;
    let mut app = App::new(
        session.agent_name(),
        config.session.initial_queue_position,
    );
    app.run(session, tick_rate).await?;
    Ok(())
}
