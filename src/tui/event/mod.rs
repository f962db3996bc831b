//! Event handling for the terminal chat.
//!
//! Wraps crossterm events and adds a tick variant for periodic UI refresh.

use crate::tui::app::App;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::interval;

/// Lines moved per PageUp/PageDown.
const PAGE_SCROLL: usize = 10;

/// Application-level event variants.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI refresh.
    Tick,
}

/// Event handler that merges terminal input events with periodic ticks.
pub struct EventHandler {
    /// Tick interval duration.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new EventHandler with the specified tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Waits for the next event, returning either a terminal event or a tick.
    ///
    /// Uses `tokio::select!` to race between crossterm input and the tick timer.
    pub async fn next(&self, reader: &mut EventStream) -> std::io::Result<Event> {
        let mut tick = interval(self.tick_rate);
        // Consume the first immediate tick
        tick.tick().await;

        loop {
            tokio::select! {
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) => return Ok(Event::Key(key)),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        // Ignore mouse, focus, paste events
                        Some(Ok(_)) => continue,
                        None => return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                _ = tick.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}

/// Action produced by handling a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action to take.
    None,
    /// Leave the terminal chat.
    Quit,
    /// Close the support session, then leave.
    CloseChat,
    /// Send this text as a customer message.
    Send(String),
}

/// Handles a key event by editing the input line or returning an action.
///
/// Typing and quick actions only work once an agent has joined; before
/// that the input line shows a placeholder and ignores characters.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    // Global keys work in every state
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Esc => return Action::CloseChat,
        _ => {}
    }

    match key.code {
        KeyCode::Enter => app.take_input().map_or(Action::None, Action::Send),
        KeyCode::Backspace => {
            app.backspace();
            Action::None
        }
        KeyCode::F(n) => app
            .quick_action(n)
            .map_or(Action::None, |text| Action::Send(text.to_string())),
        KeyCode::Up => {
            app.scroll_up(1);
            Action::None
        }
        KeyCode::Down => {
            app.scroll_down(1);
            Action::None
        }
        KeyCode::PageUp => {
            app.scroll_up(PAGE_SCROLL);
            Action::None
        }
        KeyCode::PageDown => {
            app.scroll_down(PAGE_SCROLL);
            Action::None
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.push_char(c);
            Action::None
        }
        _ => Action::None,
    }
}
