//! Application state and main event loop for the terminal chat.
//!
//! Manages terminal setup/teardown, panic hooks, and the core render loop.
//! [`App`] mirrors the session from its broadcast events; the session itself
//! stays the single owner of the message log.

mod update;

use crate::chat::message::ChatMessage;
use crate::chat::session::{SendOutcome, SessionSnapshot, SupportSession};
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::ui::render_chat;
use crate::Status;
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::TryRecvError;

/// Canned customer messages bound to F1, F2 and F3.
pub const QUICK_ACTIONS: [&str; 3] = ["Reset Password", "Billing Question", "Technical Issue"];

/// How long a footer hint stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(2);

/// Core application state for the terminal chat.
#[derive(Debug)]
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Count of ticks processed.
    pub tick_count: u64,
    /// Connection status as last reported by the session.
    pub status: Status,
    /// Queue position as last reported; 0 once connected.
    pub queue_position: u32,
    /// Agent assigned to the session.
    pub agent_name: String,
    /// Messages in log order.
    pub messages: Vec<ChatMessage>,
    /// Agent replies scheduled but not yet delivered. Drives the typing indicator.
    pub pending_replies: usize,
    /// Text typed into the input line.
    pub input: String,
    /// Lines scrolled up from the newest message. 0 follows the conversation.
    pub scroll_offset: usize,
    /// Temporary footer message with its expiry time.
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Creates an App for a session that has just opened.
    pub fn new(agent_name: impl Into<String>, initial_position: u32) -> Self {
        Self {
            should_quit: false,
            tick_count: 0,
            status: Status::Connecting,
            queue_position: initial_position,
            agent_name: agent_name.into(),
            messages: Vec::new(),
            pending_replies: 0,
            input: String::new(),
            scroll_offset: 0,
            status_message: None,
        }
    }

    /// Creates an App mirroring `snapshot`.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let mut app = Self::new(snapshot.agent_name.clone(), snapshot.queue_position);
        app.apply_snapshot(snapshot);
        app
    }

    /// Whether the customer can type and send.
    pub fn can_type(&self) -> bool {
        self.status == Status::Connected
    }

    /// Status line shown in the header.
    pub fn header_text(&self) -> String {
        match self.status {
            Status::Connecting => "Connecting...".to_string(),
            Status::Waiting => format!("Position in queue: #{}", self.queue_position),
            Status::Connected => format!("Connected to {}", self.agent_name),
        }
    }

    /// Placeholder shown in the empty input line.
    pub fn placeholder(&self) -> &'static str {
        match self.status {
            Status::Connecting => "Connecting to support...",
            Status::Waiting => "Please wait to be connected...",
            Status::Connected => "Type your message...",
        }
    }

    /// Appends a typed character. Ignored until connected.
    pub fn push_char(&mut self, c: char) {
        if self.can_type() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Takes the input line for sending.
    ///
    /// Returns `None` and keeps the line when it is blank or the session is
    /// not connected yet.
    pub fn take_input(&mut self) -> Option<String> {
        if !self.can_type() || self.input.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.input))
    }

    /// Text bound to function key `n` (F1..F3), available once connected.
    pub fn quick_action(&self, n: u8) -> Option<&'static str> {
        if !self.can_type() {
            return None;
        }
        QUICK_ACTIONS.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Shows `text` in the footer for a short while.
    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status_message = Some((text.into(), Instant::now() + STATUS_MESSAGE_TTL));
    }

    /// Clears the status message if its expiry time has passed.
    pub fn expire_status_message(&mut self) {
        if let Some((_, expiry)) = &self.status_message {
            if Instant::now() >= *expiry {
                self.status_message = None;
            }
        }
    }

    /// Reacts to the result of sending a customer message.
    pub fn apply_send_outcome(&mut self, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Accepted(id) => tracing::debug!(%id, "message sent"),
            SendOutcome::Empty => {}
            SendOutcome::NotConnected => self.set_status_message("Please wait to be connected..."),
            SendOutcome::Closed => self.should_quit = true,
        }
    }

    /// Runs the terminal chat: sets up terminal, enters event loop, restores on exit.
    ///
    /// Takes ownership of the session. Esc closes it before returning; Ctrl+C
    /// returns straight away and the session is cancelled on drop.
    pub async fn run(&mut self, session: SupportSession, tick_rate: Duration) -> io::Result<()> {
        // Install panic hook that restores terminal before printing panic info
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop(session, tick_rate).await;

        restore_terminal()?;
        result
    }

    /// Main event loop: renders UI and processes events.
    async fn event_loop(&mut self, session: SupportSession, tick_rate: Duration) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let event_handler = EventHandler::new(tick_rate);
        let mut reader = EventStream::new();
        let (snapshot, mut updates) = session.watch().await;
        self.apply_snapshot(snapshot);

        loop {
            // Drain session events before rendering
            loop {
                match updates.try_recv() {
                    Ok(event) => self.apply_event(&event),
                    Err(TryRecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "session events lagged, resyncing");
                        let (snapshot, fresh) = session.watch().await;
                        self.apply_snapshot(snapshot);
                        updates = fresh;
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                }
            }
            if self.should_quit {
                return Ok(());
            }

            terminal.draw(|frame| render_chat(frame, self))?;

            match event_handler.next(&mut reader).await? {
                Event::Key(key) => match handle_key_event(self, key) {
                    Action::Quit => {
                        self.should_quit = true;
                        return Ok(());
                    }
                    Action::CloseChat => {
                        self.should_quit = true;
                        session.close().await;
                        return Ok(());
                    }
                    Action::Send(text) => match session.send(&text).await {
                        Ok(outcome) => self.apply_send_outcome(outcome),
                        Err(e) => {
                            tracing::warn!(error = %e, "send failed");
                            self.set_status_message(format!("Message not sent: {}", e));
                        }
                    },
                    Action::None => {}
                },
                Event::Tick => {
                    self.tick_count += 1;
                    self.expire_status_message();
                }
                Event::Resize(_, _) => {}
            }
        }
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests;
