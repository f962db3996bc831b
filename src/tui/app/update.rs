use super::*;
use crate::chat::message::Sender;
use crate::chat::session::SessionEvent;

impl App {
    /// Applies one session event to the mirrored state.
    pub fn apply_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::StatusChanged(status) => self.status = *status,
            SessionEvent::QueuePositionChanged(position) => self.queue_position = *position,
            SessionEvent::MessageAppended(message) => {
                if message.sender() == Sender::Agent {
                    self.pending_replies = self.pending_replies.saturating_sub(1);
                }
                self.messages.push(message.clone());
                // Jump back to the newest message
                self.scroll_offset = 0;
            }
            SessionEvent::ReplyScheduled => self.pending_replies += 1,
            SessionEvent::Closed => self.should_quit = true,
        }
    }

    /// Replaces the mirrored state with `snapshot`. Keeps the input line.
    pub fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        self.status = snapshot.status;
        self.queue_position = snapshot.queue_position;
        self.agent_name = snapshot.agent_name;
        self.messages = snapshot.messages;
        self.pending_replies = snapshot.pending_replies;
    }
}
