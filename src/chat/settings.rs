//! Tunable parameters of a support session.

use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

/// Agent assigned to every session unless configured otherwise.
pub const DEFAULT_AGENT_NAME: &str = "Sarah Johnson";

/// Queue position a new session starts at.
pub const DEFAULT_QUEUE_POSITION: NonZeroU32 = match NonZeroU32::new(3) {
    Some(n) => n,
    None => unreachable!(),
};

/// Canned replies the agent picks from.
pub const DEFAULT_CANNED_RESPONSES: [&str; 5] = [
    "I understand your concern. Let me look into this for you.",
    "That's a great question. Let me check our documentation for the most accurate information.",
    "I can definitely help you with that. Let me pull up your account details.",
    "Thank you for the additional details. This helps me understand the issue better.",
    "I've found a solution for you. Let me walk you through the steps.",
];

/// Longest accepted delay or interval.
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Settings that make a session unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The agent name is empty or whitespace.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// A zero queue interval would tick continuously.
    #[error("queue interval must be greater than zero")]
    ZeroQueueInterval,

    /// The reply delay range is inverted.
    #[error(
        "reply delay minimum ({}) exceeds maximum ({})",
        humantime::format_duration(*min),
        humantime::format_duration(*max)
    )]
    InvertedReplyDelay {
        /// Configured lower bound.
        min: Duration,
        /// Configured upper bound.
        max: Duration,
    },

    /// A delay is too long to schedule.
    #[error(
        "{field} ({}) exceeds the maximum of {}",
        humantime::format_duration(*value),
        humantime::format_duration(*max)
    )]
    DelayTooLong {
        /// Name of the offending setting.
        field: &'static str,
        /// Configured value.
        value: Duration,
        /// Largest accepted value.
        max: Duration,
    },

    /// There is nothing for the agent to say.
    #[error("at least one canned response is required")]
    NoCannedResponses,
}

/// First letter of `name` in upper case, `A` when the name is blank.
pub fn name_initial(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('A')
}

/// Parameters of one open/close cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Name of the agent who joins the chat.
    pub agent_name: String,
    /// Position assigned when the session starts waiting.
    pub initial_queue_position: NonZeroU32,
    /// Time from open until the session enters the queue.
    pub connect_delay: Duration,
    /// Period of the queue countdown, anchored at open.
    pub queue_interval: Duration,
    /// Lower bound of the agent reply delay.
    pub reply_delay_min: Duration,
    /// Upper bound of the agent reply delay (inclusive).
    pub reply_delay_max: Duration,
    /// Replies the agent picks from uniformly.
    pub canned_responses: Vec<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            initial_queue_position: DEFAULT_QUEUE_POSITION,
            connect_delay: Duration::from_secs(1),
            queue_interval: Duration::from_secs(3),
            reply_delay_min: Duration::from_secs(1),
            reply_delay_max: Duration::from_secs(3),
            canned_responses: DEFAULT_CANNED_RESPONSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SessionSettings {
    /// Checks the settings can drive a session.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.agent_name.trim().is_empty() {
            return Err(SettingsError::EmptyAgentName);
        }
        if self.queue_interval.is_zero() {
            return Err(SettingsError::ZeroQueueInterval);
        }
        for (field, value) in [
            ("connect_delay", self.connect_delay),
            ("queue_interval", self.queue_interval),
            ("reply_delay_min", self.reply_delay_min),
            ("reply_delay_max", self.reply_delay_max),
        ] {
            if value > MAX_DELAY {
                return Err(SettingsError::DelayTooLong {
                    field,
                    value,
                    max: MAX_DELAY,
                });
            }
        }
        if self.reply_delay_min > self.reply_delay_max {
            return Err(SettingsError::InvertedReplyDelay {
                min: self.reply_delay_min,
                max: self.reply_delay_max,
            });
        }
        if self.canned_responses.is_empty() {
            return Err(SettingsError::NoCannedResponses);
        }
        Ok(())
    }

    /// First word of the agent name, used in the greeting.
    pub fn agent_first_name(&self) -> &str {
        self.agent_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.agent_name)
    }

    /// Single-letter avatar for the agent.
    pub fn agent_initial(&self) -> char {
        name_initial(&self.agent_name)
    }

    /// The agent's first message after joining.
    pub fn greeting(&self) -> String {
        format!(
            "Hi! I'm {}, your customer support agent. How can I help you today?",
            self.agent_first_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let settings = SessionSettings::default();
        assert_eq!(settings.agent_name, "Sarah Johnson");
        assert_eq!(settings.initial_queue_position.get(), 3);
        assert_eq!(settings.connect_delay, Duration::from_secs(1));
        assert_eq!(settings.queue_interval, Duration::from_secs(3));
        assert_eq!(settings.reply_delay_min, Duration::from_secs(1));
        assert_eq!(settings.reply_delay_max, Duration::from_secs(3));
        assert_eq!(settings.canned_responses.len(), 5);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn greeting_uses_first_name() {
        let settings = SessionSettings::default();
        assert_eq!(
            settings.greeting(),
            "Hi! I'm Sarah, your customer support agent. How can I help you today?"
        );
    }

    #[test]
    fn agent_initial_falls_back_to_a() {
        let mut settings = SessionSettings::default();
        assert_eq!(settings.agent_initial(), 'S');
        settings.agent_name = "   ".to_string();
        assert_eq!(settings.agent_initial(), 'A');
        assert_eq!(name_initial(" marcus"), 'M');
    }

    #[test]
    fn validate_rejects_blank_agent() {
        let settings = SessionSettings {
            agent_name: " ".to_string(),
            ..SessionSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::EmptyAgentName));
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let settings = SessionSettings {
            queue_interval: Duration::ZERO,
            ..SessionSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ZeroQueueInterval));
    }

    #[test]
    fn validate_rejects_inverted_reply_range() {
        let settings = SessionSettings {
            reply_delay_min: Duration::from_secs(5),
            reply_delay_max: Duration::from_secs(2),
            ..SessionSettings::default()
        };
        let err = settings.validate().expect_err("inverted range");
        assert_eq!(err.to_string(), "reply delay minimum (5s) exceeds maximum (2s)");
    }

    #[test]
    fn validate_accepts_fixed_reply_delay() {
        let settings = SessionSettings {
            reply_delay_min: Duration::from_secs(2),
            reply_delay_max: Duration::from_secs(2),
            ..SessionSettings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_response_set() {
        let settings = SessionSettings {
            canned_responses: Vec::new(),
            ..SessionSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::NoCannedResponses));
    }

    #[test]
    fn test_validate_rejects_delay_past_instant_range() {
        let huge = Duration::from_secs(u64::MAX / 2);
        let settings = SessionSettings {
            connect_delay: huge,
            ..SessionSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::DelayTooLong {
                field: "connect_delay",
                value: huge,
                max: MAX_DELAY,
            })
        );

        let settings = SessionSettings {
            queue_interval: huge,
            ..SessionSettings::default()
        };
        let err = settings.validate().expect_err("interval too long");
        assert!(err.to_string().starts_with("queue_interval ("));
    }

    #[test]
    fn test_validate_rejects_long_reply_delay_before_range_check() {
        let settings = SessionSettings {
            reply_delay_max: MAX_DELAY + Duration::from_secs(1),
            ..SessionSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::DelayTooLong {
                field: "reply_delay_max",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_accepts_maximum_delay() {
        let settings = SessionSettings {
            connect_delay: MAX_DELAY,
            queue_interval: MAX_DELAY,
            reply_delay_min: MAX_DELAY,
            reply_delay_max: MAX_DELAY,
            ..SessionSettings::default()
        };
        assert!(settings.validate().is_ok());
    }
}
