//! Canned agent replies with randomized delays.
//!
//! The random source is injected so runs can be made reproducible with a
//! seed; see [`rng_from_seed`].

use crate::chat::settings::{SessionSettings, SettingsError};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use std::time::Duration;

/// One scheduled agent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedReply {
    /// Text drawn from the canned set.
    pub content: String,
    /// How long the agent "types" before the reply lands.
    pub delay: Duration,
}

/// Picks a canned reply and a delay for each accepted user message.
pub struct ResponseGenerator {
    responses: Vec<String>,
    delay_min: Duration,
    delay_max: Duration,
    rng: Box<dyn RngCore + Send>,
}

impl fmt::Debug for ResponseGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseGenerator")
            .field("responses", &self.responses.len())
            .field("delay_min", &self.delay_min)
            .field("delay_max", &self.delay_max)
            .finish_non_exhaustive()
    }
}

impl ResponseGenerator {
    /// Creates a generator over `responses` with delays in `[delay_min, delay_max]`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoCannedResponses`] for an empty set and
    /// [`SettingsError::InvertedReplyDelay`] when `delay_min > delay_max`.
    pub fn new(
        responses: Vec<String>,
        delay_min: Duration,
        delay_max: Duration,
        rng: Box<dyn RngCore + Send>,
    ) -> Result<Self, SettingsError> {
        if responses.is_empty() {
            return Err(SettingsError::NoCannedResponses);
        }
        if delay_min > delay_max {
            return Err(SettingsError::InvertedReplyDelay {
                min: delay_min,
                max: delay_max,
            });
        }
        Ok(Self {
            responses,
            delay_min,
            delay_max,
            rng,
        })
    }

    /// Builds a generator from session settings.
    pub fn from_settings(
        settings: &SessionSettings,
        rng: Box<dyn RngCore + Send>,
    ) -> Result<Self, SettingsError> {
        Self::new(
            settings.canned_responses.clone(),
            settings.reply_delay_min,
            settings.reply_delay_max,
            rng,
        )
    }

    /// Draws the next reply: content uniform over the set, delay uniform
    /// over the configured range at millisecond resolution.
    pub fn next_reply(&mut self) -> CannedReply {
        let index = self.rng.gen_range(0..self.responses.len());
        let min_ms = u64::try_from(self.delay_min.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.delay_max.as_millis()).unwrap_or(u64::MAX);
        let delay_ms = self.rng.gen_range(min_ms..=max_ms);
        CannedReply {
            content: self.responses[index].clone(),
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

/// Returns a seeded generator when `seed` is given, an entropy-seeded one otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> Box<dyn RngCore + Send> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_entropy()),
    }
}
