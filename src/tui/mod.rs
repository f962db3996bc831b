//! Terminal chat for the CloudTech support simulator.
//!
//! Provides a terminal user interface built on ratatui and crossterm that
//! renders a live [`SupportSession`](crate::chat::SupportSession) and feeds
//! typed messages back into it.

pub mod app;
pub mod event;
pub mod ui;

#[cfg(test)]
mod test_utils;
