//! All Slack-specific functionality

pub mod bot;
pub mod client;

// Re-export main types for convenience
pub use bot::SlackBot;
pub use client::{ChatPlatform, SlackClient};
