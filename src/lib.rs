#![deny(missing_docs)]
//! Relay translator core library.
//!
//! Thai/Myanmar translation relay: availability gate, per-user conversation
//! state, bounded-retry dispatch and follow-up explanations.

/// Voice message conversion.
pub mod audio;
/// Telegram transport.
pub mod bot;
/// Configuration management.
pub mod config;
/// Translation backend and reply classification.
pub mod llm;
/// Log redaction and subscriber setup.
pub mod logging;
/// Gate, conversation state, dispatcher and follow-up handler.
pub mod relay;
/// Utility functions.
pub mod utils;
