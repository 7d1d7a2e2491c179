//! Backend client for translation and explanation
//!
//! The relay pipeline talks to the text-generation service only through
//! [`TranslationBackend`]. Raw provider output is turned into a typed
//! [`BackendReply`] by [`classify`] before any retry decision is made.

/// HTTP request helpers shared by providers
pub mod http_utils;
/// Implementations of specific backend providers
pub mod providers;
mod reply;

pub use reply::{classify, BackendReply, FailureReason, SENTINEL_MARKERS};

use thiserror::Error;

/// Errors that can occur while talking to the backend
#[derive(Debug, Error)]
pub enum LlmError {
    /// Error returned by the provider's API
    #[error("API error: {0}")]
    ApiError(String),
    /// Error during network communication
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Error during JSON serialization or deserialization
    #[error("JSON error: {0}")]
    JsonError(String),
    /// Missing provider configuration or API key
    #[error("Missing client/API key: {0}")]
    MissingConfig(String),
    /// The backend task was aborted before producing a result
    #[error("Backend task failed: {0}")]
    TaskFailed(String),
}

/// Text-in, text-out interface to the translation service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate user text between Thai and Myanmar
    async fn translate(&self, text: &str) -> Result<String, LlmError>;

    /// Produce a detailed explanation of previously translated text
    async fn explain(&self, text: &str) -> Result<String, LlmError>;
}
