//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! the retry and transport constants used across the bot.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// Comma-separated list of administrator user IDs
    #[serde(rename = "admin_ids")]
    pub admin_ids_str: Option<String>,

    /// `OpenRouter` API key
    pub openrouter_api_key: Option<String>,
    /// Model used for translation and explanation
    #[serde(default = "default_openrouter_model")]
    pub openrouter_model: String,
    /// Site URL for `OpenRouter` identification
    #[serde(default)]
    pub openrouter_site_url: String,
    /// Site name for `OpenRouter` identification
    #[serde(default = "default_openrouter_site_name")]
    pub openrouter_site_name: String,

    /// Whether non-admin traffic is accepted at startup
    #[serde(default = "default_bot_active")]
    pub bot_active: bool,

    /// Retries after the first failed translation attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed wait between translation attempts, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

fn default_openrouter_model() -> String {
    DEFAULT_OPENROUTER_MODEL.to_string()
}

fn default_openrouter_site_name() -> String {
    "Thai-Myanmar Translator Bot".to_string()
}

const fn default_bot_active() -> bool {
    true
}

const fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

const fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

/// Build the layered configuration source shared by all settings loaders.
///
/// # Errors
///
/// Returns a `ConfigError` if a present config file cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP__MAX_RETRIES=3 ./target/app`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Bare UPPER_SNAKE_CASE variables map onto snake_case keys
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use relay_translator::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }

    /// Returns the set of Telegram IDs that bypass the availability flag
    #[must_use]
    pub fn admin_ids(&self) -> HashSet<i64> {
        parse_id_list(self.admin_ids_str.as_deref())
    }

    /// Retry policy applied to every translation request
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

/// Parses a list of user IDs separated by commas, semicolons or whitespace.
/// Tokens that are not valid integers are skipped.
#[must_use]
pub fn parse_id_list(raw: Option<&str>) -> HashSet<i64> {
    raw.map(|s| {
        s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .filter_map(|id| id.parse::<i64>().ok())
            .collect()
    })
    .unwrap_or_default()
}

/// Bounded retry configuration for backend translation calls.
///
/// A request makes at most `max_retries + 1` backend calls and waits
/// `delay` between consecutive calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Fixed wait between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Total number of backend calls a single dispatch may make
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

/// Default number of retries after a failed translation
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Default wait between translation attempts (seconds)
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 10;

/// Default `OpenRouter` model
pub const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.0-flash-001";
/// `OpenRouter` chat completions endpoint
pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Sampling temperature for translations
pub const TRANSLATION_TEMPERATURE: f32 = 0.3;
/// Sampling temperature for explanations
pub const EXPLANATION_TEMPERATURE: f32 = 0.5;
/// Output token cap for backend calls
pub const BACKEND_MAX_TOKENS: u32 = 2000;

/// System prompt for the translation call
pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a professional Thai-Myanmar translator. \
If the user writes in Thai, translate it into Myanmar (Burmese). \
If the user writes in Myanmar, translate it into Thai. \
For any other language, translate it into both Thai and Myanmar. \
Reply with the translation only, followed by a Thai romanized pronunciation line when the output contains Thai.";

/// System prompt for the explanation call
pub const EXPLANATION_SYSTEM_PROMPT: &str = "You are a patient Thai language teacher for Myanmar speakers. \
Explain the given sentence in Myanmar (Burmese): word-by-word meaning, grammar notes, \
politeness level and one or two similar example sentences with translations. \
Use short paragraphs and bullet points.";

/// Default HTTP timeout for backend requests (seconds)
pub const LLM_HTTP_TIMEOUT_SECS: u64 = 60;

/// Get backend HTTP timeout from env or default.
///
/// Environment variable: `LLM_HTTP_TIMEOUT_SECS`.
#[must_use]
pub fn get_llm_http_timeout_secs() -> u64 {
    std::env::var("LLM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LLM_HTTP_TIMEOUT_SECS)
}

// Telegram API retry configuration
/// Maximum retries for Telegram send operations
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// Initial backoff for Telegram send retries (ms)
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for Telegram send backoff (ms)
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;
