//! Text helpers for Telegram replies and retry wrappers for Telegram API calls.

use anyhow::Result;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

/// Escapes backend text for Telegram's HTML parse mode.
///
/// # Examples
///
/// ```
/// use relay_translator::utils::escape_html;
/// assert_eq!(escape_html("1 < 2 & <b>"), "1 &lt; 2 &amp; &lt;b&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Splits a message into parts of at most `max_chars` characters.
///
/// Prefers line boundaries; a single line longer than the limit is cut on
/// grapheme cluster boundaries so multi-codepoint characters (Thai and
/// Myanmar combining marks, emoji) are never broken.
///
/// # Examples
///
/// ```
/// use relay_translator::utils::split_long_message;
/// let long_msg = "A very long message...\n".repeat(300);
/// let parts = split_long_message(&long_msg, 4000);
/// assert!(parts.len() > 1);
/// ```
#[must_use]
pub fn split_long_message(message: &str, max_chars: usize) -> Vec<String> {
    if message.is_empty() || max_chars == 0 {
        return Vec::new();
    }
    if message.chars().count() <= max_chars {
        return vec![message.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in message.lines() {
        let line_len = line.chars().count();

        if line_len > max_chars {
            if !current.is_empty() {
                parts.push(current.trim_end().to_string());
                current.clear();
                current_len = 0;
            }
            for grapheme in line.graphemes(true) {
                let g_len = grapheme.chars().count();
                if current_len + g_len > max_chars {
                    parts.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push_str(grapheme);
                current_len += g_len;
            }
            current.push('\n');
            current_len += 1;
            continue;
        }

        // +1 for the newline
        if current_len + line_len + 1 > max_chars && !current.is_empty() {
            parts.push(current.trim_end().to_string());
            current.clear();
            current_len = 0;
        }
        current.push_str(line);
        current.push('\n');
        current_len += line_len + 1;
    }

    let tail = current.trim_end();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts
}

/// Safely truncates a string to a maximum character length (not bytes).
///
/// # Examples
///
/// ```
/// use relay_translator::utils::truncate_str;
/// assert_eq!(truncate_str("สวัสดีครับ", 6), "สวัสดี");
/// ```
pub fn truncate_str(s: impl AsRef<str>, max_chars: usize) -> String {
    let s = s.as_ref();
    s.char_indices()
        .nth(max_chars)
        .map_or_else(|| s.to_string(), |(pos, _)| s[..pos].to_string())
}

/// Retry a Telegram API operation with exponential backoff and jitter.
///
/// Backoff starts at `TELEGRAM_API_INITIAL_BACKOFF_MS`, is capped at
/// `TELEGRAM_API_MAX_BACKOFF_MS` and gives up after `TELEGRAM_API_MAX_RETRIES`
/// retries, returning the last error.
///
/// # Errors
///
/// Returns the last error produced by `operation`.
pub async fn retry_telegram_operation<F, Fut, T>(operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    use crate::config::{
        TELEGRAM_API_INITIAL_BACKOFF_MS, TELEGRAM_API_MAX_BACKOFF_MS, TELEGRAM_API_MAX_RETRIES,
    };

    let retry_strategy = ExponentialBackoff::from_millis(TELEGRAM_API_INITIAL_BACKOFF_MS)
        .max_delay(Duration::from_millis(TELEGRAM_API_MAX_BACKOFF_MS))
        .map(jitter)
        .take(TELEGRAM_API_MAX_RETRIES);

    Retry::spawn(retry_strategy, operation).await.map_err(|e| {
        warn!(
            "Telegram API operation failed after {} retries: {}",
            TELEGRAM_API_MAX_RETRIES, e
        );
        e
    })
}
