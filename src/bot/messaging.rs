//! Reply helpers for backend output.

use crate::bot::resilient::send_message_resilient;
use crate::utils;
use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup};

/// Maximum message length for Telegram with safety margin.
/// Telegram's official limit is 4096; HTML entities inflate the text.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;

/// Splits raw backend text, escapes each part for HTML and sends the parts in order.
///
/// `prefix` (already HTML) is prepended to the first part and `markup` is
/// attached to the last one so buttons always sit under the end of the reply.
///
/// # Errors
///
/// Returns an error if any part fails to send after retries.
pub async fn send_backend_text(
    bot: &Bot,
    chat_id: ChatId,
    prefix: Option<&str>,
    text: &str,
    markup: Option<InlineKeyboardMarkup>,
) -> Result<()> {
    let parts = render_parts(prefix, text);
    let last = parts.len().saturating_sub(1);

    for (i, part) in parts.into_iter().enumerate() {
        let part_markup = if i == last { markup.clone() } else { None };
        send_message_resilient(bot, chat_id, part, part_markup).await?;
    }

    Ok(())
}

fn render_parts(prefix: Option<&str>, text: &str) -> Vec<String> {
    // Escaping can grow the text, so split with room for entities and the prefix
    let budget = TELEGRAM_MESSAGE_LIMIT / 2;
    let mut parts: Vec<String> = utils::split_long_message(text, budget)
        .iter()
        .map(|part| utils::escape_html(part))
        .collect();

    if parts.is_empty() {
        parts.push(String::new());
    }
    if let Some(prefix) = prefix {
        parts[0] = format!("{prefix}{}", parts[0]);
    }
    parts
}
