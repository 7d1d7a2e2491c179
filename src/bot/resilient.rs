//! Telegram sends and edits with automatic retry on transient network failures.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, Message, MessageId, ParseMode};
use tracing::debug;

/// Send an HTML message with automatic retry on network failures.
///
/// Uses [`crate::utils::retry_telegram_operation`] with exponential backoff.
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
pub async fn send_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
    markup: Option<InlineKeyboardMarkup>,
) -> Result<Message> {
    let text = text.into();
    crate::utils::retry_telegram_operation(|| async {
        let mut req = bot
            .send_message(chat_id, text.clone())
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup.clone() {
            req = req.reply_markup(markup);
        }
        req.await
            .map_err(|e| anyhow::anyhow!("Telegram send error: {e}"))
    })
    .await
}

/// Edit an HTML message and its inline keyboard with automatic retry.
///
/// A "message is not modified" answer counts as success.
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
pub async fn edit_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    msg_id: MessageId,
    text: impl Into<String>,
    markup: InlineKeyboardMarkup,
) -> Result<()> {
    const ERROR_NOT_MODIFIED: &str = "message is not modified";

    let text = text.into();
    let result = crate::utils::retry_telegram_operation(|| async {
        bot.edit_message_text(chat_id, msg_id, text.clone())
            .parse_mode(ParseMode::Html)
            .reply_markup(markup.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Telegram edit error: {e}"))
    })
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if e.to_string().contains(ERROR_NOT_MODIFIED) => {
            debug!("Message update skipped: {e}");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
