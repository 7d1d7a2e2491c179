//! Telegram implementations of [`ProgressSink`].

use crate::bot::resilient::send_message_resilient;
use crate::relay::ProgressSink;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatId};
use tracing::debug;

/// Shows the "typing…" chat action
pub struct TypingIndicator {
    bot: Bot,
    chat_id: ChatId,
}

impl TypingIndicator {
    /// Create an indicator for `chat_id`
    pub const fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ProgressSink for TypingIndicator {
    async fn working(&self) {
        if let Err(e) = self
            .bot
            .send_chat_action(self.chat_id, ChatAction::Typing)
            .await
        {
            debug!("Failed to send typing action: {e}");
        }
    }
}

/// Posts a fixed text notice
pub struct PendingNotice {
    bot: Bot,
    chat_id: ChatId,
    text: &'static str,
}

impl PendingNotice {
    /// Create a notice that posts `text` into `chat_id`
    pub const fn new(bot: Bot, chat_id: ChatId, text: &'static str) -> Self {
        Self { bot, chat_id, text }
    }
}

#[async_trait]
impl ProgressSink for PendingNotice {
    async fn working(&self) {
        if let Err(e) = send_message_resilient(&self.bot, self.chat_id, self.text, None).await {
            debug!("Failed to send pending notice: {e}");
        }
    }
}
