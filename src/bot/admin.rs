//! Administrator panel for the availability flag.

use crate::bot::handlers::get_user_id_safe;
use crate::bot::resilient::{edit_message_resilient, send_message_resilient};
use crate::bot::views;
use crate::relay::AvailabilityGate;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};

/// `/admin` command: show the panel with the current status.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn admin_panel(bot: Bot, msg: Message, gate: Arc<AvailabilityGate>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    if !gate.is_admin(user_id) {
        warn!("Non-admin {user_id} requested the admin panel.");
        send_message_resilient(&bot, msg.chat.id, views::ACCESS_DENIED, None).await?;
        return Ok(());
    }

    send_message_resilient(
        &bot,
        msg.chat.id,
        views::admin_panel(gate.is_active()),
        Some(views::admin_keyboard()),
    )
    .await?;
    Ok(())
}

/// Handle `admin_enable` / `admin_disable` button presses.
///
/// # Errors
///
/// Returns an error if Telegram API calls fail.
pub async fn handle_admin_callback(
    bot: Bot,
    q: CallbackQuery,
    gate: Arc<AvailabilityGate>,
) -> Result<()> {
    let user_id = q.from.id.0.cast_signed();
    if !gate.is_admin(user_id) {
        warn!("Non-admin {user_id} pressed an admin button.");
        let _ = bot
            .answer_callback_query(q.id.clone())
            .text(views::ACCESS_DENIED)
            .await;
        return Ok(());
    }

    let active = match q.data.as_deref() {
        Some(views::ADMIN_CALLBACK_ENABLE) => true,
        Some(views::ADMIN_CALLBACK_DISABLE) => false,
        _ => {
            let _ = bot.answer_callback_query(q.id.clone()).await;
            return Ok(());
        }
    };

    let previous = gate.set_active(active);
    info!(user_id, previous, active, "Availability changed from admin panel");
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let message = q
        .message
        .as_ref()
        .ok_or_else(|| anyhow!("Admin callback without message"))?;
    edit_message_resilient(
        &bot,
        message.chat().id,
        message.id(),
        views::admin_panel(active),
        views::admin_keyboard(),
    )
    .await
}
