use crate::audio::convert_ogg_to_mp3;
use crate::bot::messaging::send_backend_text;
use crate::bot::progress::{PendingNotice, TypingIndicator};
use crate::bot::resilient::send_message_resilient;
use crate::bot::views::{self, followup_keyboard, parse_followup_token};
use crate::relay::{
    AvailabilityGate, DispatchOutcome, FollowupHandler, FollowupOutcome, RequestDispatcher,
};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use teloxide::{net::Download, prelude::*, types::Voice, utils::command::BotCommands};
use tracing::{error, info};

/// Supported commands for the bot
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Start the bot.")]
    Start,
    /// Show the availability panel (administrators only)
    #[command(description = "Admin panel.")]
    Admin,
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
#[must_use]
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Start handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    info!("User {} initiated /start command.", get_user_id_safe(&msg));
    send_message_resilient(&bot, msg.chat.id, views::WELCOME, None).await?;
    Ok(())
}

/// Translate an incoming text message.
///
/// Maintenance refusals come back from the dispatcher and are rendered here.
///
/// # Errors
///
/// Returns an error if a reply cannot be sent.
pub async fn handle_text(bot: Bot, msg: Message, dispatcher: Arc<RequestDispatcher>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let text = msg.text().unwrap_or_default().trim();
    if text.is_empty() {
        return Ok(());
    }

    let typing = TypingIndicator::new(bot.clone(), msg.chat.id);
    match dispatcher.dispatch(user_id, text, &typing).await {
        DispatchOutcome::Translated(translation) => {
            send_backend_text(
                &bot,
                msg.chat.id,
                None,
                &translation,
                Some(followup_keyboard(user_id)),
            )
            .await?;
        }
        DispatchOutcome::TransientFailure => {
            send_message_resilient(&bot, msg.chat.id, views::TRANSIENT_FAILURE, None).await?;
        }
        DispatchOutcome::Maintenance => {
            send_message_resilient(&bot, msg.chat.id, views::MAINTENANCE, None).await?;
        }
    }
    Ok(())
}

/// Handle a voice message.
///
/// The audio is downloaded and converted, but voice translation is switched
/// off, so the user is always told to send text instead.
///
/// # Errors
///
/// Returns an error if a reply cannot be sent.
pub async fn handle_voice(bot: Bot, msg: Message, gate: Arc<AvailabilityGate>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);

    if !gate.admit(user_id, "voice") {
        send_message_resilient(&bot, msg.chat.id, views::MAINTENANCE, None).await?;
        return Ok(());
    }

    let Some(voice) = msg.voice() else {
        send_message_resilient(&bot, msg.chat.id, views::VOICE_MISSING, None).await?;
        return Ok(());
    };

    send_message_resilient(&bot, msg.chat.id, views::VOICE_RECEIVED, None).await?;

    match convert_voice(&bot, voice).await {
        Ok(converted) => {
            info!(user_id, converted, "Voice message converted; voice translation disabled");
            send_message_resilient(&bot, msg.chat.id, views::VOICE_DISABLED, None).await?;
        }
        Err(e) => {
            // Details stay in the log; the user only gets a generic notice
            error!(user_id, "Voice handling failed: {e:#}");
            send_message_resilient(&bot, msg.chat.id, views::VOICE_ERROR, None).await?;
        }
    }
    Ok(())
}

async fn convert_voice(bot: &Bot, voice: &Voice) -> Result<bool> {
    let dir = tempfile::tempdir()?;
    let ogg_path = dir.path().join("voice.ogg");
    let mp3_path = dir.path().join("voice.mp3");

    let file = crate::utils::retry_telegram_operation(|| async {
        bot.get_file(voice.file.id.clone())
            .await
            .map_err(|e| anyhow!("Failed to get file: {e}"))
    })
    .await?;

    let mut dst = tokio::fs::File::create(&ogg_path).await?;
    bot.download_file(&file.path, &mut dst).await?;

    Ok(convert_ogg_to_mp3(&ogg_path, &mp3_path).await)
}

/// Handle the "explain further" inline button.
///
/// Callbacks in the admin namespace are ignored here; they are routed to
/// [`crate::bot::admin::handle_admin_callback`].
///
/// # Errors
///
/// Returns an error if Telegram API calls fail.
pub async fn handle_followup_callback(
    bot: Bot,
    q: CallbackQuery,
    followup: Arc<FollowupHandler>,
) -> Result<()> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    if views::is_admin_callback(data) {
        return Ok(());
    }

    let _ = bot.answer_callback_query(q.id.clone()).await;

    let acting_user_id = q.from.id.0.cast_signed();
    let Some(owner_id) = parse_followup_token(data, acting_user_id) else {
        return Ok(());
    };
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .ok_or_else(|| anyhow!("Callback message missing chat id"))?;

    let notice = PendingNotice::new(bot.clone(), chat_id, views::EXPLAINING);
    match followup
        .handle_followup(acting_user_id, owner_id, &notice)
        .await
    {
        Ok(FollowupOutcome::Explained(explanation)) => {
            send_backend_text(
                &bot,
                chat_id,
                Some(views::EXPLANATION_HEADER),
                &explanation,
                None,
            )
            .await?;
        }
        Ok(FollowupOutcome::NotOwner) => {
            send_message_resilient(&bot, chat_id, views::NOT_OWNER, None).await?;
        }
        Ok(FollowupOutcome::NoPriorQuery) => {
            send_message_resilient(&bot, chat_id, views::NO_PRIOR_QUERY, None).await?;
        }
        Err(e) => {
            error!(acting_user_id, "Explanation failed: {e}");
            send_message_resilient(&bot, chat_id, views::TRANSIENT_FAILURE, None).await?;
        }
    }
    Ok(())
}
