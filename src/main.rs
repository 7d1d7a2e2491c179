use dotenvy::dotenv;
use relay_translator::bot::handlers::{self, Command};
use relay_translator::bot::{admin, views};
use relay_translator::config::Settings;
use relay_translator::llm::providers::OpenRouterProvider;
use relay_translator::llm::TranslationBackend;
use relay_translator::logging::{init_logging, Redactor};
use relay_translator::relay::{
    AvailabilityGate, ConversationState, FollowupHandler, RequestDispatcher,
};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Initialize redaction patterns early (before logging)
    let redactor = Arc::new(Redactor::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(redactor);

    info!("Starting Thai-Myanmar relay translator...");

    let settings = init_settings();
    let backend = init_backend(&settings);

    let state = Arc::new(ConversationState::new());
    let gate = Arc::new(AvailabilityGate::new(
        settings.bot_active,
        settings.admin_ids(),
    ));
    let dispatcher = Arc::new(RequestDispatcher::new(
        backend.clone(),
        state.clone(),
        gate.clone(),
        settings.retry_policy(),
    ));
    let followup = Arc::new(FollowupHandler::new(backend, state));

    info!(
        active = gate.is_active(),
        admins = settings.admin_ids().len(),
        max_retries = settings.max_retries,
        retry_delay_secs = settings.retry_delay_secs,
        "Relay initialized."
    );

    let bot = Bot::new(settings.telegram_token.clone());
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![settings, gate, dispatcher, followup])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_backend(settings: &Settings) -> Arc<dyn TranslationBackend> {
    match OpenRouterProvider::from_settings(settings) {
        Ok(provider) => {
            info!("OpenRouter backend initialized ({}).", settings.openrouter_model);
            Arc::new(provider)
        }
        Err(e) => {
            error!("Failed to initialize translation backend: {}", e);
            std::process::exit(1);
        }
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_callback_query()
                .branch(
                    dptree::filter(|q: CallbackQuery| {
                        q.data.as_deref().is_some_and(views::is_admin_callback)
                    })
                    .endpoint(handle_admin_callback),
                )
                .branch(dptree::endpoint(handle_followup_callback)),
        )
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(
                    dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text),
                )
                .branch(
                    dptree::filter(|msg: Message| msg.voice().is_some()).endpoint(handle_voice),
                ),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    gate: Arc<AvailabilityGate>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => handlers::start(bot, msg).await,
        Command::Admin => admin::admin_panel(bot, msg, gate).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<RequestDispatcher>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_text(bot, msg, dispatcher).await {
        error!("Text handler error: {}", e);
    }
    respond(())
}

async fn handle_voice(
    bot: Bot,
    msg: Message,
    gate: Arc<AvailabilityGate>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_voice(bot, msg, gate).await {
        error!("Voice handler error: {}", e);
    }
    respond(())
}

async fn handle_followup_callback(
    bot: Bot,
    q: CallbackQuery,
    followup: Arc<FollowupHandler>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_followup_callback(bot, q, followup).await {
        error!("Callback handler error: {}", e);
    }
    respond(())
}

async fn handle_admin_callback(
    bot: Bot,
    q: CallbackQuery,
    gate: Arc<AvailabilityGate>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = admin::handle_admin_callback(bot, q, gate).await {
        error!("Admin callback error: {}", e);
    }
    respond(())
}
