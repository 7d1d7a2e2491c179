/// Administrator panel
pub mod admin;
/// Command, message and callback handlers
pub mod handlers;
/// Splitting and escaping of backend replies
pub mod messaging;
/// Typing and notice indicators
pub mod progress;
/// Telegram calls with retry
pub mod resilient;
/// Texts, keyboards and callback tokens
pub mod views;
