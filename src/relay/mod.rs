//! Request-processing pipeline
//!
//! Transport-agnostic: the Telegram layer feeds user ids and text in and
//! renders the returned outcomes.

mod conversation;
mod dispatcher;
mod followup;
mod gate;

pub use conversation::{ConversationSlot, ConversationState};
pub use dispatcher::{DispatchOutcome, ProgressSink, RequestDispatcher};
pub use followup::{FollowupHandler, FollowupOutcome};
pub use gate::AvailabilityGate;

/// Chat participant identifier (Telegram user id)
pub type UserId = i64;
