use super::{ConversationState, ProgressSink, UserId};
use crate::llm::{LlmError, TranslationBackend};
use std::sync::Arc;
use tracing::info;

/// User-visible result of an "explain further" action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowupOutcome {
    /// Explanation of the stored query
    Explained(String),
    /// The acting user did not send the stored query
    NotOwner,
    /// Nothing has been translated for this follow-up yet
    NoPriorQuery,
}

/// Serves follow-up explanations from the conversation store.
///
/// The stored slot is only read, so repeating a follow-up asks the
/// backend again with the same text.
pub struct FollowupHandler {
    backend: Arc<dyn TranslationBackend>,
    state: Arc<ConversationState>,
}

impl FollowupHandler {
    /// Create a handler reading from `state`
    #[must_use]
    pub fn new(backend: Arc<dyn TranslationBackend>, state: Arc<ConversationState>) -> Self {
        Self { backend, state }
    }

    /// Explain the latest query stored for `owner_id` on behalf of `acting_user_id`.
    ///
    /// `owner_id` identifies the user whose translation carried the follow-up
    /// button. Ownership is checked before the stored slot, so a stranger
    /// gets [`FollowupOutcome::NotOwner`] even when nothing is stored. Only
    /// the stored requester may act on a slot. `progress` is
    /// signalled once the request is accepted, before the backend call.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the explanation call fails.
    pub async fn handle_followup(
        &self,
        acting_user_id: UserId,
        owner_id: UserId,
        progress: &dyn ProgressSink,
    ) -> Result<FollowupOutcome, LlmError> {
        if acting_user_id != owner_id {
            info!(
                acting_user_id,
                owner_id,
                "Follow-up rejected: button belongs to another user"
            );
            return Ok(FollowupOutcome::NotOwner);
        }

        let Some(slot) = self.state.get(owner_id).await else {
            return Ok(FollowupOutcome::NoPriorQuery);
        };

        if slot.requester_id != acting_user_id {
            info!(
                acting_user_id,
                requester_id = slot.requester_id,
                "Follow-up rejected: not the original requester"
            );
            return Ok(FollowupOutcome::NotOwner);
        }

        progress.working().await;

        // A panicking backend surfaces as TaskFailed
        let backend = Arc::clone(&self.backend);
        let query = slot.query_text;
        let explanation = tokio::spawn(async move { backend.explain(&query).await })
            .await
            .map_err(|e| LlmError::TaskFailed(e.to_string()))??;

        Ok(FollowupOutcome::Explained(explanation))
    }
}
