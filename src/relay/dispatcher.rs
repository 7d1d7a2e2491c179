use super::{AvailabilityGate, ConversationState, UserId};
use crate::config::RetryPolicy;
use crate::llm::{classify, BackendReply, TranslationBackend};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tracing::{error, info, warn};

/// Receives "still working" signals while a dispatch is in progress
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Tell the user that the request is being processed
    async fn working(&self);
}

/// User-visible result of a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Backend produced a translation; a follow-up may be offered
    Translated(String),
    /// Every attempt failed; the user gets the fixed "try again later" notice
    TransientFailure,
    /// The availability flag is off and the user is not an administrator
    Maintenance,
}

enum RetryState {
    Attempting(u32),
    Waiting { attempt: u32, delay: Duration },
    Exhausted { attempts: u32 },
}

/// Sends translation requests to the backend with bounded, fixed-delay retries
pub struct RequestDispatcher {
    backend: Arc<dyn TranslationBackend>,
    state: Arc<ConversationState>,
    gate: Arc<AvailabilityGate>,
    policy: RetryPolicy,
}

impl RequestDispatcher {
    /// Create a dispatcher that admits requests through `gate` and records
    /// successes in `state`
    #[must_use]
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        state: Arc<ConversationState>,
        gate: Arc<AvailabilityGate>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            state,
            gate,
            policy,
        }
    }

    /// Translate `input_text` for `user_id`.
    ///
    /// The availability gate is consulted first; a refused user gets
    /// [`DispatchOutcome::Maintenance`] without any progress signal or
    /// backend call. Otherwise makes at most [`RetryPolicy::max_attempts`]
    /// backend calls, sleeping the configured delay and re-signalling
    /// `progress` between them. On success the conversation slot of
    /// `user_id` is overwritten with `input_text`; on exhaustion the slot is
    /// left untouched.
    ///
    /// A running dispatch is not cancelled when the same user sends a newer
    /// message. Both run to completion and the slot keeps whichever
    /// succeeded last.
    pub async fn dispatch(
        &self,
        user_id: UserId,
        input_text: &str,
        progress: &dyn ProgressSink,
    ) -> DispatchOutcome {
        if !self.gate.admit(user_id, "text") {
            return DispatchOutcome::Maintenance;
        }

        progress.working().await;

        let max_attempts = self.policy.max_attempts();
        let mut delays = FixedInterval::new(self.policy.delay);
        let mut state = RetryState::Attempting(1);

        loop {
            state = match state {
                RetryState::Attempting(attempt) => {
                    match classify(self.backend.translate(input_text).await) {
                        BackendReply::Success(text) => {
                            self.state.put(user_id, input_text).await;
                            info!(user_id, attempt, "Translation delivered");
                            return DispatchOutcome::Translated(text);
                        }
                        BackendReply::Failure(reason) => {
                            warn!(user_id, attempt, "Translation attempt failed: {reason}");
                            match delays.next() {
                                Some(delay) if attempt < max_attempts => {
                                    RetryState::Waiting { attempt, delay }
                                }
                                _ => RetryState::Exhausted { attempts: attempt },
                            }
                        }
                    }
                }
                RetryState::Waiting { attempt, delay } => {
                    tokio::time::sleep(delay).await;
                    progress.working().await;
                    RetryState::Attempting(attempt + 1)
                }
                RetryState::Exhausted { attempts } => {
                    error!(user_id, attempts, "Translation failed after all retries");
                    return DispatchOutcome::TransientFailure;
                }
            };
        }
    }
}
