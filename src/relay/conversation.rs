use super::UserId;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Latest successfully translated request of one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSlot {
    /// User who sent the request
    pub requester_id: UserId,
    /// Original request text
    pub query_text: String,
}

/// Per-user single-slot memory backing the "explain further" action.
///
/// Each user has at most one slot. Writes overwrite, and when two requests
/// from the same user finish concurrently the last write wins. Slots live
/// for the lifetime of the process.
#[derive(Default)]
pub struct ConversationState {
    slots: RwLock<HashMap<UserId, ConversationSlot>>,
}

impl ConversationState {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `query_text` as the latest request of `user_id`
    pub async fn put(&self, user_id: UserId, query_text: impl Into<String>) {
        let slot = ConversationSlot {
            requester_id: user_id,
            query_text: query_text.into(),
        };
        self.slots.write().await.insert(user_id, slot);
    }

    /// Returns the latest slot written for `user_id`, if any
    pub async fn get(&self, user_id: UserId) -> Option<ConversationSlot> {
        self.slots.read().await.get(&user_id).cloned()
    }

    /// Number of users with a stored slot
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Returns `true` if no user has a stored slot
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_user() {
        let state = ConversationState::new();
        assert_eq!(state.get(1).await, None);
        assert!(state.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let state = ConversationState::new();
        state.put(1, "hello").await;

        let slot = state.get(1).await;
        assert_eq!(
            slot,
            Some(ConversationSlot {
                requester_id: 1,
                query_text: "hello".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_slot() {
        let state = ConversationState::new();
        state.put(1, "first").await;
        state.put(1, "second").await;

        assert_eq!(state.len().await, 1);
        assert_eq!(
            state.get(1).await.map(|s| s.query_text),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let state = ConversationState::new();
        state.put(1, "mine").await;
        state.put(2, "yours").await;

        assert_eq!(state.get(1).await.map(|s| s.requester_id), Some(1));
        assert_eq!(state.get(2).await.map(|s| s.query_text), Some("yours".to_string()));
    }
}
