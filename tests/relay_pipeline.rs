use async_trait::async_trait;
use relay_translator::config::{RetryPolicy, Settings};
use relay_translator::llm::{LlmError, TranslationBackend};
use relay_translator::relay::{
    AvailabilityGate, ConversationState, DispatchOutcome, FollowupHandler, FollowupOutcome,
    ProgressSink, RequestDispatcher,
};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Backend that replays scripted translation replies and echoes explanations
#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    translate_calls: AtomicUsize,
    explain_calls: AtomicUsize,
}

impl ScriptedBackend {
    fn with_replies(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }
}

#[async_trait]
impl TranslationBackend for ScriptedBackend {
    async fn translate(&self, _text: &str) -> Result<String, LlmError> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .map_err(|_| LlmError::TaskFailed("poisoned".to_string()))?
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::ApiError("script exhausted".to_string())))
    }

    async fn explain(&self, text: &str) -> Result<String, LlmError> {
        self.explain_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("explained: {text}"))
    }
}

#[derive(Default)]
struct CountingProgress(AtomicUsize);

#[async_trait]
impl ProgressSink for CountingProgress {
    async fn working(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Relay {
    backend: Arc<ScriptedBackend>,
    state: Arc<ConversationState>,
    dispatcher: RequestDispatcher,
    followup: FollowupHandler,
}

fn relay(replies: Vec<Result<String, LlmError>>, max_retries: u32) -> Relay {
    relay_with_gate(
        replies,
        max_retries,
        AvailabilityGate::new(true, HashSet::new()),
    )
}

fn relay_with_gate(
    replies: Vec<Result<String, LlmError>>,
    max_retries: u32,
    gate: AvailabilityGate,
) -> Relay {
    let backend = ScriptedBackend::with_replies(replies);
    let state = Arc::new(ConversationState::new());
    let policy = RetryPolicy {
        max_retries,
        delay: Duration::from_secs(10),
    };
    let dispatcher =
        RequestDispatcher::new(backend.clone(), state.clone(), Arc::new(gate), policy);
    let followup = FollowupHandler::new(backend.clone(), state.clone());
    Relay {
        backend,
        state,
        dispatcher,
        followup,
    }
}

#[tokio::test(start_paused = true)]
async fn translation_then_owner_followup() {
    let relay = relay(vec![Ok("สวัสดี".to_string())], 2);
    let progress = CountingProgress::default();

    let outcome = relay.dispatcher.dispatch(100, "hello", &progress).await;
    assert_eq!(outcome, DispatchOutcome::Translated("สวัสดี".to_string()));

    let slot = relay.state.get(100).await.expect("slot stored");
    assert_eq!(slot.requester_id, 100);
    assert_eq!(slot.query_text, "hello");

    let notice = CountingProgress::default();
    let explained = relay
        .followup
        .handle_followup(100, 100, &notice)
        .await
        .expect("explanation");
    assert_eq!(
        explained,
        FollowupOutcome::Explained("explained: hello".to_string())
    );
    assert_eq!(notice.0.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn sentinel_replies_exhaust_retries() {
    let relay = relay(
        vec![
            Ok("ระบบมีปัญหา".to_string()),
            Ok("Error: upstream".to_string()),
            Ok("ระบบมีปัญหา ลองใหม่".to_string()),
        ],
        2,
    );
    let progress = CountingProgress::default();

    let outcome = relay.dispatcher.dispatch(7, "hello", &progress).await;

    assert_eq!(outcome, DispatchOutcome::TransientFailure);
    assert_eq!(relay.backend.translate_calls.load(Ordering::SeqCst), 3);
    assert_eq!(progress.0.load(Ordering::SeqCst), 3);
    assert!(relay.state.get(7).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn followup_from_other_user_is_rejected() {
    let relay = relay(vec![Ok("ok".to_string())], 0);
    relay
        .dispatcher
        .dispatch(1, "query from A", &CountingProgress::default())
        .await;

    let notice = CountingProgress::default();
    let outcome = relay
        .followup
        .handle_followup(2, 1, &notice)
        .await
        .expect("no backend call");

    assert_eq!(outcome, FollowupOutcome::NotOwner);
    assert_eq!(relay.backend.explain_calls.load(Ordering::SeqCst), 0);
    assert_eq!(notice.0.load(Ordering::SeqCst), 0);
    assert_eq!(
        relay.state.get(1).await.map(|s| s.query_text),
        Some("query from A".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn followup_is_repeatable() {
    let relay = relay(vec![Ok("ok".to_string())], 0);
    relay
        .dispatcher
        .dispatch(5, "same text", &CountingProgress::default())
        .await;

    for _ in 0..2 {
        let outcome = relay
            .followup
            .handle_followup(5, 5, &CountingProgress::default())
            .await
            .expect("explanation");
        assert_eq!(
            outcome,
            FollowupOutcome::Explained("explained: same text".to_string())
        );
    }
    assert_eq!(relay.backend.explain_calls.load(Ordering::SeqCst), 2);
    assert_eq!(relay.state.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn followup_without_query() {
    let relay = relay(Vec::new(), 0);
    let outcome = relay
        .followup
        .handle_followup(9, 9, &CountingProgress::default())
        .await
        .expect("no backend call");
    assert_eq!(outcome, FollowupOutcome::NoPriorQuery);
}

#[tokio::test(start_paused = true)]
async fn newest_success_wins() {
    let relay = relay(vec![Ok("one".to_string()), Ok("two".to_string())], 0);
    let progress = CountingProgress::default();

    relay.dispatcher.dispatch(3, "first", &progress).await;
    relay.dispatcher.dispatch(3, "second", &progress).await;

    assert_eq!(
        relay.state.get(3).await.map(|s| s.query_text),
        Some("second".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn maintenance_refuses_before_backend() {
    let relay = relay_with_gate(
        vec![Ok("สวัสดี".to_string())],
        2,
        AvailabilityGate::new(false, HashSet::from([42])),
    );
    let progress = CountingProgress::default();

    let outcome = relay.dispatcher.dispatch(7, "hello", &progress).await;

    assert_eq!(outcome, DispatchOutcome::Maintenance);
    assert_eq!(relay.backend.translate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(progress.0.load(Ordering::SeqCst), 0);
    assert!(relay.state.get(7).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn admin_translates_during_maintenance() {
    let relay = relay_with_gate(
        vec![Ok("สวัสดี".to_string())],
        2,
        AvailabilityGate::new(false, HashSet::from([42])),
    );

    let outcome = relay
        .dispatcher
        .dispatch(42, "hello", &CountingProgress::default())
        .await;

    assert_eq!(outcome, DispatchOutcome::Translated("สวัสดี".to_string()));
    assert_eq!(relay.backend.translate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn followup_from_stranger_without_state_is_rejected() {
    let relay = relay(Vec::new(), 0);

    let outcome = relay
        .followup
        .handle_followup(2, 1, &CountingProgress::default())
        .await
        .expect("no backend call");

    assert_eq!(outcome, FollowupOutcome::NotOwner);
    assert_eq!(relay.backend.explain_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn maintenance_gate_blocks_everyone_but_admins() {
    let gate = AvailabilityGate::new(false, HashSet::from([42]));

    assert!(!gate.allow(1));
    assert!(gate.allow(42));

    gate.set_active(true);
    assert!(gate.allow(1));
}

#[test]
fn gate_built_from_settings() {
    let settings = Settings {
        telegram_token: "dummy".to_string(),
        admin_ids_str: Some("42, 43".to_string()),
        openrouter_api_key: None,
        openrouter_model: "test/model".to_string(),
        openrouter_site_url: String::new(),
        openrouter_site_name: "Relay Translator".to_string(),
        bot_active: false,
        max_retries: 2,
        retry_delay_secs: 10,
    };

    let gate = AvailabilityGate::new(settings.bot_active, settings.admin_ids());
    assert!(gate.is_admin(43));
    assert!(!gate.allow(44));
    assert_eq!(settings.retry_policy().max_attempts(), 3);
}
