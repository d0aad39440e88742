//! Integration tests for the dialogue orchestration flow.
//!
//! These tests drive the public `DialogueEngine` surface end to end
//! over the in-memory adapters: gathering questions, decline handling,
//! contradiction clarifications, cross-session carry-over, and the
//! session timeout sweep.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sahayak::adapters::{InMemoryContextStore, InMemoryOfflineQueue, UnavailableSpeech};
use sahayak::application::{
    DeviceIdentity, DialogueEngine, DialogueReply, EngineSettings, SessionLocks,
    SessionTimeoutSweeper, SyncStatusBoard, UtteranceInput,
};
use sahayak::domain::context::{ContextField, SessionContext};
use sahayak::domain::foundation::{DomainError, ErrorCode, SessionId, SessionStatus, UserId};
use sahayak::domain::sync::{ItemKind, NewQueuedItem, SyncState};
use sahayak::ports::{
    BusinessAdvisor, ContextStore, GuidanceKind, GuidanceResponse, OfflineQueue,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Advisor that records the contexts it was asked about.
struct RecordingAdvisor {
    contexts: Mutex<Vec<SessionContext>>,
}

impl RecordingAdvisor {
    fn new() -> Self {
        Self {
            contexts: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<SessionContext> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl BusinessAdvisor for RecordingAdvisor {
    async fn generate_guidance(
        &self,
        context: &SessionContext,
        _utterance: &str,
    ) -> Result<GuidanceResponse, DomainError> {
        self.contexts.lock().unwrap().push(context.clone());
        Ok(GuidanceResponse::new(
            "Keep your freshest stock at the front during the morning rush.",
            GuidanceKind::Market,
            0.85,
        ))
    }
}

struct Harness {
    engine: DialogueEngine,
    store: Arc<InMemoryContextStore>,
    queue: Arc<InMemoryOfflineQueue>,
    advisor: Arc<RecordingAdvisor>,
    board: Arc<SyncStatusBoard>,
    user_id: UserId,
}

impl Harness {
    fn new(online: bool) -> Self {
        Self::with_queue_capacity(online, 50)
    }

    fn with_queue_capacity(online: bool, capacity: usize) -> Self {
        let store = Arc::new(InMemoryContextStore::new());
        let queue = Arc::new(InMemoryOfflineQueue::new(capacity));
        let advisor = Arc::new(RecordingAdvisor::new());
        let board = Arc::new(SyncStatusBoard::new());
        if online {
            board.transition(SyncState::Detecting);
            board.transition(SyncState::Syncing);
            board.transition(SyncState::Idle);
        }

        let engine = DialogueEngine::new(
            store.clone(),
            queue.clone(),
            advisor.clone(),
            Arc::new(UnavailableSpeech::new()),
            Arc::new(DeviceIdentity::new()),
            Arc::new(SessionLocks::new()),
            board.clone(),
            EngineSettings::default(),
        );
        Self {
            engine,
            store,
            queue,
            advisor,
            board,
            user_id: UserId::new("vendor-1").unwrap(),
        }
    }

    async fn new_session(&self) -> SessionId {
        self.engine
            .create_session(self.user_id.clone())
            .await
            .unwrap()
            .context
            .session_id()
            .clone()
    }

    async fn say(&self, session_id: &SessionId, text: &str) -> DialogueReply {
        self.engine
            .submit_utterance(session_id.clone(), UtteranceInput::Text(text.to_string()))
            .await
            .unwrap()
    }
}

fn asked_field(reply: &DialogueReply) -> ContextField {
    match reply {
        DialogueReply::Ask { field, .. } => *field,
        other => panic!("expected Ask, got {:?}", other),
    }
}

// =============================================================================
// Gathering and guidance
// =============================================================================

#[tokio::test]
async fn rich_opening_utterance_skips_to_the_missing_field() {
    let harness = Harness::new(true);
    let session_id = harness.new_session().await;

    let reply = harness
        .say(&session_id, "I sell vegetables near the railway station")
        .await;
    assert_eq!(asked_field(&reply), ContextField::OperatingConditions);

    let state = harness.engine.get_session_state(session_id).await.unwrap();
    assert!(state.slot_state(ContextField::BusinessType).is_satisfied());
    assert!(state.slot_state(ContextField::Location).is_satisfied());
    assert!(state
        .location()
        .landmarks()
        .contains("railway station"));
}

#[tokio::test]
async fn complete_context_flows_to_the_advisor() {
    let harness = Harness::new(true);
    let session_id = harness.new_session().await;

    harness
        .say(&session_id, "I sell vegetables near the railway station")
        .await;
    let reply = harness
        .say(&session_id, "I open in the morning and close at night")
        .await;

    match reply {
        DialogueReply::Guidance { response, text } => {
            assert_eq!(response.kind, GuidanceKind::Market);
            assert!(!text.is_empty());
        }
        other => panic!("expected Guidance, got {:?}", other),
    }

    // the advisor saw the merged context, not a partial one
    let seen = harness.advisor.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].business_type().unwrap().value, "vegetables");
    assert!(seen[0]
        .slot_state(ContextField::OperatingConditions)
        .is_satisfied());
}

#[tokio::test]
async fn questions_walk_the_priority_order() {
    let harness = Harness::new(true);
    let session_id = harness.new_session().await;

    let first = harness.say(&session_id, "namaste").await;
    assert_eq!(asked_field(&first), ContextField::BusinessType);

    let second = harness.say(&session_id, "I sell tea").await;
    assert_eq!(asked_field(&second), ContextField::Location);

    let third = harness.say(&session_id, "near the temple").await;
    assert_eq!(asked_field(&third), ContextField::OperatingConditions);
}

#[tokio::test]
async fn conversation_history_is_append_only_per_turn() {
    let harness = Harness::new(true);
    let session_id = harness.new_session().await;

    harness.say(&session_id, "I sell tea").await;
    harness.say(&session_id, "near the temple").await;

    let state = harness.engine.get_session_state(session_id).await.unwrap();
    // two turns, each recording the user utterance and the reply
    assert_eq!(state.conversation_history().len(), 4);
}

// =============================================================================
// Declines
// =============================================================================

#[tokio::test]
async fn two_declines_retire_the_question_for_good() {
    let harness = Harness::new(true);
    let session_id = harness.new_session().await;

    harness.say(&session_id, "I sell vegetables").await;
    let first_decline = harness.say(&session_id, "I don't know").await;
    assert_eq!(asked_field(&first_decline), ContextField::Location);

    let second_decline = harness.say(&session_id, "skip").await;
    // the location question never comes back
    assert_eq!(
        asked_field(&second_decline),
        ContextField::OperatingConditions
    );

    let reply = harness.say(&session_id, "I open mornings daily").await;
    assert!(matches!(reply, DialogueReply::Guidance { .. }));
}

// =============================================================================
// Contradictions
// =============================================================================

#[tokio::test]
async fn contradicted_location_asks_one_confirmation_then_recovers() {
    let harness = Harness::new(true);
    let session_id = harness.new_session().await;

    harness
        .say(&session_id, "my stall is in shivaji nagar and I sell vegetables")
        .await;
    harness.say(&session_id, "I open mornings daily").await;

    let clarify = harness.say(&session_id, "my stall is in kothrud").await;
    match &clarify {
        DialogueReply::Clarify { text } => assert!(text.contains("kothrud")),
        other => panic!("expected Clarify, got {:?}", other),
    }

    // the new explicit value won in the store
    let state = harness
        .engine
        .get_session_state(session_id.clone())
        .await
        .unwrap();
    assert_eq!(state.location().explicit(), Some("kothrud"));

    // a non-contradicting turn goes straight back to guidance
    let next = harness.say(&session_id, "yes that is right").await;
    assert!(matches!(next, DialogueReply::Guidance { .. }));
}

// =============================================================================
// Cross-session carry-over
// =============================================================================

#[tokio::test]
async fn explicit_facts_carry_into_the_next_session() {
    let harness = Harness::new(true);
    let first = harness.new_session().await;

    harness
        .say(&first, "my stall is in shivaji nagar and I sell vegetables")
        .await;
    harness.engine.close_session(first).await.unwrap();

    let second = harness.new_session().await;
    let state = harness
        .engine
        .get_session_state(second.clone())
        .await
        .unwrap();
    assert!(state.is_explicit(ContextField::BusinessType));
    assert_eq!(state.location().explicit(), Some("shivaji nagar"));
    assert!(state.conversation_history().is_empty());

    // the policy does not re-ask carried-over fields
    let reply = harness.say(&second, "hello again").await;
    assert_eq!(asked_field(&reply), ContextField::OperatingConditions);
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn sweep_closes_idle_sessions_and_input_gets_a_fresh_start_hint() {
    let harness = Harness::new(true);
    let session_id = harness.new_session().await;
    harness.say(&session_id, "I sell vegetables").await;

    // a zero-minute timeout makes every active session expired
    let sweeper = SessionTimeoutSweeper::new(
        harness.store.clone(),
        harness.engine.close_handler(),
        0,
    );
    assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
    // idempotent on repeated firing
    assert_eq!(sweeper.sweep_once().await.unwrap(), 0);

    let state = harness
        .engine
        .get_session_state(session_id.clone())
        .await
        .unwrap();
    assert_eq!(state.status(), SessionStatus::Closed);

    // closed sessions reject mutation and further input starts over
    let reply = harness.say(&session_id, "are you there").await;
    assert!(matches!(reply, DialogueReply::Clarify { .. }));
    let after = harness.engine.get_session_state(session_id).await.unwrap();
    assert_eq!(after.conversation_history().len(), 2);
}

#[tokio::test]
async fn session_count_and_language_land_on_the_profile() {
    let harness = Harness::new(true);
    let first = harness.new_session().await;
    harness.say(&first, "I sell vegetables").await;
    harness.engine.close_session(first).await.unwrap();
    harness.new_session().await;

    let profile = harness
        .store
        .get_user_profile(&harness.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.session_count(), 2);
    assert_eq!(profile.preferred_languages(), ["en"]);
}

// =============================================================================
// Offline behavior
// =============================================================================

#[tokio::test]
async fn offline_turns_queue_and_guide_degrades_to_holding_text() {
    let harness = Harness::new(false);
    let session_id = harness.new_session().await;

    harness
        .say(&session_id, "I sell vegetables near the railway station")
        .await;
    let reply = harness.say(&session_id, "I open mornings daily").await;

    match reply {
        DialogueReply::Guidance { response, .. } => assert!(response.confidence < 0.5),
        other => panic!("expected holding Guidance, got {:?}", other),
    }
    assert!(harness.advisor.seen().is_empty());

    let status = harness.engine.get_sync_status().await.unwrap();
    assert!(!status.is_online);
    assert_eq!(status.pending_items, 2);
}

#[tokio::test]
async fn full_queue_surfaces_a_storage_warning() {
    let harness = Harness::with_queue_capacity(false, 1);
    let session_id = harness.new_session().await;

    // fill the only slot with an irreplaceable audio item
    harness
        .queue
        .enqueue(NewQueuedItem::new(
            ItemKind::Audio,
            serde_json::json!({"bytes": [1, 2]}),
            session_id.clone(),
        ))
        .await
        .unwrap();

    let err = harness
        .engine
        .submit_utterance(
            session_id,
            UtteranceInput::Text("I sell vegetables".to_string()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::QueueFull);
    assert!(!harness.board.is_online());
}
