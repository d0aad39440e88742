//! SubmitUtteranceHandler - one dialogue turn, end to end.
//!
//! Pipeline per turn: resolve text (transcribing audio when needed),
//! extract candidate facts, merge them into the session under the
//! per-session lock, let the pure policy decide, perform the decision's
//! I/O (advisor call or queueing), and persist the resulting patch.
//! The policy itself never awaits and never writes.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::session_locks::SessionLocks;
use crate::application::sync::SyncStatusBoard;
use crate::domain::context::{
    ContextField, ContextMerger, ContextPatch, DialogueProgress, Message, Role, SessionContext,
    UserProfile,
};
use crate::domain::dialogue::{speakable, DialogueDecision, DialoguePolicy, DialogueState};
use crate::domain::extraction::{EntityExtractor, ExtractionError};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::sync::{ItemKind, NewQueuedItem};
use crate::ports::{
    AudioClip, BusinessAdvisor, ContextStore, GuidanceKind, GuidanceResponse, OfflineQueue,
    SpeechToText,
};

/// Holding response used when guidance cannot be generated right now.
const HOLDING_GUIDANCE: &str =
    "I have noted your question. I will share proper guidance once I am back online.";

/// Re-prompt used when the input could not be understood at all.
const RETRY_PROMPT: &str = "I did not catch that. Could you say it again?";

/// One user turn, as text or captured audio.
#[derive(Debug, Clone)]
pub enum UtteranceInput {
    Text(String),
    Audio(AudioClip),
}

/// Command for one dialogue turn.
#[derive(Debug, Clone)]
pub struct SubmitUtteranceCommand {
    pub session_id: SessionId,
    pub input: UtteranceInput,
}

/// What the engine answers with. Every variant carries speakable text.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueReply {
    /// A targeted question about one missing context field.
    Ask { field: ContextField, text: String },
    /// Advisory guidance for a complete context.
    Guidance {
        response: GuidanceResponse,
        text: String,
    },
    /// A clarification or re-prompt.
    Clarify { text: String },
}

impl DialogueReply {
    /// Plain text suitable for the speech synthesis port.
    pub fn text(&self) -> &str {
        match self {
            DialogueReply::Ask { text, .. } => text,
            DialogueReply::Guidance { text, .. } => text,
            DialogueReply::Clarify { text } => text,
        }
    }
}

/// Handler for dialogue turns.
pub struct SubmitUtteranceHandler {
    store: Arc<dyn ContextStore>,
    queue: Arc<dyn OfflineQueue>,
    advisor: Arc<dyn BusinessAdvisor>,
    stt: Arc<dyn SpeechToText>,
    locks: Arc<SessionLocks>,
    board: Arc<SyncStatusBoard>,
    extractor: EntityExtractor,
    merger: ContextMerger,
    policy: DialoguePolicy,
    transcript_floor: f64,
}

impl SubmitUtteranceHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ContextStore>,
        queue: Arc<dyn OfflineQueue>,
        advisor: Arc<dyn BusinessAdvisor>,
        stt: Arc<dyn SpeechToText>,
        locks: Arc<SessionLocks>,
        board: Arc<SyncStatusBoard>,
        policy: DialoguePolicy,
        transcript_floor: f64,
    ) -> Self {
        Self {
            store,
            queue,
            advisor,
            stt,
            locks,
            board,
            extractor: EntityExtractor::new(),
            merger: ContextMerger::new(),
            policy,
            transcript_floor: transcript_floor.clamp(0.0, 1.0),
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitUtteranceCommand,
    ) -> Result<DialogueReply, DomainError> {
        let (text, spoken_language) = match self.resolve_text(&cmd).await? {
            Resolved::Text(text, language) => (text, language),
            Resolved::Reply(reply) => return Ok(reply),
        };

        let _guard = self.locks.acquire(&cmd.session_id).await;

        let Some(context) = self.store.get_session_context(&cmd.session_id).await? else {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", cmd.session_id),
            ));
        };

        let extracted = match self.extractor.extract(&text, &cmd.session_id) {
            Ok(extracted) => extracted,
            Err(err @ ExtractionError::EmptyUtterance)
            | Err(err @ ExtractionError::UtteranceTooLong { .. }) => {
                // malformed input is recoverable by re-prompting
                debug!(
                    target: "sahayak::dialogue",
                    session_id = %cmd.session_id,
                    error = %err,
                    "extraction rejected input, re-prompting"
                );
                return Ok(DialogueReply::Clarify {
                    text: RETRY_PROMPT.to_string(),
                });
            }
        };

        let outcome = self.merger.merge(&context, &extracted);
        let decided = self.policy.decide(&outcome.context, &extracted, &outcome.report);

        // offline turns are queued so the server-side history stays
        // complete once connectivity returns
        if !self.board.is_online() {
            self.enqueue_turn(&cmd.session_id, &text).await?;
        }

        let reply = match &decided.decision {
            DialogueDecision::Ask { field, question } => DialogueReply::Ask {
                field: *field,
                text: speakable(question),
            },
            DialogueDecision::Clarify { prompt } => DialogueReply::Clarify {
                text: speakable(prompt),
            },
            DialogueDecision::Guide => self.guide(&outcome.context, &text).await,
        };

        if decided.state != DialogueState::Closed {
            self.persist_turn(&cmd.session_id, &outcome.context, decided.progress, &text, &reply)
                .await?;
            let language = spoken_language.unwrap_or_else(|| extracted.language.clone());
            self.record_language(&outcome.context, &language).await?;
        }

        Ok(reply)
    }

    /// Resolves the turn to plain text, transcribing audio when needed.
    async fn resolve_text(&self, cmd: &SubmitUtteranceCommand) -> Result<Resolved, DomainError> {
        match &cmd.input {
            UtteranceInput::Text(text) => Ok(Resolved::Text(text.clone(), None)),
            UtteranceInput::Audio(clip) => {
                if !self.board.is_online() {
                    // the capture is irreplaceable: preserve it for sync,
                    // answer with a holding clarification
                    let payload = serde_json::to_value(clip).map_err(|err| {
                        DomainError::new(ErrorCode::InternalError, err.to_string())
                    })?;
                    self.queue
                        .enqueue(NewQueuedItem::new(
                            ItemKind::Audio,
                            payload,
                            cmd.session_id.clone(),
                        ))
                        .await?;
                    return Ok(Resolved::Reply(DialogueReply::Clarify {
                        text: "I saved your message and will listen to it once I am \
                               back online."
                            .to_string(),
                    }));
                }
                match self.stt.transcribe(clip).await {
                    Ok(transcript) if transcript.confidence < self.transcript_floor => {
                        // low confidence is a re-prompt signal, not a failure
                        debug!(
                            target: "sahayak::dialogue",
                            session_id = %cmd.session_id,
                            confidence = transcript.confidence,
                            "transcript below floor, re-prompting"
                        );
                        Ok(Resolved::Reply(DialogueReply::Clarify {
                            text: RETRY_PROMPT.to_string(),
                        }))
                    }
                    Ok(transcript) => Ok(Resolved::Text(transcript.text, transcript.language)),
                    Err(err) => {
                        warn!(
                            target: "sahayak::dialogue",
                            session_id = %cmd.session_id,
                            error = %err,
                            "transcription failed, re-prompting"
                        );
                        Ok(Resolved::Reply(DialogueReply::Clarify {
                            text: RETRY_PROMPT.to_string(),
                        }))
                    }
                }
            }
        }
    }

    /// Runs the guidance path, degrading to a holding response when the
    /// advisor is unreachable or the device is offline.
    async fn guide(&self, context: &SessionContext, text: &str) -> DialogueReply {
        if !self.board.is_online() {
            // the turn was already queued for sync
            let response =
                GuidanceResponse::new(HOLDING_GUIDANCE, GuidanceKind::General, 0.2);
            let text = response.text.clone();
            return DialogueReply::Guidance { response, text };
        }

        match self.advisor.generate_guidance(context, text).await {
            Ok(response) => {
                let mut spoken = speakable(&response.text);
                if spoken.is_empty() {
                    spoken = HOLDING_GUIDANCE.to_string();
                }
                DialogueReply::Guidance {
                    response,
                    text: spoken,
                }
            }
            Err(err) => {
                warn!(
                    target: "sahayak::dialogue",
                    session_id = %context.session_id(),
                    error = %err,
                    "advisor failed, degrading to holding guidance"
                );
                let response =
                    GuidanceResponse::new(HOLDING_GUIDANCE, GuidanceKind::General, 0.2);
                let text = response.text.clone();
                DialogueReply::Guidance { response, text }
            }
        }
    }

    async fn enqueue_turn(&self, session_id: &SessionId, text: &str) -> Result<(), DomainError> {
        self.queue
            .enqueue(NewQueuedItem::new(
                ItemKind::Text,
                serde_json::json!({ "text": text }),
                session_id.clone(),
            ))
            .await
            .map(|_| ())
    }

    /// Persists the merged fields, policy bookkeeping, and both turn
    /// messages as one atomic patch.
    async fn persist_turn(
        &self,
        session_id: &SessionId,
        merged: &SessionContext,
        progress: DialogueProgress,
        user_text: &str,
        reply: &DialogueReply,
    ) -> Result<(), DomainError> {
        let mut messages = vec![Message::new(Role::User, user_text)?];
        if !reply.text().is_empty() {
            messages.push(Message::new(Role::Assistant, reply.text())?);
        }

        let patch = ContextPatch {
            business_type: merged.business_type().cloned(),
            location: Some(merged.location().clone()),
            operating_conditions: merged.operating_conditions().cloned(),
            preferences: Some(merged.preferences().clone()),
            progress: Some(progress),
            append_messages: messages,
        };
        self.store.update_context(session_id, patch).await?;
        Ok(())
    }

    /// Records the detected language on the user profile, most recent
    /// first.
    async fn record_language(
        &self,
        context: &SessionContext,
        language: &str,
    ) -> Result<(), DomainError> {
        let mut profile = self
            .store
            .get_user_profile(context.user_id())
            .await?
            .unwrap_or_else(|| UserProfile::new(context.user_id().clone()));
        self.merger.absorb_language(&mut profile, language);
        self.store.put_user_profile(&profile).await
    }
}

enum Resolved {
    Text(String, Option<String>),
    Reply(DialogueReply),
}
