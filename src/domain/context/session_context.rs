//! SessionContext aggregate - the per-conversation state record.
//!
//! One SessionContext exists per active conversation. The Context Store
//! owns its lifetime; the Context Merger produces updated copies; the
//! Dialogue Policy only ever reads it.
//!
//! # Invariants
//!
//! - `last_updated >= created_at`
//! - `conversation_history` is append-only while the session is active
//! - Once `status` is closed, no further mutation is permitted except the
//!   archival timestamp written by the close itself

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{ContextField, LocationInfo, Message, Provenance, SlotState, SlotValue};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, SessionStatus, Timestamp, UserId};

/// Dialogue bookkeeping carried inside the session record.
///
/// The Dialogue Policy computes updates to this and hands them back to
/// the caller for persistence; it never writes the store itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DialogueProgress {
    last_asked: Option<ContextField>,
    decline_streaks: BTreeMap<ContextField, u8>,
    accepted_unset: BTreeSet<ContextField>,
    pending_confirmation: Option<ContextField>,
}

impl DialogueProgress {
    /// Returns the field the last question targeted, if any.
    pub fn last_asked(&self) -> Option<ContextField> {
        self.last_asked
    }

    /// Records that a question was asked about `field`.
    pub fn record_ask(&mut self, field: ContextField) {
        self.last_asked = Some(field);
    }

    /// Clears the last-asked marker (used when no question is pending).
    pub fn clear_last_asked(&mut self) {
        self.last_asked = None;
    }

    /// Records a decline for `field`, returning the new streak length.
    pub fn record_decline(&mut self, field: ContextField) -> u8 {
        let streak = self.decline_streaks.entry(field).or_insert(0);
        *streak = streak.saturating_add(1);
        *streak
    }

    /// Resets the decline streak for `field` (the user engaged again).
    pub fn reset_declines(&mut self, field: ContextField) {
        self.decline_streaks.remove(&field);
    }

    /// Returns the current decline streak for `field`.
    pub fn decline_streak(&self, field: ContextField) -> u8 {
        self.decline_streaks.get(&field).copied().unwrap_or(0)
    }

    /// Marks `field` as accepted-unset: it will never be asked again.
    pub fn accept_unset(&mut self, field: ContextField) {
        self.accepted_unset.insert(field);
    }

    /// Returns true if `field` was accepted as unset.
    pub fn is_accepted_unset(&self, field: ContextField) -> bool {
        self.accepted_unset.contains(&field)
    }

    /// Returns the field awaiting a contradiction confirmation, if any.
    pub fn pending_confirmation(&self) -> Option<ContextField> {
        self.pending_confirmation
    }

    /// Marks `field` as awaiting confirmation after a contradiction.
    pub fn set_pending_confirmation(&mut self, field: ContextField) {
        self.pending_confirmation = Some(field);
    }

    /// Clears the pending confirmation marker.
    pub fn clear_pending_confirmation(&mut self) {
        self.pending_confirmation = None;
    }
}

/// Partial update applied atomically to a session by the Context Store.
///
/// Fields left as `None` are untouched. Messages are appended, never
/// replaced. Handlers build patches from merge output; the store applies
/// them under the per-session serialization scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextPatch {
    pub business_type: Option<SlotValue>,
    pub location: Option<LocationInfo>,
    pub operating_conditions: Option<SlotValue>,
    pub preferences: Option<BTreeMap<String, SlotValue>>,
    pub progress: Option<DialogueProgress>,
    pub append_messages: Vec<Message>,
}

impl ContextPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.business_type.is_none()
            && self.location.is_none()
            && self.operating_conditions.is_none()
            && self.preferences.is_none()
            && self.progress.is_none()
            && self.append_messages.is_empty()
    }
}

/// Per-conversation session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    session_id: SessionId,
    user_id: UserId,
    business_type: Option<SlotValue>,
    location: LocationInfo,
    operating_conditions: Option<SlotValue>,
    preferences: BTreeMap<String, SlotValue>,
    conversation_history: Vec<Message>,
    progress: DialogueProgress,
    status: SessionStatus,
    created_at: Timestamp,
    last_updated: Timestamp,
}

impl SessionContext {
    /// Creates a fresh, empty session for a user.
    pub fn new(session_id: SessionId, user_id: UserId) -> Self {
        let now = Timestamp::now();
        Self {
            session_id,
            user_id,
            business_type: None,
            location: LocationInfo::new(),
            operating_conditions: None,
            preferences: BTreeMap::new(),
            conversation_history: Vec::new(),
            progress: DialogueProgress::default(),
            status: SessionStatus::Active,
            created_at: now,
            last_updated: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the session id.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the owning user's id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the business type slot.
    pub fn business_type(&self) -> Option<&SlotValue> {
        self.business_type.as_ref()
    }

    /// Returns the location state.
    pub fn location(&self) -> &LocationInfo {
        &self.location
    }

    /// Returns the operating conditions slot.
    pub fn operating_conditions(&self) -> Option<&SlotValue> {
        self.operating_conditions.as_ref()
    }

    /// Returns the gathered preferences keyed by kind.
    pub fn preferences(&self) -> &BTreeMap<String, SlotValue> {
        &self.preferences
    }

    /// Returns the conversation history, oldest first.
    pub fn conversation_history(&self) -> &[Message] {
        &self.conversation_history
    }

    /// Returns the dialogue progress bookkeeping.
    pub fn progress(&self) -> &DialogueProgress {
        &self.progress
    }

    /// Returns the session status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session last changed.
    pub fn last_updated(&self) -> &Timestamp {
        &self.last_updated
    }

    /// Resolved state of one context field, folding in accepted-unset marks.
    pub fn slot_state(&self, field: ContextField) -> SlotState {
        let provenance = match field {
            ContextField::BusinessType => self
                .business_type
                .as_ref()
                .map(|s| s.provenance)
                .unwrap_or(Provenance::Unset),
            ContextField::Location => self.location.provenance(),
            ContextField::OperatingConditions => self
                .operating_conditions
                .as_ref()
                .map(|s| s.provenance)
                .unwrap_or(Provenance::Unset),
        };
        if provenance.is_set() {
            SlotState::Set(provenance)
        } else if self.progress.is_accepted_unset(field) {
            SlotState::UnsetAccepted
        } else {
            SlotState::Unset
        }
    }

    /// True if `field` holds an explicitly stated value.
    pub fn is_explicit(&self, field: ContextField) -> bool {
        matches!(self.slot_state(field), SlotState::Set(Provenance::Explicit))
    }

    /// True when the session has been inactive past the timeout.
    pub fn is_expired(&self, now: &Timestamp, timeout_minutes: i64) -> bool {
        self.status == SessionStatus::Active
            && now.minutes_since(&self.last_updated) >= timeout_minutes
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Applies a patch atomically.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session is no longer mutable
    pub fn apply(&mut self, patch: ContextPatch) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        if let Some(business_type) = patch.business_type {
            self.business_type = Some(business_type);
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(operating_conditions) = patch.operating_conditions {
            self.operating_conditions = Some(operating_conditions);
        }
        if let Some(preferences) = patch.preferences {
            self.preferences = preferences;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        self.conversation_history.extend(patch.append_messages);
        self.touch();
        Ok(())
    }

    /// Appends a single message to the history.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session is no longer mutable
    pub fn append_message(&mut self, message: Message) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        self.conversation_history.push(message);
        self.touch();
        Ok(())
    }

    /// Seeds explicit facts carried over from a previous closed session.
    ///
    /// Only explicitly stated values carry over; conversation history and
    /// inferred values never do.
    pub fn seed_from(&mut self, previous: &SessionContext) {
        if let Some(business_type) = &previous.business_type {
            if business_type.provenance == Provenance::Explicit {
                self.business_type = Some(business_type.clone());
            }
        }
        if let Some(explicit) = previous.location.explicit() {
            let produced_at = previous
                .location
                .explicit_at()
                .copied()
                .unwrap_or(previous.last_updated);
            self.location.set_explicit(explicit, produced_at);
        }
        if let Some(conditions) = &previous.operating_conditions {
            if conditions.provenance == Provenance::Explicit {
                self.operating_conditions = Some(conditions.clone());
            }
        }
        for (key, value) in &previous.preferences {
            if value.provenance == Provenance::Explicit {
                self.preferences.insert(key.clone(), value.clone());
            }
        }
    }

    /// Closes the session. Idempotent: closing a closed session is a
    /// no-op, not an error. Returns true if the status changed.
    pub fn close(&mut self) -> bool {
        if self.status == SessionStatus::Closed {
            return false;
        }
        self.status = SessionStatus::Closed;
        // archival timestamp: the one permitted write after closing
        self.touch();
        true
    }

    fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::SessionClosed,
                format!("Session {} is closed", self.session_id),
            ))
        }
    }

    fn touch(&mut self) {
        let now = Timestamp::now();
        // last_updated never moves backwards
        if now.is_after(&self.last_updated) {
            self.last_updated = now;
        }
    }

    /// Test/merger support: replaces mutable fields without closed-session
    /// checks. Used by the Context Merger, which operates on a working copy
    /// that the store later applies through [`SessionContext::apply`].
    pub(crate) fn business_type_mut(&mut self) -> &mut Option<SlotValue> {
        &mut self.business_type
    }

    pub(crate) fn location_mut(&mut self) -> &mut LocationInfo {
        &mut self.location
    }

    pub(crate) fn operating_conditions_mut(&mut self) -> &mut Option<SlotValue> {
        &mut self.operating_conditions
    }

    pub(crate) fn preferences_mut(&mut self) -> &mut BTreeMap<String, SlotValue> {
        &mut self.preferences
    }
}
