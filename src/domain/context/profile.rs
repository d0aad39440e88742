//! UserProfile - per-user state that outlives sessions.
//!
//! Mutated only by the Context Merger path and the Sync Coordinator;
//! the Dialogue Policy never touches it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Provenance, SessionContext, SlotValue};
use crate::domain::foundation::{Timestamp, UserId};

/// Long-lived per-user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    user_id: UserId,
    /// Detected languages, most recently detected first.
    preferred_languages: Vec<String>,
    /// Aggregate preferences rolled up from closed sessions.
    preferences: BTreeMap<String, SlotValue>,
    session_count: u32,
    last_active: Timestamp,
}

impl UserProfile {
    /// Creates a fresh profile for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            preferred_languages: Vec::new(),
            preferences: BTreeMap::new(),
            session_count: 0,
            last_active: Timestamp::now(),
        }
    }

    /// Returns the user id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the detected languages, most recent first.
    pub fn preferred_languages(&self) -> &[String] {
        &self.preferred_languages
    }

    /// Returns the aggregated preferences.
    pub fn preferences(&self) -> &BTreeMap<String, SlotValue> {
        &self.preferences
    }

    /// Returns how many sessions this user has started.
    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    /// Returns the last activity timestamp.
    pub fn last_active(&self) -> &Timestamp {
        &self.last_active
    }

    /// Moves `language` to the front of the preference order.
    pub fn record_language(&mut self, language: &str) {
        self.preferred_languages.retain(|l| l != language);
        self.preferred_languages.insert(0, language.to_string());
        self.touch();
    }

    /// Records that a new session started for this user.
    pub fn record_session_started(&mut self) {
        self.session_count = self.session_count.saturating_add(1);
        self.touch();
    }

    /// Rolls a finished session's explicit preferences into the profile.
    ///
    /// A stored preference is only replaced by a newer value of equal or
    /// higher confidence, mirroring the session-level merge rule.
    pub fn absorb_session(&mut self, session: &SessionContext) {
        for (key, value) in session.preferences() {
            if value.provenance != Provenance::Explicit {
                continue;
            }
            let keep_current = self.preferences.get(key).map_or(false, |current| {
                current.updated_at.is_after(&value.updated_at)
                    || value.confidence < current.confidence
            });
            if !keep_current {
                self.preferences.insert(key.clone(), value.clone());
            }
        }
        self.touch();
    }

    /// Folds a server-side copy of the profile into this one.
    ///
    /// Used by the Sync Coordinator when applying downloaded updates.
    pub fn absorb_remote(&mut self, remote: &UserProfile) {
        self.session_count = self.session_count.max(remote.session_count);
        if remote.last_active.is_after(&self.last_active) {
            // remote activity is fresher; its language order takes the front
            for language in remote.preferred_languages.iter().rev() {
                self.preferred_languages.retain(|l| l != language);
                self.preferred_languages.insert(0, language.clone());
            }
            self.last_active = remote.last_active;
        } else {
            for language in &remote.preferred_languages {
                if !self.preferred_languages.contains(language) {
                    self.preferred_languages.push(language.clone());
                }
            }
        }
        for (key, value) in &remote.preferences {
            let keep_current = self.preferences.get(key).map_or(false, |current| {
                current.updated_at.is_after(&value.updated_at)
                    || value.confidence < current.confidence
            });
            if !keep_current {
                self.preferences.insert(key.clone(), value.clone());
            }
        }
    }

    fn touch(&mut self) {
        let now = Timestamp::now();
        if now.is_after(&self.last_active) {
            self.last_active = now;
        }
    }
}
