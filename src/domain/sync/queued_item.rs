//! Durable queue items for offline-first operation.
//!
//! A QueuedItem is owned exclusively by the Offline Queue until it is
//! acknowledged (synced and removed) or dead-lettered (retry budget
//! exhausted, held for inspection). Nothing is ever silently dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ItemId, SessionId, Timestamp};

/// The kind of payload queued for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Raw captured audio; irreplaceable, never evicted.
    Audio,
    /// A transcribed or typed utterance.
    Text,
    /// A context snapshot or patch produced offline.
    Context,
    /// User feedback on guidance.
    Feedback,
}

impl ItemKind {
    /// Stable string form for keyed persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Audio => "audio",
            ItemKind::Text => "text",
            ItemKind::Context => "context",
            ItemKind::Feedback => "feedback",
        }
    }

    /// Parses the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "audio" => Some(ItemKind::Audio),
            "text" => Some(ItemKind::Text),
            "context" => Some(ItemKind::Context),
            "feedback" => Some(ItemKind::Feedback),
            _ => None,
        }
    }

    /// Audio capture cannot be regenerated; everything else can be,
    /// at least partially.
    pub fn is_evictable(&self) -> bool {
        !matches!(self, ItemKind::Audio)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Queue position of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Waiting to be picked up by a sync cycle.
    #[default]
    Pending,
    /// Handed to the Sync Coordinator, not yet acknowledged.
    InFlight,
    /// Retry budget exhausted; held for inspection.
    DeadLetter,
}

impl ItemStatus {
    /// Stable string form for keyed persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::InFlight => "in_flight",
            ItemStatus::DeadLetter => "dead_letter",
        }
    }

    /// Parses the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ItemStatus::Pending),
            "in_flight" => Some(ItemStatus::InFlight),
            "dead_letter" => Some(ItemStatus::DeadLetter),
            _ => None,
        }
    }
}

/// A new item to enqueue; the queue assigns the id and status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQueuedItem {
    pub kind: ItemKind,
    pub payload: serde_json::Value,
    pub session_id: SessionId,
    pub timestamp: Timestamp,
}

impl NewQueuedItem {
    /// Creates a new item stamped with the current time.
    pub fn new(kind: ItemKind, payload: serde_json::Value, session_id: SessionId) -> Self {
        Self {
            kind,
            payload,
            session_id,
            timestamp: Timestamp::now(),
        }
    }
}

/// A durable, retry-tracked queue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub payload: serde_json::Value,
    pub session_id: SessionId,
    pub timestamp: Timestamp,
    pub retry_count: u32,
    pub status: ItemStatus,
}

impl QueuedItem {
    /// Materializes a new pending item from an enqueue request.
    pub fn from_new(new: NewQueuedItem) -> Self {
        Self {
            id: ItemId::new(),
            kind: new.kind,
            payload: new.payload,
            session_id: new.session_id,
            timestamp: new.timestamp,
            retry_count: 0,
            status: ItemStatus::Pending,
        }
    }
}
