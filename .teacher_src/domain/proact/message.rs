//! Message types for component conversations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::Timestamp;

/// Unique identifier for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Metadata associated with a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Approximate token count.
    #[serde(default)]
    pub token_count: Option<u32>,

    /// Data extracted from this message.
    #[serde(default)]
    pub extracted_data: serde_json::Value,
}

/// A single message in a component conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub metadata: MessageMetadata,
    pub timestamp: Timestamp,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            content: content.into(),
            metadata: MessageMetadata::default(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            content: content.into(),
            metadata: MessageMetadata::default(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::System,
            content: content.into(),
            metadata: MessageMetadata::default(),
            timestamp: Timestamp::now(),
        }
    }

    /// Sets the token count metadata.
    pub fn with_token_count(mut self, count: u32) -> Self {
        self.metadata.token_count = Some(count);
        self
    }

    /// Sets the extracted data metadata.
    pub fn with_extracted_data(mut self, data: serde_json::Value) -> Self {
        self.metadata.extracted_data = data;
        self
    }
}
