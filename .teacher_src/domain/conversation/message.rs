//! Message entity for conversations.
//!
//! Messages are immutable records of user/assistant exchanges within a conversation.
//! Each message has a role (user/assistant/system), content, and timestamp.

use crate::domain::foundation::{DomainError, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a message within a conversation.
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

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Role of a message sender in a conversation.
///
/// Mirrors the AI provider message roles for consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System instructions (typically invisible to user).
    System,
    /// User input.
    User,
    /// AI assistant response.
    Assistant,
}

impl Role {
    /// Returns true if this is a user-visible role.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::User | Self::Assistant)
    }
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `content` is non-empty (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    id: MessageId,

    /// The role of the message sender.
    role: Role,

    /// The content of the message.
    content: String,

    /// When the message was created.
    created_at: Timestamp,
}

impl Message {
    /// Creates a new message with the given role and content.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        Self::validate_content(&content)?;

        Ok(Self {
            id: MessageId::new(),
            role,
            content,
            created_at: Timestamp::now(),
        })
    }

    /// Creates a user message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn user(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn assistant(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::Assistant, content)
    }

    /// Creates a system message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn system(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::System, content)
    }

    /// Reconstitutes a message from persistence (no validation).
    pub fn reconstitute(
        id: MessageId,
        role: Role,
        content: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            role,
            content,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the message ID.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Returns true if this message is from the assistant.
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Message content cannot be empty",
            ));
        }
        Ok(())
    }
}
