//! Message entity for the session conversation history.
//!
//! Messages are immutable records of user/assistant exchanges. The
//! history is append-only while a session is active.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, MessageId, Timestamp, ValidationError};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Transcribed or typed user input.
    User,
    /// Engine output (question, clarification, or guidance).
    Assistant,
}

/// An immutable message within a session.
///
/// # Invariants
///
/// - `content` is non-empty (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    created_at: Timestamp,
}

impl Message {
    /// Creates a new message.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if content is blank
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content").into());
        }
        Ok(Self {
            id: MessageId::new(),
            role,
            content,
            created_at: Timestamp::now(),
        })
    }

    /// Returns the message id.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the sender role.
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_user_message() {
        let msg = Message::new(Role::User, "I sell vegetables").unwrap();
        assert_eq!(msg.role(), Role::User);
        assert_eq!(msg.content(), "I sell vegetables");
    }

    #[test]
    fn rejects_blank_content() {
        assert!(Message::new(Role::User, "   ").is_err());
        assert!(Message::new(Role::Assistant, "").is_err());
    }

    #[test]
    fn messages_get_unique_ids() {
        let a = Message::new(Role::User, "hello").unwrap();
        let b = Message::new(Role::User, "hello").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn role_serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
