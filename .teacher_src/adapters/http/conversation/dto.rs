//! HTTP DTOs for conversation endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{AgentPhase, ConversationState};
use crate::domain::foundation::ComponentType;

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// View of a conversation for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    /// Conversation ID.
    pub id: String,
    /// Component ID this conversation belongs to.
    pub component_id: String,
    /// Component type for this conversation.
    pub component_type: ComponentType,
    /// Current state of the conversation.
    pub state: ConversationState,
    /// Current agent phase.
    pub phase: AgentPhase,
    /// Total message count.
    pub message_count: u32,
    /// When the conversation was created.
    pub created_at: String,
    /// When the conversation was last updated.
    pub updated_at: String,
}

/// View of a message for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Message ID.
    pub id: String,
    /// Role of the message sender.
    pub role: MessageRoleDto,
    /// Content of the message.
    pub content: String,
    /// When the message was sent.
    pub timestamp: String,
    /// Token usage for this message (if assistant message).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsageDto>,
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRoleDto {
    User,
    Assistant,
    System,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsageDto {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_cents: u32,
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total count of all items.
    pub total: u32,
    /// Offset used for this page.
    pub offset: u32,
    /// Limit used for this page.
    pub limit: u32,
    /// Whether there are more items after this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items.
    pub fn new(items: Vec<T>, total: u32, offset: u32, limit: u32) -> Self {
        let has_more = (offset + items.len() as u32) < total;
        Self {
            items,
            total,
            offset,
            limit,
            has_more,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters for paginated message retrieval.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    /// Number of items to skip.
    #[serde(default)]
    pub offset: Option<u32>,
    /// Maximum number of items to return.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PaginationParams {
    /// Default limit for messages.
    pub const DEFAULT_LIMIT: u32 = 50;
    /// Maximum allowed limit.
    pub const MAX_LIMIT: u32 = 100;

    /// Get the effective offset.
    pub fn effective_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Get the effective limit, capped at MAX_LIMIT.
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "FORBIDDEN".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            code: "RATE_LIMITED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
