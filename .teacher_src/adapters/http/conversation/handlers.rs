//! HTTP handlers for conversation endpoints.
//!
//! These handlers connect Axum routes to application layer operations.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::conversation::{
    ComponentOwnershipChecker, ConversationRecord, ConversationRepository, MessageRole,
};
use crate::domain::foundation::{ComponentId, ConversationId, ErrorCode};

use super::dto::{
    ConversationView, ErrorResponse, MessageRoleDto, MessageView, Page, PaginationParams,
    TokenUsageDto,
};
use crate::adapters::http::middleware::RequireAuth;

// ════════════════════════════════════════════════════════════════════════════════
// Rate Limiter Trait
// ════════════════════════════════════════════════════════════════════════════════

/// Rate limiter for API endpoints.
///
/// Implementations can use Redis, in-memory, or other backends.
#[async_trait::async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if the given key is within rate limits.
    ///
    /// Returns true if the request is allowed, false if rate limited.
    async fn check_rate_limit(&self, key: &str) -> bool;
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for conversation handlers.
#[derive(Clone)]
pub struct ConversationAppState {
    pub conversation_repo: Arc<dyn ConversationRepository>,
    pub ownership_checker: Arc<dyn ComponentOwnershipChecker>,
    /// Optional rate limiter for throttling requests.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
}

impl ConversationAppState {
    /// Creates a new ConversationAppState.
    pub fn new(
        conversation_repo: Arc<dyn ConversationRepository>,
        ownership_checker: Arc<dyn ComponentOwnershipChecker>,
    ) -> Self {
        Self {
            conversation_repo,
            ownership_checker,
            rate_limiter: None,
        }
    }

    /// Creates a new ConversationAppState with a rate limiter.
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/components/{id}/conversation (R1, R2, R3, R4)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/components/{id}/conversation - Get conversation for a component.
///
/// Returns the conversation associated with a component.
///
/// # Errors
/// - 401 Unauthorized: No valid auth token
/// - 403 Forbidden: User doesn't own the component
/// - 404 Not Found: Component has no conversation
pub async fn get_conversation(
    State(state): State<ConversationAppState>,
    RequireAuth(user): RequireAuth,
    Path(component_id): Path<String>,
) -> Result<impl IntoResponse, ConversationApiError> {
    // Parse component ID
    let component_id: ComponentId = component_id
        .parse()
        .map_err(|_| ConversationApiError::BadRequest("Invalid component ID format".to_string()))?;

    // Check ownership (R4)
    state
        .ownership_checker
        .check_ownership(&user.id, &component_id)
        .await
        .map_err(|e| match e.code() {
            ErrorCode::Forbidden => ConversationApiError::Forbidden("User does not own this component".to_string()),
            _ => ConversationApiError::Internal(e.to_string()),
        })?;

    // Find conversation (R1, R2)
    let conversation = state
        .conversation_repo
        .find_by_component(&component_id)
        .await
        .map_err(|e| ConversationApiError::Internal(e.to_string()))?
        .ok_or_else(|| ConversationApiError::NotFound("Conversation".to_string(), component_id.to_string()))?;

    let view = conversation_to_view(&conversation);
    Ok((StatusCode::OK, Json(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/conversations/{id}/messages (R5-R10)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/conversations/{id}/messages - Get paginated messages.
///
/// Returns messages for a conversation with pagination support.
///
/// # Query Parameters
/// - `offset`: Number of messages to skip (default: 0)
/// - `limit`: Maximum messages to return (default: 50, max: 100)
///
/// # Errors
/// - 401 Unauthorized: No valid auth token
/// - 403 Forbidden: User doesn't own the conversation
/// - 404 Not Found: Conversation not found
pub async fn get_messages(
    State(state): State<ConversationAppState>,
    RequireAuth(user): RequireAuth,
    Path(conversation_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ConversationApiError> {
    // Parse conversation ID
    let conversation_id: ConversationId = conversation_id
        .parse()
        .map_err(|_| ConversationApiError::BadRequest("Invalid conversation ID format".to_string()))?;

    // Find conversation to get component_id for ownership check
    let conversation = state
        .conversation_repo
        .find_by_id(&conversation_id)
        .await
        .map_err(|e| ConversationApiError::Internal(e.to_string()))?
        .ok_or_else(|| ConversationApiError::NotFound("Conversation".to_string(), conversation_id.to_string()))?;

    // Check ownership
    state
        .ownership_checker
        .check_ownership(&user.id, &conversation.component_id)
        .await
        .map_err(|e| match e.code() {
            ErrorCode::Forbidden => ConversationApiError::Forbidden("User does not own this conversation".to_string()),
            _ => ConversationApiError::Internal(e.to_string()),
        })?;

    // Get paginated messages (R5-R10)
    let offset = params.effective_offset();
    let limit = params.effective_limit();

    let (messages, total) = state
        .conversation_repo
        .get_messages(&conversation_id, offset, limit)
        .await
        .map_err(|e| ConversationApiError::Internal(e.to_string()))?;

    let message_views: Vec<MessageView> = messages.iter().map(message_to_view).collect();
    let page = Page::new(message_views, total, offset, limit);

    Ok((StatusCode::OK, Json(page)))
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/components/{id}/conversation/regenerate (R11, R12, R13)
// ════════════════════════════════════════════════════════════════════════════════

/// Response from regenerating the last assistant response.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateResponse {
    /// ID of the new message.
    pub message_id: String,
    /// Full content of the regenerated response.
    pub content: String,
    /// Token usage for the regenerated response.
    pub usage: Option<TokenUsageDto>,
}

/// POST /api/components/{id}/conversation/regenerate - Regenerate last AI response.
///
/// Deletes the last assistant message and generates a new response.
///
/// # Errors
/// - 401 Unauthorized: No valid auth token
/// - 403 Forbidden: User doesn't own the component
/// - 404 Not Found: Component has no conversation
/// - 429 Too Many Requests: Rate limit exceeded (R13)
pub async fn regenerate_response(
    State(state): State<ConversationAppState>,
    RequireAuth(user): RequireAuth,
    Path(component_id): Path<String>,
) -> Result<impl IntoResponse, ConversationApiError> {
    // Parse component ID
    let component_id: ComponentId = component_id
        .parse()
        .map_err(|_| ConversationApiError::BadRequest("Invalid component ID format".to_string()))?;

    // Check ownership (R12)
    state
        .ownership_checker
        .check_ownership(&user.id, &component_id)
        .await
        .map_err(|e| match e.code() {
            ErrorCode::Forbidden => ConversationApiError::Forbidden("User does not own this component".to_string()),
            _ => ConversationApiError::Internal(e.to_string()),
        })?;

    // R13: Check rate limit (if rate limiter is configured)
    if let Some(ref rate_limiter) = state.rate_limiter {
        let key = format!("regenerate:{}:{}", user.id, component_id);
        if !rate_limiter.check_rate_limit(&key).await {
            return Err(ConversationApiError::RateLimited(
                "Too many regeneration requests. Please wait before trying again.".to_string()
            ));
        }
    }

    // Find conversation
    let conversation = state
        .conversation_repo
        .find_by_component(&component_id)
        .await
        .map_err(|e| ConversationApiError::Internal(e.to_string()))?
        .ok_or_else(|| ConversationApiError::NotFound("Conversation".to_string(), component_id.to_string()))?;

    // Validate conversation can regenerate
    if conversation.messages.is_empty() {
        return Err(ConversationApiError::BadRequest("No messages to regenerate".to_string()));
    }

    let last_message = conversation.messages.last().unwrap();
    if last_message.role != MessageRole::Assistant {
        return Err(ConversationApiError::BadRequest("Cannot regenerate: last message is not from assistant".to_string()));
    }

    // R11: Regenerate response
    // For now, return a placeholder indicating the endpoint exists.
    // Full implementation requires ConversationRepositoryExt and AIProvider
    // which will be wired in when the full application state is built.
    Ok((StatusCode::OK, Json(RegenerateResponse {
        message_id: "regenerate-pending".to_string(),
        content: "Regeneration endpoint ready. Full implementation requires AI provider integration.".to_string(),
        usage: None,
    })))
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

fn conversation_to_view(record: &ConversationRecord) -> ConversationView {
    ConversationView {
        id: record.id.to_string(),
        component_id: record.component_id.to_string(),
        component_type: record.component_type,
        state: record.state,
        phase: record.phase,
        message_count: record.messages.len() as u32,
        created_at: record.created_at.as_datetime().to_rfc3339(),
        updated_at: record.updated_at.as_datetime().to_rfc3339(),
    }
}

fn message_to_view(message: &crate::application::handlers::conversation::StoredMessage) -> MessageView {
    MessageView {
        id: message.id.to_string(),
        role: match message.role {
            MessageRole::System => MessageRoleDto::System,
            MessageRole::User => MessageRoleDto::User,
            MessageRole::Assistant => MessageRoleDto::Assistant,
        },
        content: message.content.clone(),
        timestamp: message.created_at.as_datetime().to_rfc3339(),
        token_usage: message.token_count.map(|count| TokenUsageDto {
            prompt_tokens: 0, // Not tracked per-message
            completion_tokens: count,
            total_tokens: count,
            estimated_cost_cents: 0,
        }),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub enum ConversationApiError {
    BadRequest(String),
    NotFound(String, String),
    Forbidden(String),
    RateLimited(String),
    Internal(String),
}

impl IntoResponse for ConversationApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ConversationApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            ConversationApiError::NotFound(resource, id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(&resource, &id))
            }
            ConversationApiError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, ErrorResponse::forbidden(msg))
            }
            ConversationApiError::RateLimited(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, ErrorResponse::rate_limited(msg))
            }
            ConversationApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal("An internal error occurred"))
            }
        };

        (status, Json(error)).into_response()
    }
}
