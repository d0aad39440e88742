//! HTTP adapter for conversation endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ConversationResponse, MessageResponse, SendMessageRequest, SendMessageResponse, StreamChunk};
pub use handlers::ConversationHandlers;
pub use routes::conversation_routes;
