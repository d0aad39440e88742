//! GetConversationHandler - Query handler for retrieving conversation data.

use std::sync::Arc;

use crate::domain::foundation::{ComponentId, ConversationId, DomainError, ErrorCode};
use crate::ports::{ConversationReader, ConversationView};

/// Query to get a conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub component_id: ComponentId,
}

/// Handler for getting conversations.
pub struct GetConversationHandler {
    reader: Arc<dyn ConversationReader>,
}

impl GetConversationHandler {
    pub fn new(reader: Arc<dyn ConversationReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<ConversationView, DomainError> {
        match self.reader.get_by_component(&query.component_id).await {
            Ok(Some(view)) => Ok(view),
            Ok(None) => Err(DomainError::new(
                ErrorCode::ConversationNotFound,
                format!("No conversation found for component {}", query.component_id),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn get_by_id(&self, conversation_id: &ConversationId) -> Result<ConversationView, DomainError> {
        match self.reader.get(conversation_id).await {
            Ok(Some(view)) => Ok(view),
            Ok(None) => Err(DomainError::new(
                ErrorCode::ConversationNotFound,
                format!("Conversation not found: {}", conversation_id),
            )),
            Err(e) => Err(e),
        }
    }
}
