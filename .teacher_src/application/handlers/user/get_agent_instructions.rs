//! GetAgentInstructions - Query handler for retrieving agent personalization instructions.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::DecisionDomain;
use crate::ports::{AgentInstructions, ProfileReader};

/// Query to get agent instructions based on profile.
#[derive(Debug, Clone)]
pub struct GetAgentInstructionsQuery {
    pub user_id: UserId,
    pub domain: Option<DecisionDomain>,
}

/// Handler for getting agent instructions.
pub struct GetAgentInstructionsHandler {
    reader: Arc<dyn ProfileReader>,
}

impl GetAgentInstructionsHandler {
    pub fn new(reader: Arc<dyn ProfileReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetAgentInstructionsQuery,
    ) -> Result<Option<AgentInstructions>, DomainError> {
        self.reader
            .get_agent_instructions(&query.user_id, query.domain)
            .await
    }
}
