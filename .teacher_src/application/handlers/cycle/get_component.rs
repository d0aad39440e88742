//! GetComponentHandler - Query handler for retrieving a component's details.
//!
//! Returns the full component data including status and output.
//! Uses CycleRepository to access the aggregate for full output data.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ComponentStatus, ComponentType, CycleId, DomainError, ErrorCode};
use crate::ports::CycleRepository;

/// Query to get a component from a cycle.
#[derive(Debug, Clone)]
pub struct GetComponentQuery {
    /// The cycle containing the component.
    pub cycle_id: CycleId,
    /// The component type to retrieve.
    pub component_type: ComponentType,
}

/// Result of successful component query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetComponentResult {
    /// The cycle ID.
    pub cycle_id: CycleId,
    /// The component type.
    pub component_type: ComponentType,
    /// The component status.
    pub status: ComponentStatus,
    /// The component output as JSON.
    pub output: serde_json::Value,
}

/// Error type for getting a component.
#[derive(Debug, Clone)]
pub enum GetComponentError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Component not found.
    ComponentNotFound(CycleId, ComponentType),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for GetComponentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetComponentError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            GetComponentError::ComponentNotFound(cycle_id, ct) => {
                write!(f, "Component {:?} not found in cycle: {}", ct, cycle_id)
            }
            GetComponentError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for GetComponentError {}

impl From<DomainError> for GetComponentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::CycleNotFound => GetComponentError::CycleNotFound(CycleId::new()),
            ErrorCode::ComponentNotFound => {
                GetComponentError::ComponentNotFound(CycleId::new(), ComponentType::IssueRaising)
            }
            _ => GetComponentError::Infrastructure(err.message),
        }
    }
}

/// Handler for retrieving component details.
///
/// Uses CycleRepository to access the aggregate for full output data.
/// This is a pragmatic approach - a dedicated ComponentReader port
/// could be added for performance optimization in the future.
pub struct GetComponentHandler {
    cycle_repository: Arc<dyn CycleRepository>,
}

impl GetComponentHandler {
    pub fn new(cycle_repository: Arc<dyn CycleRepository>) -> Self {
        Self { cycle_repository }
    }

    pub async fn handle(
        &self,
        query: GetComponentQuery,
    ) -> Result<GetComponentResult, GetComponentError> {
        // Get the cycle
        let cycle = self
            .cycle_repository
            .find_by_id(&query.cycle_id)
            .await?
            .ok_or(GetComponentError::CycleNotFound(query.cycle_id))?;

        // Get the component
        let component = cycle.component(query.component_type).ok_or(
            GetComponentError::ComponentNotFound(query.cycle_id, query.component_type),
        )?;

        Ok(GetComponentResult {
            cycle_id: query.cycle_id,
            component_type: query.component_type,
            status: component.status(),
            output: component.output_as_value(),
        })
    }
}
