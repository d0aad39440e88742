//! GetProactTreeViewHandler - Query handler for retrieving the PrOACT tree visualization.
//!
//! Returns the hierarchical tree of cycles with PrOACT letter statuses for
//! each node, optimized for the cycle tree browser UI component.

use std::sync::Arc;

use crate::domain::cycle::CycleTreeNode as PrOACTTreeNode;
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::CycleReader;

/// Query to get the PrOACT tree view for a session.
#[derive(Debug, Clone)]
pub struct GetProactTreeViewQuery {
    /// The session to get the PrOACT tree for.
    pub session_id: SessionId,
}

/// Result of successful PrOACT tree query.
pub type GetProactTreeViewResult = Option<PrOACTTreeNode>;

/// Handler for retrieving the PrOACT tree visualization.
///
/// Returns the root cycle with all branches organized hierarchically,
/// with PrOACT letter statuses (P-r-O-A-C-T) for each node.
pub struct GetProactTreeViewHandler {
    reader: Arc<dyn CycleReader>,
}

impl GetProactTreeViewHandler {
    pub fn new(reader: Arc<dyn CycleReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetProactTreeViewQuery) -> Result<GetProactTreeViewResult, DomainError> {
        self.reader.get_proact_tree_view(&query.session_id).await
    }
}
