//! BranchWithDocumentHandler - Branches a cycle and creates its document.
//!
//! This handler coordinates the cycle branching with document creation,
//! ensuring that when a user branches at a component, they get both
//! a new cycle and a corresponding document artifact.

use std::sync::Arc;

use crate::domain::cycle::{Cycle, DecisionDocument};
use crate::domain::foundation::{ComponentType, CycleId, DomainError, UserId};
use crate::ports::{
    CycleRepository, DecisionDocumentRepository, DocumentGenerator, GenerationOptions,
    SessionRepository,
};

/// Command to branch a cycle and create its document.
#[derive(Debug, Clone)]
pub struct BranchWithDocumentCommand {
    /// The cycle to branch from.
    pub parent_cycle_id: CycleId,
    /// The component where branching occurs.
    pub branch_point: ComponentType,
    /// Optional label for the branch (e.g., "Remote Option").
    pub branch_label: Option<String>,
    /// The user performing the branch.
    pub user_id: UserId,
}

/// Result of successful branch with document creation.
#[derive(Debug, Clone)]
pub struct BranchWithDocumentResult {
    /// The newly created branch cycle.
    pub branch_cycle: Cycle,
    /// The document created for the branch.
    pub document: DecisionDocument,
    /// The generated document content.
    pub content: String,
}

/// Error type for branch with document operations.
#[derive(Debug, Clone)]
pub enum BranchWithDocumentError {
    /// Parent cycle not found.
    CycleNotFound(CycleId),
    /// Parent document not found.
    ParentDocumentNotFound(CycleId),
    /// Session not found.
    SessionNotFound,
    /// Domain error (e.g., invalid branch point).
    Domain(DomainError),
    /// Document generation failed.
    GenerationFailed(String),
}

impl std::fmt::Display for BranchWithDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchWithDocumentError::CycleNotFound(id) => {
                write!(f, "Cycle not found: {}", id)
            }
            BranchWithDocumentError::ParentDocumentNotFound(id) => {
                write!(f, "Parent document not found for cycle: {}", id)
            }
            BranchWithDocumentError::SessionNotFound => {
                write!(f, "Session not found")
            }
            BranchWithDocumentError::Domain(err) => write!(f, "{}", err),
            BranchWithDocumentError::GenerationFailed(msg) => {
                write!(f, "Document generation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for BranchWithDocumentError {}

impl From<DomainError> for BranchWithDocumentError {
    fn from(err: DomainError) -> Self {
        BranchWithDocumentError::Domain(err)
    }
}

/// Handler for branching cycles with document creation.
pub struct BranchWithDocumentHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    session_repository: Arc<dyn SessionRepository>,
    document_repository: Arc<dyn DecisionDocumentRepository>,
    document_generator: Arc<dyn DocumentGenerator>,
}

impl BranchWithDocumentHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        session_repository: Arc<dyn SessionRepository>,
        document_repository: Arc<dyn DecisionDocumentRepository>,
        document_generator: Arc<dyn DocumentGenerator>,
    ) -> Self {
        Self {
            cycle_repository,
            session_repository,
            document_repository,
            document_generator,
        }
    }

    pub async fn handle(
        &self,
        cmd: BranchWithDocumentCommand,
    ) -> Result<BranchWithDocumentResult, BranchWithDocumentError> {
        // 1. Find the parent cycle
        let parent_cycle = self
            .cycle_repository
            .find_by_id(&cmd.parent_cycle_id)
            .await?
            .ok_or(BranchWithDocumentError::CycleNotFound(cmd.parent_cycle_id))?;

        // 2. Find the session for the title
        let session = self
            .session_repository
            .find_by_id(&parent_cycle.session_id())
            .await?
            .ok_or(BranchWithDocumentError::SessionNotFound)?;

        // 3. Get the parent document (if it exists)
        let parent_document = self
            .document_repository
            .find_by_cycle(parent_cycle.id())
            .await?;

        // 4. Branch the cycle (domain logic handles validation)
        let branch_cycle = parent_cycle.branch_at(cmd.branch_point)?;

        // 5. Persist the branched cycle
        self.cycle_repository.save(&branch_cycle).await?;

        // 6. Generate document content for the branch
        let branch_label = cmd.branch_label.clone().unwrap_or_else(|| {
            format!("Branch at {}", cmd.branch_point.display_name())
        });

        let options = GenerationOptions::full();
        let content = self
            .document_generator
            .generate(session.title(), &branch_cycle, options)
            .map_err(|e| BranchWithDocumentError::GenerationFailed(e.to_string()))?;

        // 7. Create the branched document
        let document = if let Some(ref parent_doc) = parent_document {
            DecisionDocument::new_branch(
                branch_cycle.id(),
                cmd.user_id.clone(),
                parent_doc.id(),
                cmd.branch_point,
                &branch_label,
                &content,
            )
        } else {
            // No parent document - create a new document for the branch
            DecisionDocument::new(branch_cycle.id(), cmd.user_id.clone(), &content)
        };

        // 8. Persist the document
        self.document_repository.save(&document, &content).await?;

        Ok(BranchWithDocumentResult {
            branch_cycle,
            document,
            content,
        })
    }
}
