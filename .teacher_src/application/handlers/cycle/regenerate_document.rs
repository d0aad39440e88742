//! RegenerateDocumentHandler - Command handler for regenerating and persisting decision documents.
//!
//! Regenerates a markdown decision document from a cycle's current state and
//! persists it to both the database and filesystem.

use std::sync::Arc;

use crate::domain::cycle::DecisionDocument;
use crate::domain::foundation::{CommandMetadata, CycleId, DecisionDocumentId, DomainError, SessionId};
use crate::ports::{
    CycleRepository, DecisionDocumentRepository, DocumentError, DocumentFormat, DocumentGenerator,
    GenerationOptions, SessionRepository,
};

/// Command to regenerate a decision document.
#[derive(Debug, Clone)]
pub struct RegenerateDocumentCommand {
    /// Cycle to regenerate document for.
    pub cycle_id: CycleId,
    /// Output format.
    pub format: DocumentFormat,
}

impl RegenerateDocumentCommand {
    /// Creates a command for full document regeneration.
    pub fn full(cycle_id: CycleId) -> Self {
        Self {
            cycle_id,
            format: DocumentFormat::Full,
        }
    }

    /// Creates a command for summary document regeneration.
    pub fn summary(cycle_id: CycleId) -> Self {
        Self {
            cycle_id,
            format: DocumentFormat::Summary,
        }
    }
}

/// Result of successful document regeneration.
#[derive(Debug, Clone)]
pub struct RegenerateDocumentResult {
    /// The regenerated document ID.
    pub document_id: DecisionDocumentId,
    /// The cycle ID the document was regenerated from.
    pub cycle_id: CycleId,
    /// The session ID.
    pub session_id: SessionId,
    /// The new version number.
    pub version: u32,
    /// The regenerated markdown content.
    pub content: String,
    /// The format used.
    pub format: DocumentFormat,
    /// Whether this was a new document or an update.
    pub is_new: bool,
}

/// Error type for document regeneration.
#[derive(Debug, Clone)]
pub enum RegenerateDocumentError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Session not found (data integrity issue).
    SessionNotFound(SessionId),
    /// Document generation failed.
    GenerationFailed(String),
    /// Failed to persist document.
    PersistFailed(String),
    /// Domain error.
    Domain(DomainError),
}

impl std::fmt::Display for RegenerateDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegenerateDocumentError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            RegenerateDocumentError::SessionNotFound(id) => {
                write!(f, "Session not found (data integrity issue): {}", id)
            }
            RegenerateDocumentError::GenerationFailed(msg) => {
                write!(f, "Document generation failed: {}", msg)
            }
            RegenerateDocumentError::PersistFailed(msg) => {
                write!(f, "Failed to persist document: {}", msg)
            }
            RegenerateDocumentError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RegenerateDocumentError {}

impl From<DomainError> for RegenerateDocumentError {
    fn from(err: DomainError) -> Self {
        RegenerateDocumentError::Domain(err)
    }
}

impl From<DocumentError> for RegenerateDocumentError {
    fn from(err: DocumentError) -> Self {
        RegenerateDocumentError::GenerationFailed(err.to_string())
    }
}

/// Handler for regenerating and persisting decision documents.
///
/// # Dependencies
///
/// - `CycleRepository`: Read cycle state
/// - `SessionRepository`: Read session title and owner
/// - `DocumentGenerator`: Generate markdown content
/// - `DecisionDocumentRepository`: Persist documents
///
/// # Regeneration Flow
///
/// 1. Find the cycle and session
/// 2. Generate fresh markdown content from cycle state
/// 3. Find existing document or create new one
/// 4. Update content and version
/// 5. Persist to dual storage (DB + filesystem)
///
/// # Usage
///
/// ```rust,ignore
/// let handler = RegenerateDocumentHandler::new(cycle_repo, session_repo, generator, doc_repo);
/// let cmd = RegenerateDocumentCommand::full(cycle_id);
/// let result = handler.handle(cmd, metadata).await?;
/// println!("Regenerated document v{}", result.version);
/// ```
pub struct RegenerateDocumentHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    session_repository: Arc<dyn SessionRepository>,
    document_generator: Arc<dyn DocumentGenerator>,
    document_repository: Arc<dyn DecisionDocumentRepository>,
}

impl RegenerateDocumentHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        session_repository: Arc<dyn SessionRepository>,
        document_generator: Arc<dyn DocumentGenerator>,
        document_repository: Arc<dyn DecisionDocumentRepository>,
    ) -> Self {
        Self {
            cycle_repository,
            session_repository,
            document_generator,
            document_repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: RegenerateDocumentCommand,
        _metadata: CommandMetadata,
    ) -> Result<RegenerateDocumentResult, RegenerateDocumentError> {
        // 1. Find the cycle
        let cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(RegenerateDocumentError::CycleNotFound(cmd.cycle_id))?;

        // 2. Find the session (for title and user)
        let session_id = cycle.session_id();
        let session = self
            .session_repository
            .find_by_id(&session_id)
            .await?
            .ok_or(RegenerateDocumentError::SessionNotFound(session_id))?;

        // 3. Build generation options
        let options = GenerationOptions {
            format: cmd.format.clone(),
            include_empty_sections: matches!(cmd.format, DocumentFormat::Full),
            include_metadata: matches!(cmd.format, DocumentFormat::Full),
            include_version_info: true,
        };

        // 4. Generate the document
        let content = self
            .document_generator
            .generate(session.title(), &cycle, options)?;

        // 5. Check if document exists for this cycle
        let existing_doc = self.document_repository.find_by_cycle(cmd.cycle_id).await?;

        let (document_id, version, is_new) = match existing_doc {
            Some(mut doc) => {
                // Update existing document
                doc.update_from_components(&content);
                let doc_id = doc.id();
                let version = doc.version().as_u32();

                self.document_repository
                    .update(&doc, &content)
                    .await
                    .map_err(|e| RegenerateDocumentError::PersistFailed(e.to_string()))?;

                (doc_id, version, false)
            }
            None => {
                // Create new document
                let user_id = session.user_id().clone();
                let doc = DecisionDocument::new(cmd.cycle_id, user_id, &content);
                let doc_id = doc.id();
                let version = doc.version().as_u32();

                self.document_repository
                    .save(&doc, &content)
                    .await
                    .map_err(|e| RegenerateDocumentError::PersistFailed(e.to_string()))?;

                (doc_id, version, true)
            }
        };

        Ok(RegenerateDocumentResult {
            document_id,
            cycle_id: cmd.cycle_id,
            session_id,
            version,
            content,
            format: cmd.format,
            is_new,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
