//! UpdateDocumentFromEditHandler - Command handler for bidirectional document sync.
//!
//! Parses edited markdown content and updates both the document and
//! the cycle's component outputs, enabling bidirectional synchronization.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, ComponentType, CycleId, DecisionDocumentId, DomainError,
};
use crate::ports::{
    CycleRepository, DecisionDocumentRepository, DocumentError, DocumentParser, ParseResult,
};

/// Command to update a document from user edits.
#[derive(Debug, Clone)]
pub struct UpdateDocumentFromEditCommand {
    /// Document to update.
    pub document_id: DecisionDocumentId,
    /// Edited markdown content.
    pub content: String,
    /// Whether to update component outputs from parsed data.
    pub sync_to_components: bool,
}

impl UpdateDocumentFromEditCommand {
    /// Creates a command for full bidirectional sync.
    pub fn sync(document_id: DecisionDocumentId, content: String) -> Self {
        Self {
            document_id,
            content,
            sync_to_components: true,
        }
    }

    /// Creates a command for document-only update (no component sync).
    pub fn document_only(document_id: DecisionDocumentId, content: String) -> Self {
        Self {
            document_id,
            content,
            sync_to_components: false,
        }
    }
}

/// Result of successful document update.
#[derive(Debug, Clone)]
pub struct UpdateDocumentFromEditResult {
    /// The updated document ID.
    pub document_id: DecisionDocumentId,
    /// The cycle ID.
    pub cycle_id: CycleId,
    /// The new version number.
    pub version: u32,
    /// Parse result with any warnings.
    pub parse_result: ParseResultSummary,
    /// Number of components updated.
    pub components_updated: usize,
}

/// Summary of parse result for the response.
#[derive(Debug, Clone)]
pub struct ParseResultSummary {
    /// Number of sections successfully parsed.
    pub sections_parsed: usize,
    /// Number of warnings generated.
    pub warnings: usize,
    /// Number of errors generated.
    pub errors: usize,
}

impl From<&ParseResult> for ParseResultSummary {
    fn from(result: &ParseResult) -> Self {
        Self {
            sections_parsed: result.successful_section_count(),
            warnings: result.warnings.len(),
            errors: result.errors.len(),
        }
    }
}

/// Error type for document update.
#[derive(Debug, Clone)]
pub enum UpdateDocumentFromEditError {
    /// Document not found.
    DocumentNotFound(DecisionDocumentId),
    /// Cycle not found (data integrity issue).
    CycleNotFound(CycleId),
    /// Parse failed.
    ParseFailed(String),
    /// Failed to persist document.
    PersistFailed(String),
    /// Optimistic locking conflict.
    VersionConflict { expected: u32, actual: u32 },
    /// Domain error.
    Domain(DomainError),
}

impl std::fmt::Display for UpdateDocumentFromEditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateDocumentFromEditError::DocumentNotFound(id) => {
                write!(f, "Document not found: {}", id)
            }
            UpdateDocumentFromEditError::CycleNotFound(id) => {
                write!(f, "Cycle not found (data integrity issue): {}", id)
            }
            UpdateDocumentFromEditError::ParseFailed(msg) => write!(f, "Parse failed: {}", msg),
            UpdateDocumentFromEditError::PersistFailed(msg) => {
                write!(f, "Failed to persist: {}", msg)
            }
            UpdateDocumentFromEditError::VersionConflict { expected, actual } => {
                write!(
                    f,
                    "Version conflict: expected v{}, found v{}",
                    expected, actual
                )
            }
            UpdateDocumentFromEditError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for UpdateDocumentFromEditError {}

impl From<DomainError> for UpdateDocumentFromEditError {
    fn from(err: DomainError) -> Self {
        UpdateDocumentFromEditError::Domain(err)
    }
}

impl From<DocumentError> for UpdateDocumentFromEditError {
    fn from(err: DocumentError) -> Self {
        UpdateDocumentFromEditError::ParseFailed(err.to_string())
    }
}

/// Handler for updating documents from user edits.
///
/// # Dependencies
///
/// - `DocumentParser`: Parse markdown back to structured data
/// - `DecisionDocumentRepository`: Persist document changes
/// - `CycleRepository`: Update component outputs (if syncing)
///
/// # Update Flow
///
/// 1. Find the existing document
/// 2. Parse the new content
/// 3. If sync enabled, update cycle components
/// 4. Update document content and version
/// 5. Persist changes
///
/// # Usage
///
/// ```rust,ignore
/// let handler = UpdateDocumentFromEditHandler::new(parser, doc_repo, cycle_repo);
/// let cmd = UpdateDocumentFromEditCommand::sync(doc_id, edited_content);
/// let result = handler.handle(cmd, metadata).await?;
/// println!("Updated {} components", result.components_updated);
/// ```
pub struct UpdateDocumentFromEditHandler {
    document_parser: Arc<dyn DocumentParser>,
    document_repository: Arc<dyn DecisionDocumentRepository>,
    cycle_repository: Arc<dyn CycleRepository>,
}

impl UpdateDocumentFromEditHandler {
    pub fn new(
        document_parser: Arc<dyn DocumentParser>,
        document_repository: Arc<dyn DecisionDocumentRepository>,
        cycle_repository: Arc<dyn CycleRepository>,
    ) -> Self {
        Self {
            document_parser,
            document_repository,
            cycle_repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateDocumentFromEditCommand,
        _metadata: CommandMetadata,
    ) -> Result<UpdateDocumentFromEditResult, UpdateDocumentFromEditError> {
        // 1. Find the document
        let mut document = self
            .document_repository
            .find_by_id(cmd.document_id)
            .await?
            .ok_or(UpdateDocumentFromEditError::DocumentNotFound(cmd.document_id))?;

        let cycle_id = document.cycle_id();

        // 2. Parse the new content
        let parse_result = self.document_parser.parse(&cmd.content)?;

        // Check for critical parse errors
        if parse_result.has_errors() {
            return Err(UpdateDocumentFromEditError::ParseFailed(format!(
                "Document has {} parse errors",
                parse_result.errors.len()
            )));
        }

        // 3. If sync to components is enabled, update the cycle
        let mut components_updated = 0;

        if cmd.sync_to_components {
            let mut cycle = self
                .cycle_repository
                .find_by_id(&cycle_id)
                .await?
                .ok_or(UpdateDocumentFromEditError::CycleNotFound(cycle_id))?;

            // Update each successfully parsed section
            for section in &parse_result.sections {
                if section.is_successful() {
                    if let Some(data) = &section.parsed_data {
                        // Update the component output in the cycle
                        if self.update_component_output(&mut cycle, section.component_type, data) {
                            components_updated += 1;
                        }
                    }
                }
            }

            // Persist cycle changes
            if components_updated > 0 {
                self.cycle_repository
                    .update(&cycle)
                    .await
                    .map_err(|e| UpdateDocumentFromEditError::PersistFailed(e.to_string()))?;
            }
        }

        // 4. Update document
        document.update_from_user_edit(&cmd.content);

        // 5. Persist document
        self.document_repository
            .update(&document, &cmd.content)
            .await
            .map_err(|e| UpdateDocumentFromEditError::PersistFailed(e.to_string()))?;

        Ok(UpdateDocumentFromEditResult {
            document_id: cmd.document_id,
            cycle_id,
            version: document.version().as_u32(),
            parse_result: ParseResultSummary::from(&parse_result),
            components_updated,
        })
    }

    /// Updates a component's output with parsed data.
    ///
    /// Returns true if the component was updated.
    fn update_component_output(
        &self,
        cycle: &mut crate::domain::cycle::Cycle,
        component_type: ComponentType,
        data: &serde_json::Value,
    ) -> bool {
        // Skip empty data
        if data.is_null() || (data.is_object() && data.as_object().unwrap().is_empty()) {
            return false;
        }

        // Get the component if it exists
        if let Some(component) = cycle.component_mut(component_type) {
            // Update the output - ignore errors for now (best effort)
            if component.set_output_from_value(data.clone()).is_ok() {
                return true;
            }
        }

        // Component doesn't exist or update failed
        false
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
