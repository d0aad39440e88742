//! IssueRaising component - categorizes initial thoughts from user's brain dump.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ComponentId, ComponentStatus, ComponentType, Timestamp};

use super::{Component, ComponentBase, ComponentError};

/// Categorized outputs from user's initial brain dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueRaisingOutput {
    /// Things that need to be chosen/decided.
    pub potential_decisions: Vec<String>,

    /// Things that matter to the user.
    pub objectives: Vec<String>,

    /// Things that are unknown.
    pub uncertainties: Vec<String>,

    /// Process constraints, facts, stakeholders.
    pub considerations: Vec<String>,

    /// Whether user has validated the categorization.
    pub user_confirmed: bool,
}

/// The IssueRaising component.
#[derive(Debug, Clone)]
pub struct IssueRaising {
    base: ComponentBase,
    output: IssueRaisingOutput,
}

impl IssueRaising {
    /// Creates a new IssueRaising component.
    pub fn new() -> Self {
        Self {
            base: ComponentBase::new(ComponentType::IssueRaising),
            output: IssueRaisingOutput::default(),
        }
    }

    /// Reconstitutes an IssueRaising component from persisted data.
    pub(crate) fn reconstitute(base: ComponentBase, output: IssueRaisingOutput) -> Self {
        Self { base, output }
    }

    /// Returns the output.
    pub fn output(&self) -> &IssueRaisingOutput {
        &self.output
    }

    /// Sets the output.
    pub fn set_output(&mut self, output: IssueRaisingOutput) {
        self.output = output;
        self.base.touch();
    }

    /// Adds a potential decision.
    pub fn add_potential_decision(&mut self, decision: String) {
        self.output.potential_decisions.push(decision);
        self.base.touch();
    }

    /// Adds an objective.
    pub fn add_objective(&mut self, objective: String) {
        self.output.objectives.push(objective);
        self.base.touch();
    }

    /// Adds an uncertainty.
    pub fn add_uncertainty(&mut self, uncertainty: String) {
        self.output.uncertainties.push(uncertainty);
        self.base.touch();
    }

    /// Adds a consideration.
    pub fn add_consideration(&mut self, consideration: String) {
        self.output.considerations.push(consideration);
        self.base.touch();
    }

    /// Marks the categorization as confirmed by user.
    pub fn confirm(&mut self) {
        self.output.user_confirmed = true;
        self.base.touch();
    }

    /// Returns true if user has confirmed the categorization.
    pub fn is_confirmed(&self) -> bool {
        self.output.user_confirmed
    }
}

impl Default for IssueRaising {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for IssueRaising {
    fn id(&self) -> ComponentId {
        self.base.id
    }

    fn component_type(&self) -> ComponentType {
        self.base.component_type
    }

    fn status(&self) -> ComponentStatus {
        self.base.status
    }

    fn created_at(&self) -> Timestamp {
        self.base.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.base.updated_at
    }

    fn start(&mut self) -> Result<(), ComponentError> {
        self.base.start()
    }

    fn complete(&mut self) -> Result<(), ComponentError> {
        self.base.complete()
    }

    fn mark_for_revision(&mut self, reason: String) -> Result<(), ComponentError> {
        self.base.mark_for_revision(reason)
    }

    fn output_as_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.output).unwrap_or_default()
    }

    fn set_output_from_value(&mut self, value: serde_json::Value) -> Result<(), ComponentError> {
        self.output = serde_json::from_value(value)
            .map_err(|e| ComponentError::InvalidOutput(e.to_string()))?;
        self.base.touch();
        Ok(())
    }
}
