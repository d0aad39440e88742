//! Value Objects for AI Engine Domain
//!
//! These types represent domain concepts that are defined by their attributes
//! rather than an identity. They are immutable and can be freely copied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::foundation::ComponentType;

/// User's intent derived from their message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserIntent {
    /// Continue working on current step
    Continue,
    /// Navigate to a specific step
    Navigate(ComponentType),
    /// Create an alternate cycle branch
    Branch,
    /// Request summary of current state
    Summarize,
    /// Signal completion of current step
    Complete,
}

/// Summary of a completed step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepSummary {
    pub component: ComponentType,
    pub summary: String,
    pub key_outputs: Vec<String>,
    pub conflicts: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl StepSummary {
    /// Create a new step summary
    pub fn new(
        component: ComponentType,
        summary: String,
        key_outputs: Vec<String>,
        conflicts: Vec<String>,
    ) -> Self {
        Self {
            component,
            summary,
            key_outputs,
            conflicts,
            completed_at: Utc::now(),
        }
    }

    /// Check if the summary is empty
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.key_outputs.is_empty()
    }
}

/// Context passed to a step agent
#[derive(Debug, Clone)]
pub struct StepContext {
    pub component: ComponentType,
    pub prior_summaries: Vec<StepSummary>,
    pub relevant_outputs: HashMap<ComponentType, String>,
}

impl StepContext {
    /// Create a new step context
    pub fn new(component: ComponentType) -> Self {
        Self {
            component,
            prior_summaries: Vec::new(),
            relevant_outputs: HashMap::new(),
        }
    }

    /// Add a prior step summary
    pub fn with_summary(mut self, summary: StepSummary) -> Self {
        self.prior_summaries.push(summary);
        self
    }

    /// Add relevant output from another step
    pub fn with_output(mut self, component: ComponentType, output: String) -> Self {
        self.relevant_outputs.insert(component, output);
        self
    }

    /// Get summaries for a specific component
    pub fn summaries_for(&self, component: ComponentType) -> Vec<&StepSummary> {
        self.prior_summaries
            .iter()
            .filter(|s| s.component == component)
            .collect()
    }
}

/// Trait for structured output from any step
pub trait StructuredOutput: Send + Sync {
    fn component(&self) -> ComponentType;
    fn validate(&self) -> Result<(), ValidationError>;
    fn to_yaml(&self) -> Result<String, SerializationError>;
    fn as_any(&self) -> &dyn Any;
}

/// Cycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleStatus {
    Draft,
    InProgress,
    Completed,
    Abandoned,
}

/// Message ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Create a new message ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Validation error
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid field value: {field} - {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("Validation failed: {0}")]
    Failed(String),
}

/// Serialization error
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SerializationError {
    #[error("Serialization failed: {0}")]
    Failed(String),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}
