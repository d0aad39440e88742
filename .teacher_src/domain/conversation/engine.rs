//! Phase transition engine.
//!
//! Determines when to transition between agent phases based on
//! conversation context and component-specific rules.

use crate::domain::foundation::ComponentType;
use super::phase::AgentPhase;

/// Configuration for component-specific phase transition behavior.
#[derive(Debug, Clone)]
pub struct PhaseTransitionConfig {
    /// Minimum user messages before extraction can begin.
    pub min_messages_for_extraction: usize,
    /// Keywords that signal user is done providing input.
    pub completion_signals: Vec<String>,
    /// Keywords that trigger clarification.
    pub clarify_triggers: Vec<String>,
}

impl Default for PhaseTransitionConfig {
    fn default() -> Self {
        Self {
            min_messages_for_extraction: 3,
            completion_signals: vec![
                "done".to_string(),
                "that's all".to_string(),
                "that's it".to_string(),
                "nothing else".to_string(),
                "no more".to_string(),
                "ready".to_string(),
            ],
            clarify_triggers: vec![
                "?".to_string(),
                "not sure".to_string(),
                "maybe".to_string(),
                "unclear".to_string(),
                "confused".to_string(),
            ],
        }
    }
}

impl PhaseTransitionConfig {
    /// Creates component-specific configuration.
    pub fn for_component(component_type: ComponentType) -> Self {
        match component_type {
            ComponentType::IssueRaising => Self {
                min_messages_for_extraction: 3,
                completion_signals: vec![
                    "done".to_string(),
                    "that's all".to_string(),
                    "that's everything".to_string(),
                ],
                ..Default::default()
            },
            ComponentType::ProblemFrame => Self {
                min_messages_for_extraction: 2,
                completion_signals: vec![
                    "that's the decision".to_string(),
                    "yes, that's right".to_string(),
                ],
                ..Default::default()
            },
            ComponentType::Objectives => Self {
                min_messages_for_extraction: 2,
                ..Default::default()
            },
            ComponentType::Alternatives => Self {
                min_messages_for_extraction: 2,
                ..Default::default()
            },
            ComponentType::Consequences => Self {
                min_messages_for_extraction: 4,
                ..Default::default()
            },
            ComponentType::Tradeoffs => Self {
                min_messages_for_extraction: 3,
                ..Default::default()
            },
            ComponentType::Recommendation => Self {
                min_messages_for_extraction: 2,
                ..Default::default()
            },
            ComponentType::DecisionQuality => Self {
                min_messages_for_extraction: 3,
                ..Default::default()
            },
            ComponentType::NotesNextSteps => Self {
                min_messages_for_extraction: 1,
                completion_signals: vec![
                    "done".to_string(),
                    "that's all".to_string(),
                    "ready to finish".to_string(),
                ],
                ..Default::default()
            },
        }
    }
}

/// Snapshot of conversation state for phase transition decisions.
#[derive(Debug, Clone)]
pub struct ConversationSnapshot {
    /// Number of user messages in the conversation.
    pub user_message_count: usize,
    /// Content of the most recent user message.
    pub latest_user_message: Option<String>,
    /// Type of component this conversation is for.
    pub component_type: ComponentType,
}

impl ConversationSnapshot {
    /// Creates a new conversation snapshot.
    pub fn new(
        user_message_count: usize,
        latest_user_message: Option<String>,
        component_type: ComponentType,
    ) -> Self {
        Self {
            user_message_count,
            latest_user_message,
            component_type,
        }
    }

    /// Returns true if the latest message contains a completion signal.
    pub fn contains_completion_signal(&self, signals: &[String]) -> bool {
        if let Some(msg) = &self.latest_user_message {
            let lower = msg.to_lowercase();
            signals.iter().any(|signal| lower.contains(&signal.to_lowercase()))
        } else {
            false
        }
    }

    /// Returns true if the latest message contains clarification triggers.
    pub fn contains_clarify_trigger(&self, triggers: &[String]) -> bool {
        if let Some(msg) = &self.latest_user_message {
            let lower = msg.to_lowercase();
            triggers.iter().any(|trigger| lower.contains(&trigger.to_lowercase()))
        } else {
            false
        }
    }

    /// Returns true if user appears to request changes.
    pub fn requests_changes(&self) -> bool {
        if let Some(msg) = &self.latest_user_message {
            let lower = msg.to_lowercase();
            let change_signals = [
                "change",
                "modify",
                "update",
                "wrong",
                "incorrect",
                "fix",
                "revise",
                "edit",
                "no, ",
                "not quite",
                "that's not",
            ];
            change_signals.iter().any(|signal| lower.contains(signal))
        } else {
            false
        }
    }

    /// Returns true if user appears to approve the current state.
    pub fn indicates_approval(&self) -> bool {
        if let Some(msg) = &self.latest_user_message {
            let lower = msg.to_lowercase();
            let approval_signals = [
                "looks good",
                "that's right",
                "correct",
                "yes",
                "approve",
                "confirm",
                "perfect",
                "good",
                "okay",
            ];
            approval_signals.iter().any(|signal| lower.contains(signal))
        } else {
            false
        }
    }
}

/// Engine for determining phase transitions based on conversation state.
#[derive(Debug, Clone)]
pub struct PhaseTransitionEngine {
    config: PhaseTransitionConfig,
}

impl PhaseTransitionEngine {
    /// Creates a new engine with the given configuration.
    pub fn new(config: PhaseTransitionConfig) -> Self {
        Self { config }
    }

    /// Creates an engine with default configuration for a component type.
    pub fn for_component(component_type: ComponentType) -> Self {
        Self::new(PhaseTransitionConfig::for_component(component_type))
    }

    /// Determines the next phase based on current state and conversation.
    pub fn next_phase(
        &self,
        current: AgentPhase,
        snapshot: &ConversationSnapshot,
    ) -> AgentPhase {
        match current {
            AgentPhase::Intro => self.transition_from_intro(snapshot),
            AgentPhase::Gather => self.transition_from_gather(snapshot),
            AgentPhase::Clarify => self.transition_from_clarify(snapshot),
            AgentPhase::Extract => self.transition_from_extract(),
            AgentPhase::Confirm => self.transition_from_confirm(snapshot),
        }
    }

    fn transition_from_intro(&self, snapshot: &ConversationSnapshot) -> AgentPhase {
        // Move to gather after first user message
        if snapshot.user_message_count >= 1 {
            AgentPhase::Gather
        } else {
            AgentPhase::Intro
        }
    }

    fn transition_from_gather(&self, snapshot: &ConversationSnapshot) -> AgentPhase {
        // Check for extraction readiness
        if self.is_ready_for_extraction(snapshot) {
            return AgentPhase::Extract;
        }

        // Check for clarification need
        if snapshot.contains_clarify_trigger(&self.config.clarify_triggers) {
            return AgentPhase::Clarify;
        }

        // Stay in gather
        AgentPhase::Gather
    }

    fn transition_from_clarify(&self, snapshot: &ConversationSnapshot) -> AgentPhase {
        // After clarification, check if ready for extraction
        if self.is_ready_for_extraction(snapshot) {
            AgentPhase::Extract
        } else {
            // Return to gathering
            AgentPhase::Gather
        }
    }

    fn transition_from_extract(&self) -> AgentPhase {
        // Always move to confirm after extraction
        AgentPhase::Confirm
    }

    fn transition_from_confirm(&self, snapshot: &ConversationSnapshot) -> AgentPhase {
        // If user requests changes, go back to gather
        if snapshot.requests_changes() {
            AgentPhase::Gather
        } else {
            // Stay in confirm (completion is handled via ConversationState)
            AgentPhase::Confirm
        }
    }

    /// Returns true if the conversation has enough information for extraction.
    pub fn is_ready_for_extraction(&self, snapshot: &ConversationSnapshot) -> bool {
        // Have enough messages
        let has_enough_messages =
            snapshot.user_message_count >= self.config.min_messages_for_extraction;

        // Or user has signaled completion
        let has_completion_signal =
            snapshot.contains_completion_signal(&self.config.completion_signals);

        has_enough_messages || has_completion_signal
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &PhaseTransitionConfig {
        &self.config
    }
}
