//! Agent phases within a conversation.
//!
//! Phases guide the AI agent's behavior during an active conversation.
//! Unlike ConversationState (which tracks lifecycle), phases determine
//! what kind of dialogue the agent should engage in.

use serde::{Deserialize, Serialize};

/// The current phase of AI agent behavior within an active conversation.
///
/// Phases flow in a general order but can loop or backtrack:
/// - `Intro` → `Gather` → `Clarify` (optional) → `Extract` → `Confirm`
///
/// Each phase has a distinct directive that guides the AI's responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// Initial greeting and context setting.
    /// AI explains what this step covers and makes user comfortable.
    Intro,

    /// Actively gathering information through questions.
    /// AI asks probing questions and listens actively.
    Gather,

    /// Clarifying ambiguities or inconsistencies.
    /// AI resolves unclear points before continuing.
    Clarify,

    /// Extracting structured data from conversation.
    /// AI synthesizes conversation into component-specific output.
    Extract,

    /// Confirming extracted data with user.
    /// AI presents results and asks for corrections or approval.
    Confirm,
}

impl AgentPhase {
    /// Returns the AI's primary directive in this phase.
    ///
    /// This directive guides the tone and purpose of the AI's responses.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Intro => "Set context and make user comfortable. Explain what this step covers.",
            Self::Gather => "Ask probing questions to elicit information. Listen actively.",
            Self::Clarify => "Resolve ambiguities. Ask follow-up questions on unclear points.",
            Self::Extract => "Synthesize conversation into structured output format.",
            Self::Confirm => "Present extracted data to user. Ask for corrections or approval.",
        }
    }

    /// Returns a shorter label for the phase, suitable for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intro => "Introduction",
            Self::Gather => "Gathering",
            Self::Clarify => "Clarifying",
            Self::Extract => "Extracting",
            Self::Confirm => "Confirming",
        }
    }

    /// Returns true if this phase typically generates AI-initiated responses.
    ///
    /// The Extract phase is primarily a processing phase where AI generates
    /// structured data rather than conversational responses.
    pub fn is_ai_speaking(&self) -> bool {
        !matches!(self, Self::Extract)
    }

    /// Returns true if the phase expects user input.
    pub fn expects_user_input(&self) -> bool {
        matches!(self, Self::Intro | Self::Gather | Self::Clarify | Self::Confirm)
    }

    /// Returns true if this phase involves data extraction or confirmation.
    pub fn is_extraction_related(&self) -> bool {
        matches!(self, Self::Extract | Self::Confirm)
    }

    /// Returns all valid next phases from this phase.
    ///
    /// Note: This is distinct from StateMachine - phases can branch and loop.
    pub fn valid_next_phases(&self) -> Vec<Self> {
        match self {
            Self::Intro => vec![Self::Gather],
            Self::Gather => vec![Self::Gather, Self::Clarify, Self::Extract],
            Self::Clarify => vec![Self::Gather, Self::Extract],
            Self::Extract => vec![Self::Confirm],
            Self::Confirm => vec![Self::Gather],
        }
    }

    /// Returns true if transition to target phase is valid.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_next_phases().contains(target)
    }
}

impl Default for AgentPhase {
    fn default() -> Self {
        Self::Intro
    }
}
