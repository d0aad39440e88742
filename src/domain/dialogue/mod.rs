//! Dialogue policy - question vs. guidance vs. clarification.
//!
//! Pure synchronous logic; all I/O happens in the application layer.

mod decision;
mod policy;
mod speakable;
mod state;

pub use decision::{DialogueDecision, PolicyOutcome};
pub use policy::{DialoguePolicy, DEFAULT_CONFIDENCE_FLOOR, DEFAULT_DECLINE_BUDGET};
pub use speakable::speakable;
pub use state::DialogueState;
