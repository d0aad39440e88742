//! Context module - versioned, mergeable session and user state.
//!
//! The Context Store port persists these records; the Context Merger is
//! the single reconciliation path for live and synced updates.

mod cursor;
mod location;
mod merger;
mod message;
mod profile;
mod session_context;
mod slot;

pub use cursor::SyncCursor;
pub use location::{InferenceStrength, InferredLocation, LocationInfo};
pub use merger::{ContextMerger, MergeConflict, MergeOutcome, MergeReport};
pub use message::{Message, Role};
pub use profile::UserProfile;
pub use session_context::{ContextPatch, DialogueProgress, SessionContext};
pub use slot::{ContextField, Provenance, SlotState, SlotValue};
