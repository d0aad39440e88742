//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Sahayak domain.

mod errors;
mod ids;
mod session_status;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DeviceTag, ItemId, MessageId, SessionId, UserId};
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
