//! Application layer - command handlers wiring ports together.
//!
//! The handlers orchestrate domain operations across the ports; the
//! `DialogueEngine` facade is the surface a host application talks to,
//! and the `SyncCoordinator` runs the offline/online boundary.

mod device;
mod engine;
pub mod handlers;
mod session_locks;
pub mod sync;

pub use device::DeviceIdentity;
pub use engine::{DialogueEngine, EngineSettings};
pub use handlers::{
    CloseSessionCommand, CloseSessionHandler, CloseSessionResult, CreateSessionCommand,
    CreateSessionHandler, CreateSessionResult, DialogueReply, GetSessionStateHandler,
    GetSessionStateQuery, SessionTimeoutSweeper, SubmitUtteranceCommand, SubmitUtteranceHandler,
    UtteranceInput,
};
pub use session_locks::SessionLocks;
pub use sync::{
    SyncCoordinator, SyncErrorSummary, SyncReport, SyncSettings, SyncStatus, SyncStatusBoard,
};
