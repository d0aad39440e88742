//! Application command and query handlers.

pub mod dialogue;
pub mod session;

pub use dialogue::{
    DialogueReply, GetSessionStateHandler, GetSessionStateQuery, SubmitUtteranceCommand,
    SubmitUtteranceHandler, UtteranceInput,
};
pub use session::{
    CloseSessionCommand, CloseSessionHandler, CloseSessionResult, CreateSessionCommand,
    CreateSessionHandler, CreateSessionResult, SessionTimeoutSweeper,
};
