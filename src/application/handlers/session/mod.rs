//! Session lifecycle handlers.

mod close_session;
mod create_session;
mod timeout_sweeper;

pub use close_session::{CloseSessionCommand, CloseSessionHandler, CloseSessionResult};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use timeout_sweeper::SessionTimeoutSweeper;
