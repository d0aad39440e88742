//! Dialogue turn handlers.

mod get_session_state;
mod submit_utterance;

pub use get_session_state::{GetSessionStateHandler, GetSessionStateQuery};
pub use submit_utterance::{
    DialogueReply, SubmitUtteranceCommand, SubmitUtteranceHandler, UtteranceInput,
};
