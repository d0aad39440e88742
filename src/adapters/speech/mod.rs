//! Speech boundary adapters.
//!
//! Real STT/TTS engines live outside this core; these adapters cover
//! deployments without one.

mod unavailable;

pub use unavailable::UnavailableSpeech;
