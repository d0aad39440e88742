//! Speech ports - narrow contracts to external STT/TTS engines.
//!
//! The engines themselves (models, codecs) are out of scope; this core
//! only consumes their results. Transcripts below the retry floor are a
//! re-prompt signal, not a failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// A captured audio clip, opaque to this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioClip {
    /// Wraps raw audio bytes.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Result of transcribing an audio clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub confidence: f64,
    pub language: Option<String>,
}

/// Options for speech synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechOptions {
    pub language: Option<String>,
}

/// Speech-to-text boundary.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribes an audio clip.
    ///
    /// # Errors
    ///
    /// - `SpeechError` on engine failure
    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcript, DomainError>;
}

/// Text-to-speech boundary. This core only supplies plain,
/// punctuation-light text.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesizes audio for the given text.
    ///
    /// # Errors
    ///
    /// - `SpeechError` on engine failure
    async fn synthesize(
        &self,
        text: &str,
        options: &SpeechOptions,
    ) -> Result<AudioClip, DomainError>;
}
