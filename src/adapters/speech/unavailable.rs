//! Placeholder speech adapter for text-only deployments.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{AudioClip, SpeechOptions, SpeechToText, TextToSpeech, Transcript};

/// Speech adapter that reports the engine as unavailable.
///
/// The dialogue path treats transcription failures as a re-prompt
/// signal, so a text-only deployment keeps working: audio input yields
/// a clarification asking the user to type instead.
#[derive(Debug, Clone, Default)]
pub struct UnavailableSpeech;

impl UnavailableSpeech {
    /// Creates the placeholder adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechToText for UnavailableSpeech {
    async fn transcribe(&self, _audio: &AudioClip) -> Result<Transcript, DomainError> {
        Err(DomainError::new(
            ErrorCode::SpeechError,
            "No speech-to-text engine is configured",
        ))
    }
}

#[async_trait]
impl TextToSpeech for UnavailableSpeech {
    async fn synthesize(
        &self,
        _text: &str,
        _options: &SpeechOptions,
    ) -> Result<AudioClip, DomainError> {
        Err(DomainError::new(
            ErrorCode::SpeechError,
            "No text-to-speech engine is configured",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transcription_reports_speech_error() {
        let speech = UnavailableSpeech::new();
        let err = speech
            .transcribe(&AudioClip::new(vec![1], "audio/wav"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SpeechError);
    }
}
