use async_trait::async_trait;

use crate::domain::{AudioBuffer, DomainError};

/// Port for the speech-recognition collaborator.
///
/// Failure modes are distinguishable through the error taxonomy:
/// `UnrecognizedSpeech` when the backend heard audio it could not decode,
/// `RecognitionService` when the backend itself failed.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize speech in `audio`, spoken in the language `lang_tag`
    /// (BCP-47, never "auto" — callers resolve a concrete tag first).
    async fn recognize(&self, audio: &AudioBuffer, lang_tag: &str)
        -> Result<String, DomainError>;
}
