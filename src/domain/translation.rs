use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Original-text field value that signals failure to the presentation layer.
pub const ERROR_SENTINEL: &str = "Error";

/// A translation request as it arrives from either panel.
///
/// Languages are display names, not codes; resolution happens in the
/// orchestrator so both panels share the fallback policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

/// Uniform result shape for both panels.
///
/// Success and failure render through the same three fields: on failure
/// `original_text` is the sentinel, `translated_text` carries the message
/// and `audio_path` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub original_text: String,
    pub translated_text: String,
    pub audio_path: Option<PathBuf>,
}

impl TranslationOutcome {
    pub fn success(
        original_text: impl Into<String>,
        translated_text: impl Into<String>,
        audio_path: PathBuf,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            translated_text: translated_text.into(),
            audio_path: Some(audio_path),
        }
    }

    pub fn failure(error: &DomainError) -> Self {
        Self {
            original_text: ERROR_SENTINEL.to_string(),
            translated_text: error.user_message(),
            audio_path: None,
        }
    }
}

/// Freshly generated path for one synthesis artifact.
///
/// Each request gets its own file in the OS temp directory; uniqueness
/// comes from the embedded UUID, and cleanup is left to the OS.
pub fn fresh_artifact_path() -> PathBuf {
    std::env::temp_dir().join(format!("translated_{}.mp3", Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_outcome_shape() {
        let outcome = TranslationOutcome::failure(&DomainError::EmptyInput);
        assert_eq!(outcome.original_text, ERROR_SENTINEL);
        assert_eq!(outcome.translated_text, "Please enter or speak some text.");
        assert!(outcome.audio_path.is_none());
    }

    #[test]
    fn test_success_outcome_shape() {
        let outcome =
            TranslationOutcome::success("hello", "hola", PathBuf::from("/tmp/translated_x.mp3"));
        assert_eq!(outcome.original_text, "hello");
        assert_eq!(outcome.translated_text, "hola");
        assert!(outcome.audio_path.is_some());
    }

    #[test]
    fn test_artifact_paths_are_unique() {
        let a = fresh_artifact_path();
        let b = fresh_artifact_path();
        assert_ne!(a, b);
        let file_name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("translated_"));
        assert!(file_name.ends_with(".mp3"));
    }
}
