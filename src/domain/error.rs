use thiserror::Error;

/// Domain-level errors for Voxlate.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("empty input")]
    EmptyInput,

    #[error("{0}")]
    Translation(String),

    #[error("{0}")]
    Synthesis(String),

    #[error("no speech detected within the listen window")]
    CaptureTimeout,

    #[error("speech could not be recognized")]
    UnrecognizedSpeech,

    #[error("{0}")]
    RecognitionService(String),

    #[error("Audio device error: {message}")]
    AudioDevice { message: String },

    #[error("{0}")]
    Unexpected(String),
}

impl DomainError {
    /// Render the error as the message shown in the result panel.
    ///
    /// Every failure surfaces through the same two-field outcome, so the
    /// message text is the only channel the UI has to distinguish causes.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::EmptyInput => "Please enter or speak some text.".to_string(),
            DomainError::Translation(msg) | DomainError::Synthesis(msg) => {
                format!("Translation error: {}", msg)
            }
            DomainError::CaptureTimeout => {
                "No speech detected (timeout). Try again.".to_string()
            }
            DomainError::UnrecognizedSpeech => "Could not understand your speech.".to_string(),
            DomainError::RecognitionService(msg) => {
                format!("Speech Recognition API error: {}", msg)
            }
            other => format!("Unexpected error: {}", other),
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_message() {
        assert_eq!(
            DomainError::EmptyInput.user_message(),
            "Please enter or speak some text."
        );
    }

    #[test]
    fn test_translation_message_embeds_cause() {
        let err = DomainError::Translation("backend said no".to_string());
        assert_eq!(err.user_message(), "Translation error: backend said no");
    }

    #[test]
    fn test_capture_failures_have_distinct_messages() {
        let timeout = DomainError::CaptureTimeout.user_message();
        let unknown = DomainError::UnrecognizedSpeech.user_message();
        let service = DomainError::RecognitionService("503".to_string()).user_message();
        assert_ne!(timeout, unknown);
        assert_ne!(unknown, service);
        assert!(timeout.contains("timeout"));
        assert!(service.contains("503"));
    }
}
