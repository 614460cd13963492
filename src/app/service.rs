use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::translation::fresh_artifact_path;
use crate::domain::{language, DomainError, ListenConfig, TranslationOutcome, TranslationRequest};
use crate::ports::{AudioCapture, SpeechRecognizer, SpeechSynthesizer, Translator};

/// Orchestrates the two user-facing flows over the collaborator ports.
///
/// Every failure is recovered here and folded into the uniform outcome
/// shape; callers never see a structured error.
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    recognizer: Arc<dyn SpeechRecognizer>,
    capture: Arc<dyn AudioCapture>,
}

impl TranslationService {
    pub fn new(
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        recognizer: Arc<dyn SpeechRecognizer>,
        capture: Arc<dyn AudioCapture>,
    ) -> Self {
        Self {
            translator,
            synthesizer,
            recognizer,
            capture,
        }
    }

    /// Translate typed or recognized text and synthesize spoken output.
    pub async fn translate(&self, request: &TranslationRequest) -> TranslationOutcome {
        match self.translate_inner(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "Translation request failed");
                TranslationOutcome::failure(&err)
            }
        }
    }

    async fn translate_inner(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationOutcome, DomainError> {
        if request.text.trim().is_empty() {
            return Err(DomainError::EmptyInput);
        }

        let source_code = language::resolve_source(&request.source_language);
        let target_code = language::resolve_target(&request.target_language);

        let translated = self
            .translator
            .translate(&request.text, source_code, target_code)
            .await?;
        info!(source = source_code, target = target_code, "Translated");

        let audio_path = fresh_artifact_path();
        self.synthesizer
            .synthesize(&translated, target_code, &audio_path)
            .await?;

        Ok(TranslationOutcome::success(
            request.text.clone(),
            translated,
            audio_path,
        ))
    }

    /// Capture one spoken phrase, recognize it, and run it through
    /// `translate`.
    pub async fn capture_and_translate(
        &self,
        listen: &ListenConfig,
        source_name: &str,
        target_name: &str,
    ) -> TranslationOutcome {
        let text = match self.capture_phrase(listen, source_name).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Speech capture failed");
                return TranslationOutcome::failure(&err);
            }
        };

        let request = TranslationRequest {
            text,
            source_language: source_name.to_string(),
            target_language: target_name.to_string(),
        };
        self.translate(&request).await
    }

    async fn capture_phrase(
        &self,
        listen: &ListenConfig,
        source_name: &str,
    ) -> Result<String, DomainError> {
        let audio = self.capture.capture(listen).await?;
        info!(secs = audio.duration_secs(), "Phrase captured, recognizing");

        let lang_tag = language::recognition_tag(language::resolve_source(source_name));
        let text = self.recognizer.recognize(&audio, &lang_tag).await?;
        info!(chars = text.len(), "Recognized speech");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::translation::ERROR_SENTINEL;
    use crate::domain::{AudioBuffer, AudioDevice};

    /// Translator that echoes its input and counts invocations.
    struct EchoTranslator {
        calls: AtomicUsize,
    }

    impl EchoTranslator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Translator for EchoTranslator {
        async fn translate(
            &self,
            text: &str,
            _source_code: &str,
            _target_code: &str,
        ) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_string())
        }
    }

    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(
            &self,
            _text: &str,
            _source_code: &str,
            _target_code: &str,
        ) -> Result<String, DomainError> {
            Err(DomainError::Translation("unsupported code pair".to_string()))
        }
    }

    /// Synthesizer that accepts every request without touching disk.
    struct NullSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for NullSynthesizer {
        async fn synthesize(
            &self,
            _text: &str,
            _lang_code: &str,
            _output: &Path,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct FixedRecognizer(&'static str);

    #[async_trait]
    impl SpeechRecognizer for FixedRecognizer {
        async fn recognize(
            &self,
            _audio: &AudioBuffer,
            _lang_tag: &str,
        ) -> Result<String, DomainError> {
            Ok(self.0.to_string())
        }
    }

    struct SilentCapture;

    #[async_trait]
    impl AudioCapture for SilentCapture {
        async fn capture(&self, _listen: &ListenConfig) -> Result<AudioBuffer, DomainError> {
            Err(DomainError::CaptureTimeout)
        }

        fn list_input_devices(&self) -> Result<Vec<AudioDevice>, DomainError> {
            Ok(Vec::new())
        }

        fn select_input_device(&self, _device_id: Option<&str>) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct ToneCapture;

    #[async_trait]
    impl AudioCapture for ToneCapture {
        async fn capture(&self, listen: &ListenConfig) -> Result<AudioBuffer, DomainError> {
            Ok(AudioBuffer::from_samples(
                listen.sample_rate,
                vec![1000; 1600],
            ))
        }

        fn list_input_devices(&self) -> Result<Vec<AudioDevice>, DomainError> {
            Ok(Vec::new())
        }

        fn select_input_device(&self, _device_id: Option<&str>) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn service_with(translator: Arc<dyn Translator>) -> TranslationService {
        TranslationService::new(
            translator,
            Arc::new(NullSynthesizer),
            Arc::new(FixedRecognizer("hello")),
            Arc::new(ToneCapture),
        )
    }

    fn request(text: &str, source: &str, target: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.to_string(),
            source_language: source.to_string(),
            target_language: target.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let translator = Arc::new(EchoTranslator::new());
        let service = service_with(translator.clone());

        for input in ["", "   ", "\n\t "] {
            let outcome = service.translate(&request(input, "English", "Hindi")).await;
            assert_eq!(outcome.original_text, ERROR_SENTINEL);
            assert_eq!(outcome.translated_text, "Please enter or speak some text.");
            assert!(outcome.audio_path.is_none());
        }
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_echo_translation_round_trip() {
        let service = service_with(Arc::new(EchoTranslator::new()));
        let outcome = service
            .translate(&request("hello", "English", "English"))
            .await;

        assert_eq!(outcome.original_text, "hello");
        assert_eq!(outcome.translated_text, "hello");
        let path = outcome.audio_path.expect("audio path should be present");
        assert!(!path.as_os_str().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_calls_produce_distinct_artifacts() {
        let service = service_with(Arc::new(EchoTranslator::new()));
        let first = service.translate(&request("hello", "English", "Hindi")).await;
        let second = service.translate(&request("hello", "English", "Hindi")).await;
        assert_ne!(first.audio_path.unwrap(), second.audio_path.unwrap());
    }

    #[tokio::test]
    async fn test_translator_failure_embeds_message() {
        let service = service_with(Arc::new(FailingTranslator));
        let outcome = service.translate(&request("hello", "English", "Hindi")).await;

        assert_eq!(outcome.original_text, ERROR_SENTINEL);
        assert_eq!(
            outcome.translated_text,
            "Translation error: unsupported code pair"
        );
        assert!(outcome.audio_path.is_none());
    }

    #[tokio::test]
    async fn test_capture_timeout_maps_to_no_speech_message() {
        let service = TranslationService::new(
            Arc::new(EchoTranslator::new()),
            Arc::new(NullSynthesizer),
            Arc::new(FixedRecognizer("hello")),
            Arc::new(SilentCapture),
        );

        let outcome = service
            .capture_and_translate(&ListenConfig::default(), "Auto Detect", "Hindi")
            .await;
        assert_eq!(outcome.original_text, ERROR_SENTINEL);
        assert_eq!(
            outcome.translated_text,
            "No speech detected (timeout). Try again."
        );
        assert!(outcome.audio_path.is_none());
    }

    #[tokio::test]
    async fn test_capture_flow_delegates_to_translate() {
        let service = service_with(Arc::new(EchoTranslator::new()));
        let outcome = service
            .capture_and_translate(&ListenConfig::default(), "Auto Detect", "English")
            .await;

        assert_eq!(outcome.original_text, "hello");
        assert_eq!(outcome.translated_text, "hello");
        assert!(outcome.audio_path.is_some());
    }

    #[tokio::test]
    async fn test_unrecognized_speech_message() {
        struct DeafRecognizer;

        #[async_trait]
        impl SpeechRecognizer for DeafRecognizer {
            async fn recognize(
                &self,
                _audio: &AudioBuffer,
                _lang_tag: &str,
            ) -> Result<String, DomainError> {
                Err(DomainError::UnrecognizedSpeech)
            }
        }

        let service = TranslationService::new(
            Arc::new(EchoTranslator::new()),
            Arc::new(NullSynthesizer),
            Arc::new(DeafRecognizer),
            Arc::new(ToneCapture),
        );

        let outcome = service
            .capture_and_translate(&ListenConfig::default(), "English", "Hindi")
            .await;
        assert_eq!(outcome.translated_text, "Could not understand your speech.");
    }
}
