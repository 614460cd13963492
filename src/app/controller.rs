use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{
    CpalAudioCapture, GoogleSpeechRecognizer, GoogleTranslator, GoogleTtsSynthesizer,
    TomlConfigStore,
};
use crate::app::TranslationService;
use crate::domain::{AppConfig, AudioDevice, DomainError, TranslationOutcome, TranslationRequest};
use crate::infrastructure::init_logging;
use crate::ports::{AudioCapture, ConfigStore};

/// Application controller that wires the adapters and manages global state.
///
/// Service endpoints and the request timeout are read once at startup;
/// editing them in the config takes effect on the next launch. Capture
/// tuning and the input device are re-read per request.
pub struct AppController {
    config: RwLock<AppConfig>,
    config_store: Arc<TomlConfigStore>,
    service: TranslationService,
    capture: Arc<CpalAudioCapture>,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    pub fn new() -> Result<Self, DomainError> {
        let config_store = Arc::new(TomlConfigStore::new()?);
        let config = config_store.load()?;

        let log_guard = init_logging(
            &config_store.logs_dir(),
            &config.logging.level,
            config.logging.file_logging,
        )?;

        info!("Voxlate starting up");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(format!("Voxlate/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.services.request_timeout_secs))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        let translator = Arc::new(GoogleTranslator::new(
            client.clone(),
            config.services.translate_endpoint.clone(),
        ));
        let synthesizer = Arc::new(GoogleTtsSynthesizer::new(
            client.clone(),
            config.services.tts_endpoint.clone(),
        ));
        let recognizer = Arc::new(GoogleSpeechRecognizer::new(
            client,
            config.services.speech_endpoint.clone(),
            config.services.speech_api_key.clone(),
        ));
        let capture = Arc::new(CpalAudioCapture::new(config.capture.input_device.clone())?);

        let service = TranslationService::new(
            translator,
            synthesizer,
            recognizer,
            Arc::clone(&capture) as Arc<dyn AudioCapture>,
        );

        info!("AppController initialized");

        Ok(Self {
            config: RwLock::new(config),
            config_store,
            service,
            capture,
            _log_guard: log_guard,
        })
    }

    /// Translate typed text; always returns an outcome, never an error.
    pub async fn translate_text(&self, request: &TranslationRequest) -> TranslationOutcome {
        self.service.translate(request).await
    }

    /// Capture speech from the microphone and translate it.
    pub async fn translate_speech(
        &self,
        source_name: &str,
        target_name: &str,
    ) -> TranslationOutcome {
        let listen = self.config.read().capture.listen();
        self.service
            .capture_and_translate(&listen, source_name, target_name)
            .await
    }

    /// Get the current configuration.
    pub fn config(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// Update the configuration; the input device selection applies
    /// immediately.
    pub fn update_config(&self, config: AppConfig) -> Result<(), DomainError> {
        self.capture
            .select_input_device(config.capture.input_device.as_deref())?;

        self.config_store.save(&config)?;
        *self.config.write() = config;

        info!("Configuration updated");
        Ok(())
    }

    pub fn list_audio_devices(&self) -> Result<Vec<AudioDevice>, DomainError> {
        self.capture.list_input_devices()
    }

    pub fn select_audio_device(&self, device_id: Option<&str>) -> Result<(), DomainError> {
        self.capture.select_input_device(device_id)?;
        self.config.write().capture.input_device = device_id.map(String::from);
        Ok(())
    }
}
