pub mod audio_cpal;
pub mod config_store;
pub mod google_speech;
pub mod google_translate;
pub mod google_tts;

pub use audio_cpal::CpalAudioCapture;
pub use config_store::TomlConfigStore;
pub use google_speech::GoogleSpeechRecognizer;
pub use google_translate::GoogleTranslator;
pub use google_tts::GoogleTtsSynthesizer;
