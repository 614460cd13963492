pub mod audio;
pub mod config;
pub mod error;
pub mod language;
pub mod translation;

pub use audio::{AudioBuffer, AudioDevice, ListenConfig};
pub use config::AppConfig;
pub use error::DomainError;
pub use translation::{TranslationOutcome, TranslationRequest};
