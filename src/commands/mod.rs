use tauri::State;

use crate::app::AppController;
use crate::domain::{language, AppConfig, AudioDevice, TranslationOutcome, TranslationRequest};

/// One dropdown entry.
#[derive(serde::Serialize)]
pub struct LanguageOption {
    pub name: &'static str,
    pub code: &'static str,
}

/// Everything the panels need to build their selectors.
#[derive(serde::Serialize)]
pub struct LanguageCatalog {
    pub languages: Vec<LanguageOption>,
    pub default_source: String,
    pub default_target: String,
}

/// Languages for the panel dropdowns, with the configured defaults.
#[tauri::command]
pub fn list_languages(controller: State<'_, AppController>) -> LanguageCatalog {
    let config = controller.config();
    LanguageCatalog {
        languages: language::entries()
            .iter()
            .map(|&(name, code)| LanguageOption { name, code })
            .collect(),
        default_source: config.ui.default_source,
        default_target: config.ui.default_target,
    }
}

// ==================== Translation Commands ====================

/// Text panel trigger: translate typed text and synthesize audio.
///
/// Failures come back inside the outcome, so the Err arm is never taken;
/// the Result shape is what async commands with managed state require.
#[tauri::command]
pub async fn translate_text(
    controller: State<'_, AppController>,
    text: String,
    source: String,
    target: String,
) -> Result<TranslationOutcome, String> {
    let request = TranslationRequest {
        text,
        source_language: source,
        target_language: target,
    };
    Ok(controller.translate_text(&request).await)
}

/// Mic panel trigger: capture a phrase, recognize, translate, synthesize.
#[tauri::command]
pub async fn translate_speech(
    controller: State<'_, AppController>,
    source: String,
    target: String,
) -> Result<TranslationOutcome, String> {
    Ok(controller.translate_speech(&source, &target).await)
}

// ==================== Config Commands ====================

/// Get the current application configuration.
#[tauri::command]
pub fn get_config(controller: State<'_, AppController>) -> Result<AppConfig, String> {
    Ok(controller.config())
}

/// Update the application configuration.
#[tauri::command]
pub fn update_config(
    controller: State<'_, AppController>,
    config: AppConfig,
) -> Result<(), String> {
    controller.update_config(config).map_err(|e| e.to_string())
}

// ==================== Audio Commands ====================

/// List available audio input devices.
#[tauri::command]
pub fn list_audio_devices(
    controller: State<'_, AppController>,
) -> Result<Vec<AudioDevice>, String> {
    controller.list_audio_devices().map_err(|e| e.to_string())
}

/// Select an audio input device.
#[tauri::command]
pub fn select_audio_device(
    controller: State<'_, AppController>,
    device_id: Option<String>,
) -> Result<(), String> {
    controller
        .select_audio_device(device_id.as_deref())
        .map_err(|e| e.to_string())
}
