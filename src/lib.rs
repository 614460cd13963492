#![forbid(unsafe_code)]

mod adapters;
mod app;
mod commands;
mod domain;
mod infrastructure;
mod ports;

use app::AppController;
use commands::{
    get_config, list_audio_devices, list_languages, select_audio_device, translate_speech,
    translate_text, update_config,
};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let controller = match AppController::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    tauri::Builder::default()
        .manage(controller)
        .invoke_handler(tauri::generate_handler![
            list_languages,
            translate_text,
            translate_speech,
            get_config,
            update_config,
            list_audio_devices,
            select_audio_device,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
