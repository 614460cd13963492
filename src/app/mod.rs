pub mod controller;
pub mod service;

pub use controller::AppController;
pub use service::TranslationService;
