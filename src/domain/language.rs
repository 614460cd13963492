use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Display name preselected in the source dropdown.
pub const DEFAULT_SOURCE: &str = "Auto Detect";
/// Display name preselected in the target dropdown.
pub const DEFAULT_TARGET: &str = "Hindi";

/// Fallback code when a source language name is not in the registry.
pub const FALLBACK_SOURCE_CODE: &str = "auto";
/// Fallback code when a target language name is not in the registry.
pub const FALLBACK_TARGET_CODE: &str = "en";

/// Supported languages, in dropdown order.
///
/// The codes are the locale identifiers shared by the translation and
/// speech-synthesis backends.
const LANGUAGES: &[(&str, &str)] = &[
    ("Auto Detect", "auto"),
    ("Hindi", "hi"),
    ("English", "en"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Gujarati", "gu"),
    ("Tamil", "ta"),
    ("Telugu", "te"),
    ("Marathi", "mr"),
    ("Punjabi", "pa"),
    ("Bengali", "bn"),
    ("Japanese", "ja"),
];

static BY_NAME: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| LANGUAGES.iter().copied().collect());

/// Resolve a source-language display name to its code.
///
/// Unknown names fall back to "auto"; lookups never fail.
pub fn resolve_source(name: &str) -> &'static str {
    BY_NAME.get(name).copied().unwrap_or(FALLBACK_SOURCE_CODE)
}

/// Resolve a target-language display name to its code.
///
/// Unknown names fall back to "en"; lookups never fail.
pub fn resolve_target(name: &str) -> &'static str {
    BY_NAME.get(name).copied().unwrap_or(FALLBACK_TARGET_CODE)
}

/// (name, code) pairs in dropdown order.
pub fn entries() -> &'static [(&'static str, &'static str)] {
    LANGUAGES
}

/// Recognition backends cannot auto-detect; map "auto" to a concrete
/// BCP-47 tag and widen bare codes for the speech API.
pub fn recognition_tag(code: &str) -> String {
    match code {
        "auto" | "en" => "en-US".to_string(),
        other => other.to_string(),
    }
}
