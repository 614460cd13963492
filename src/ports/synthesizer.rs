use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Port for the text-to-speech collaborator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize spoken audio for `text` in `lang_code`, writing the
    /// result to `output`. The file exists on success and is left in
    /// whatever partial state the failure allowed otherwise; callers never
    /// reuse a path, so partial files are simply abandoned.
    async fn synthesize(
        &self,
        text: &str,
        lang_code: &str,
        output: &Path,
    ) -> Result<(), DomainError>;
}
