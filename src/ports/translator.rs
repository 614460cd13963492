use async_trait::async_trait;

use crate::domain::DomainError;

/// Port for the machine-translation collaborator.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_code` to `target_code`.
    ///
    /// `source_code` may be "auto"; backends that support detection honor
    /// it, others treat it as an error surfaced through the Result.
    async fn translate(
        &self,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> Result<String, DomainError>;
}
