use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::domain::DomainError;
use crate::ports::Translator;

/// Translator backed by the public Google translate web endpoint.
///
/// The endpoint returns a nested array: `[[["segment", ...], ...], ...]`;
/// the translation is the concatenation of the first element of each
/// sentence entry.
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    fn request_url(&self, text: &str, source: &str, target: &str) -> Result<Url, DomainError> {
        let mut url =
            Url::parse(&self.endpoint).map_err(|e| DomainError::Config(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", source)
            .append_pair("tl", target)
            .append_pair("dt", "t")
            .append_pair("q", text);
        Ok(url)
    }

    fn extract_translation(body: &serde_json::Value) -> Result<String, DomainError> {
        let sentences = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                DomainError::Translation("invalid response format from backend".to_string())
            })?;

        let mut result = String::new();
        for sentence in sentences {
            if let Some(segment) = sentence.get(0).and_then(|v| v.as_str()) {
                result.push_str(segment);
            }
        }

        if result.is_empty() {
            return Err(DomainError::Translation(
                "backend returned no translation".to_string(),
            ));
        }
        Ok(result)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> Result<String, DomainError> {
        let url = self.request_url(text, source_code, target_code)?;
        debug!(source = source_code, target = target_code, "Requesting translation");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Translation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Translation(format!(
                "translation backend returned HTTP {}",
                status
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DomainError::Translation(e.to_string()))?;

        let translated = Self::extract_translation(&body)?;
        info!(
            chars_in = text.len(),
            chars_out = translated.len(),
            target = target_code,
            "Translation received"
        );
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_sentence() {
        let body = serde_json::json!([[["hola", "hello", null]], null, "en"]);
        assert_eq!(GoogleTranslator::extract_translation(&body).unwrap(), "hola");
    }

    #[test]
    fn test_extract_concatenates_sentences() {
        let body = serde_json::json!([
            [["Hallo. ", "Hello. ", null], ["Welt.", "World.", null]],
            null,
            "en"
        ]);
        assert_eq!(
            GoogleTranslator::extract_translation(&body).unwrap(),
            "Hallo. Welt."
        );
    }

    #[test]
    fn test_extract_rejects_malformed_body() {
        let body = serde_json::json!({ "unexpected": true });
        let err = GoogleTranslator::extract_translation(&body).unwrap_err();
        assert!(matches!(err, DomainError::Translation(_)));
    }

    #[test]
    fn test_request_url_encodes_query() {
        let adapter = GoogleTranslator::new(
            Client::new(),
            "https://translate.example.com/translate_a/single".to_string(),
        );
        let url = adapter.request_url("hello world", "auto", "hi").unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("sl=auto"));
        assert!(query.contains("tl=hi"));
        assert!(query.contains("q=hello+world") || query.contains("q=hello%20world"));
    }
}
