use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::domain::{AudioBuffer, DomainError};
use crate::ports::SpeechRecognizer;

/// Speech recognizer backed by the Google web speech API.
///
/// Audio is posted as raw 16-bit little-endian PCM (`audio/l16`). The
/// response is JSON lines; the first line is usually an empty result that
/// must be skipped.
pub struct GoogleSpeechRecognizer {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    #[serde(default)]
    result: Vec<SpeechResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternative: Vec<SpeechAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechAlternative {
    transcript: Option<String>,
}

impl GoogleSpeechRecognizer {
    pub fn new(client: Client, endpoint: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    fn request_url(&self, lang_tag: &str) -> Result<Url, DomainError> {
        let mut url =
            Url::parse(&self.endpoint).map_err(|e| DomainError::Config(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client", "chromium")
            .append_pair("lang", lang_tag)
            .append_pair("key", &self.api_key)
            .append_pair("pFilter", "0");
        Ok(url)
    }

    /// Pick the first transcript out of the JSON-lines body.
    ///
    /// An empty body or only-empty results means the backend heard the
    /// audio but could not decode speech from it.
    fn extract_transcript(body: &str) -> Result<String, DomainError> {
        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parsed: SpeechResponse = serde_json::from_str(line)
                .map_err(|e| DomainError::RecognitionService(e.to_string()))?;
            for result in parsed.result {
                for alternative in result.alternative {
                    if let Some(transcript) = alternative.transcript {
                        if !transcript.trim().is_empty() {
                            return Ok(transcript);
                        }
                    }
                }
            }
        }
        Err(DomainError::UnrecognizedSpeech)
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    async fn recognize(
        &self,
        audio: &AudioBuffer,
        lang_tag: &str,
    ) -> Result<String, DomainError> {
        if audio.samples().is_empty() {
            return Err(DomainError::UnrecognizedSpeech);
        }

        let url = self.request_url(lang_tag)?;
        let content_type = format!("audio/l16; rate={}", audio.sample_rate());
        debug!(
            lang = lang_tag,
            duration_secs = audio.duration_secs(),
            "Submitting audio for recognition"
        );

        let response = self
            .client
            .post(url)
            .header("Content-Type", content_type)
            .body(audio.to_le_bytes())
            .send()
            .await
            .map_err(|e| DomainError::RecognitionService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::RecognitionService(format!(
                "recognition backend returned HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::RecognitionService(e.to_string()))?;

        let transcript = Self::extract_transcript(&body)?;
        info!(chars = transcript.len(), "Speech recognized");
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_skips_leading_empty_result() {
        let body = concat!(
            "{\"result\":[]}\n",
            "{\"result\":[{\"alternative\":[{\"transcript\":\"hello world\",\"confidence\":0.9}],",
            "\"final\":true}],\"result_index\":0}\n",
        );
        assert_eq!(
            GoogleSpeechRecognizer::extract_transcript(body).unwrap(),
            "hello world"
        );
    }

    #[test]
    fn test_extract_empty_body_is_unrecognized() {
        let err = GoogleSpeechRecognizer::extract_transcript("").unwrap_err();
        assert!(matches!(err, DomainError::UnrecognizedSpeech));
    }

    #[test]
    fn test_extract_only_empty_results_is_unrecognized() {
        let body = "{\"result\":[]}\n{\"result\":[]}\n";
        let err = GoogleSpeechRecognizer::extract_transcript(body).unwrap_err();
        assert!(matches!(err, DomainError::UnrecognizedSpeech));
    }

    #[test]
    fn test_extract_malformed_line_is_service_error() {
        let err = GoogleSpeechRecognizer::extract_transcript("not json").unwrap_err();
        assert!(matches!(err, DomainError::RecognitionService(_)));
    }

    #[test]
    fn test_request_url_carries_language_and_key() {
        let adapter = GoogleSpeechRecognizer::new(
            Client::new(),
            "http://speech.example.com/recognize".to_string(),
            "test-key".to_string(),
        );
        let url = adapter.request_url("hi").unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("lang=hi"));
        assert!(query.contains("key=test-key"));
    }
}
