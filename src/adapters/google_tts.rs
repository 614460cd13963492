use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::domain::DomainError;
use crate::ports::SpeechSynthesizer;

/// Speech synthesizer backed by the Google translate TTS endpoint.
///
/// The endpoint returns MP3 bytes directly; they are streamed to the
/// caller-provided path.
pub struct GoogleTtsSynthesizer {
    client: Client,
    endpoint: String,
}

impl GoogleTtsSynthesizer {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    fn request_url(&self, text: &str, lang: &str) -> Result<Url, DomainError> {
        let mut url =
            Url::parse(&self.endpoint).map_err(|e| DomainError::Config(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("client", "tw-ob")
            .append_pair("tl", lang)
            .append_pair("q", text);
        Ok(url)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        lang_code: &str,
        output: &Path,
    ) -> Result<(), DomainError> {
        let url = self.request_url(text, lang_code)?;
        debug!(lang = lang_code, output = ?output, "Requesting synthesis");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Synthesis(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Synthesis(format!(
                "synthesis backend returned HTTP {}",
                status
            )));
        }

        let mut file = tokio::fs::File::create(output)
            .await
            .map_err(|e| DomainError::Io(e.to_string()))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DomainError::Synthesis(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DomainError::Io(e.to_string()))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| DomainError::Io(e.to_string()))?;

        if written == 0 {
            return Err(DomainError::Synthesis(
                "synthesis backend returned no audio".to_string(),
            ));
        }

        info!(bytes = written, output = ?output, "Synthesis artifact written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_carries_text_and_language() {
        let adapter = GoogleTtsSynthesizer::new(
            Client::new(),
            "https://tts.example.com/translate_tts".to_string(),
        );
        let url = adapter.request_url("namaste duniya", "hi").unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("tl=hi"));
        assert!(query.contains("client=tw-ob"));
        assert!(query.contains("q=namaste+duniya") || query.contains("q=namaste%20duniya"));
    }

    #[test]
    fn test_request_url_rejects_bad_endpoint() {
        let adapter = GoogleTtsSynthesizer::new(Client::new(), "not a url".to_string());
        assert!(adapter.request_url("hi", "en").is_err());
    }
}
