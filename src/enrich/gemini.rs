use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::LanguageModel;
use crate::config::PipelineConfig;
use crate::error::{truncate_for_log, AiError};

const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// `generateContent` client with the JSON response MIME type set.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(cfg: &PipelineConfig) -> anyhow::Result<Self> {
        let api_key = cfg.require_gemini_key()?.to_string();
        let http = Client::builder().timeout(cfg.http_timeout).build()?;
        Ok(Self {
            http,
            api_key,
            model: cfg.gemini_model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{GEMINI_BASE}/{}:generateContent", self.model)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Part {
    text: Option<String>,
}

/// First candidate's first text part.
fn first_text(resp: GenerateResponse) -> Option<String> {
    resp.candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .find_map(|p| p.text)
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate_json(&self, prompt: &str) -> Result<String, AiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::Transport(format!(
                "gemini status={}: {}",
                status,
                truncate_for_log(&text, 240)
            )));
        }
        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::AiResponseMalformed(format!("envelope: {}", e.without_url())))?;
        let text = first_text(parsed)
            .ok_or_else(|| AiError::AiResponseMalformed("no candidate text".into()))?;
        debug!(target = "gemini", chars = text.len(), "model answered");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_candidate_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"A\":{}}"}],"role":"model"}}]}"#;
        let resp: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_text(resp).as_deref(), Some(r#"{"A":{}}"#));

        let empty: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert_eq!(first_text(empty), None);
    }

    #[test]
    fn endpoint_uses_configured_model() {
        let cfg = PipelineConfig {
            gemini_api_key: Some("k".into()),
            ..PipelineConfig::default()
        };
        let client = GeminiClient::new(&cfg).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
