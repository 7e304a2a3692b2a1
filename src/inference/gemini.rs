//! Google Gemini client.

use crate::config::InferenceConfig;
use crate::core::{Error, Result};
use crate::inference::client::InferenceClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    api_key: String,
    config: InferenceConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a client, resolving the API key from config then environment.
    ///
    /// Returns None when no key is available; callers fall back to the
    /// keyword strategies in that case.
    pub fn from_config(config: &InferenceConfig) -> Option<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|k| !k.is_empty())?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Some(Self {
            api_key,
            config: config.clone(),
            client,
        })
    }

    fn url(&self) -> String {
        let model = if self.config.model.starts_with("models/") {
            self.config.model.clone()
        } else {
            format!("models/{}", self.config.model)
        };
        format!(
            "{}/{}:generateContent?key={}",
            self.config.endpoint.trim_end_matches('/'),
            model,
            self.api_key
        )
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }

    fn extract_text(response: GenerateContentResponse) -> Result<String> {
        if let Some(err) = response.error {
            return Err(Error::InferenceFailed(err.message));
        }
        let text = response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::InferenceFailed("empty response".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl InferenceClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url())
            .json(&self.build_request(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InferenceFailed(format!(
                "status {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Self::extract_text(parsed)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> InferenceConfig {
        InferenceConfig {
            api_key: Some("test-key".to_string()),
            ..InferenceConfig::default()
        }
    }

    #[test]
    fn test_url_includes_model_and_key() {
        let client = GeminiClient::from_config(&config_with_key()).unwrap();
        let url = client.url();
        assert!(url.contains("/models/gemini-2.0-flash:generateContent"));
        assert!(url.ends_with("key=test-key"));
    }

    #[test]
    fn test_request_serialization() {
        let client = GeminiClient::from_config(&config_with_key()).unwrap();
        let json = serde_json::to_value(client.build_request("hello")).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
    }

    #[test]
    fn test_extract_text() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"anchor\":\"MetaAck\"}"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text = GeminiClient::extract_text(parsed).unwrap();
        assert_eq!(text, r#"{"anchor":"MetaAck"}"#);
    }

    #[test]
    fn test_extract_text_error_and_empty() {
        let raw = r#"{"error":{"message":"quota exceeded"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            GeminiClient::extract_text(parsed),
            Err(Error::InferenceFailed(m)) if m == "quota exceeded"
        ));

        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(GeminiClient::extract_text(parsed).is_err());
    }
}
