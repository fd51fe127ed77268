//! OpenAI-compatible refine backend.
//!
//! Works against any `/chat/completions` endpoint that speaks the OpenAI
//! wire format, including Gemini's compatibility layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use ainotes_core::{defaults, Error, Result, TextRefiner};

use crate::config::RefineConfig;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Error body returned on non-success status.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
}

// =============================================================================
// REFINER
// =============================================================================

/// Refiner backed by an OpenAI-compatible chat completions API.
pub struct OpenAiRefiner {
    client: reqwest::Client,
    config: RefineConfig,
}

impl OpenAiRefiner {
    /// Create a refiner with the given configuration.
    ///
    /// A missing API key is not an error here; `refine` reports it as
    /// `ServiceUnavailable` so the rest of the app keeps working.
    pub fn new(config: RefineConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            base_url = %config.base_url,
            model = %config.model,
            has_api_key = config.has_api_key(),
            "Initializing refine backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(RefineConfig::from_env())
    }

    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    fn build_request(&self, api_key: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
    }

    fn build_body(&self, text: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(defaults::REFINE_SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(text.to_string()),
                },
            ],
            temperature: Some(self.config.temperature),
            stream: false,
        }
    }
}

#[async_trait]
impl TextRefiner for OpenAiRefiner {
    async fn refine(&self, text: &str) -> Result<String> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                return Err(Error::ServiceUnavailable(
                    "refine API key is not configured".to_string(),
                ))
            }
        };

        if text.trim().is_empty() {
            return Err(Error::InvalidInput("text to refine is empty".to_string()));
        }

        debug!(
            subsystem = "inference",
            model = %self.config.model,
            prompt_len = text.len(),
            "Refining text"
        );

        let response = self
            .build_request(api_key)
            .json(&self.build_body(text))
            .send()
            .await
            .map_err(|e| Error::RefinementFailed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::RefinementFailed(format!(
                "Refine endpoint returned {}: {}",
                status, message
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::RefinementFailed(format!("Failed to parse response: {}", e)))?;

        let refined = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        debug!(
            subsystem = "inference",
            model = %self.config.model,
            response_len = refined.len(),
            "Refine complete"
        );

        // An empty completion leaves the note unchanged.
        if refined.is_empty() {
            return Ok(text.to_string());
        }
        Ok(refined)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refiner(api_key: Option<&str>) -> OpenAiRefiner {
        OpenAiRefiner::new(RefineConfig {
            api_key: api_key.map(String::from),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(refiner(Some("k")).build_body("hello")).unwrap();
        assert_eq!(body["model"], "gemini-3-flash-preview");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_response_with_null_content_parses() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert!(response.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_missing_key_is_service_unavailable() {
        let err = refiner(None).refine("text").await.unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_blank_text_is_invalid_input() {
        let err = refiner(Some("k")).refine("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_model_name() {
        assert_eq!(refiner(None).model_name(), "gemini-3-flash-preview");
    }
}
