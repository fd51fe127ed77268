//! Refine backend configuration.

use serde::{Deserialize, Serialize};

use ainotes_core::{defaults, Error, Result};

/// Settings for an OpenAI-compatible refine endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Base URL up to (not including) `/chat/completions`.
    pub base_url: String,
    /// API key. Refinement is unavailable without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::REFINE_BASE_URL.to_string(),
            api_key: None,
            model: defaults::REFINE_MODEL.to_string(),
            temperature: defaults::REFINE_TEMPERATURE,
            timeout_seconds: defaults::REFINE_TIMEOUT_SECS,
        }
    }
}

impl RefineConfig {
    /// Load from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | REFINE_BASE_URL | Gemini OpenAI-compatible endpoint |
    /// | REFINE_API_KEY, then API_KEY | (none: refinement unavailable) |
    /// | REFINE_MODEL | gemini-3-flash-preview |
    /// | REFINE_TIMEOUT | 60 |
    pub fn from_env() -> Self {
        let api_key = std::env::var("REFINE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("API_KEY").ok().filter(|k| !k.is_empty()));

        Self {
            base_url: std::env::var("REFINE_BASE_URL")
                .unwrap_or_else(|_| defaults::REFINE_BASE_URL.to_string()),
            api_key,
            model: std::env::var("REFINE_MODEL")
                .unwrap_or_else(|_| defaults::REFINE_MODEL.to_string()),
            temperature: defaults::REFINE_TEMPERATURE,
            timeout_seconds: std::env::var("REFINE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::REFINE_TIMEOUT_SECS),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "refine base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.model.trim().is_empty() {
            return Err(Error::Config("refine model cannot be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "refine temperature must be between 0.0 and 2.0, got: {}",
                self.temperature
            )));
        }

        Ok(())
    }
}
