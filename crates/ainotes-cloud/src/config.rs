//! Remote store configuration.

use serde::{Deserialize, Serialize};

use ainotes_core::{defaults, Error, Result};

/// Connection settings for the hosted note table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Project URL, e.g. `https://<project>.supabase.co`.
    pub url: String,
    /// Public (anon) API key, sent as the `apikey` header.
    pub anon_key: String,
    /// User session token. Falls back to the anon key when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Table holding notes.
    pub table: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            access_token: None,
            table: defaults::CLOUD_TABLE.to_string(),
            timeout_seconds: defaults::CLOUD_TIMEOUT_SECS,
        }
    }
}

impl CloudConfig {
    /// Load from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | SUPABASE_URL | (empty: demo mode) |
    /// | SUPABASE_ANON_KEY | (empty: demo mode) |
    /// | SUPABASE_ACCESS_TOKEN | (none) |
    /// | AINOTES_TABLE | notes |
    /// | AINOTES_TIMEOUT | 30 |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("SUPABASE_URL").unwrap_or_default(),
            anon_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            access_token: std::env::var("SUPABASE_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            table: std::env::var("AINOTES_TABLE")
                .unwrap_or_else(|_| defaults::CLOUD_TABLE.to_string()),
            timeout_seconds: std::env::var("AINOTES_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::CLOUD_TIMEOUT_SECS),
        }
    }

    /// Both URL and key are present. Without them the store runs in demo mode.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }

    /// Validate a configured endpoint. An unconfigured one is valid (demo mode).
    pub fn validate(&self) -> Result<()> {
        if !self.is_configured() {
            return Ok(());
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(Error::Config(format!(
                "cloud url must start with http:// or https://, got: {}",
                self.url
            )));
        }

        if self.table.trim().is_empty() {
            return Err(Error::Config("cloud table cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Bearer token for requests.
    pub fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }
}
