//! Application configuration.
//!
//! Loaded from a TOML file when one exists, otherwise from environment
//! variables. File values may reference the environment as `${VAR}`.
//!
//! ```toml
//! offline = false
//! user_id = "user-1"
//!
//! [cache]
//! path = "/home/me/.local/share/ainotes/ainotes_backup_storage.json"
//!
//! [cloud]
//! url = "https://project.supabase.co"
//! anon_key = "${SUPABASE_ANON_KEY}"
//!
//! [refine]
//! api_key = "${GEMINI_API_KEY}"
//! model = "gemini-3-flash-preview"
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use ainotes_cloud::CloudConfig;
use ainotes_core::defaults;
use ainotes_inference::RefineConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Local cache settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

impl CacheConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(ainotes_store::JsonFileCache::default_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Never contact the remote store.
    pub offline: bool,
    /// Default user when none is given on the command line.
    pub user_id: Option<String>,
    pub cache: CacheConfig,
    pub cloud: CloudConfig,
    pub refine: RefineConfig,
}

impl AppConfig {
    /// `AINOTES_CONFIG`, else `<config dir>/ainotes/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Ok(path) = env::var("AINOTES_CONFIG") {
            return PathBuf::from(path);
        }
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push(defaults::APP_DIR_NAME);
        path.push("config.toml");
        path
    }

    /// Load from the config file if present, otherwise from the environment.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        let config = if path.exists() {
            info!(path = %path.display(), "Loading config file");
            Self::from_file(&path)?
        } else {
            debug!(
                path = %path.display(),
                "Config file not found, using environment variables"
            );
            Self::from_env()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&content)?)
    }

    /// Load from environment variables.
    ///
    /// | Variable | Meaning |
    /// |----------|---------|
    /// | AINOTES_OFFLINE | "true"/"1" to stay off the network |
    /// | AINOTES_USER_ID | default user |
    /// | AINOTES_CACHE_PATH | cache file |
    ///
    /// Remote store and refine settings come from their own variables.
    pub fn from_env() -> Self {
        Self {
            offline: env::var("AINOTES_OFFLINE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            user_id: env::var("AINOTES_USER_ID").ok().filter(|u| !u.is_empty()),
            cache: CacheConfig {
                path: env::var("AINOTES_CACHE_PATH").ok().map(PathBuf::from),
            },
            cloud: CloudConfig::from_env(),
            refine: RefineConfig::from_env(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.cloud
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        self.refine
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if let Some(user) = &self.user_id {
            if user.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "user_id cannot be blank".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Replace `${VAR}` with the variable's value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid pattern");
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}
