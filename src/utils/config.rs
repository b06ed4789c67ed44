//! TOML-based configuration for Recall
//!
//! Everything is optional: a missing `recall.toml` yields the defaults, and
//! `RECALL_API_BASE` (read from the environment or a `.env` file) overrides
//! the service base URL.

use crate::conversation::history::HistoryPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `api.base_url`
pub const API_BASE_ENV: &str = "RECALL_API_BASE";

/// Root configuration structure loaded from recall.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecallConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= API Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the assistant service, e.g. `http://127.0.0.1:8000/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport-level timeout; no timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

// ============= Conversation Configuration =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// How much of the transcript is sent as chat history
    #[serde(default)]
    pub history: HistoryPolicy,
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============= Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {0}: {1}")]
    ReadError(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl RecallConfig {
    /// Loads `path` if it exists (defaults otherwise), applies environment
    /// overrides and validates the result.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = path.as_ref();
        let mut config = if path.exists() {
            let content =
                fs::read_to_string(path).map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        if let Ok(base) = env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                config.api.base_url = base.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text without touching the environment.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if reqwest::Url::parse(base).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url is not a valid URL: '{}'",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }

        match self.conversation.history {
            HistoryPolicy::Window { max_messages: 0 } => {
                return Err(ConfigError::ValidationError(
                    "conversation.history.max_messages must be greater than zero".to_string(),
                ));
            }
            HistoryPolicy::TokenBudget { max_tokens: 0 } => {
                return Err(ConfigError::ValidationError(
                    "conversation.history.max_tokens must be greater than zero".to_string(),
                ));
            }
            _ => {}
        }

        Ok(())
    }

    /// Serializes back to TOML, used by `recall config`
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
