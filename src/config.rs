//! Client configuration

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid LOGEAUM_API_URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Settings for reaching the dialogue service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the dialogue service; `/chat` is appended
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup("LOGEAUM_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let parsed = Url::parse(&api_base_url).map_err(|e| ConfigError::InvalidUrl {
            url: api_base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: api_base_url,
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(Self { api_base_url })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
        }
    }
}
