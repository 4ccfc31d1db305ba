//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SESSION_FILE: &str = ".cms-session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash.
    pub base_url: String,
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CMS_API_BASE_URL`: default `http://localhost:8000`
    /// - `CMS_SESSION_FILE`: default `.cms-session.json`
    /// - `CMS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CMS_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("CMS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let session_file = std::env::var("CMS_SESSION_FILE").unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("CMS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CMS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Self::new(&base_url, session_file, timeouts)
    }

    /// Build a config from explicit values, normalizing the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty.
    pub fn new(base_url: &str, session_file: impl Into<PathBuf>, timeouts: Timeouts) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { base_url, session_file: session_file.into(), timeouts })
    }

    /// Join an API path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid { key: "CMS_API_BASE_URL", reason: "must not be empty".into() });
    }
    Ok(trimmed.to_string())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
