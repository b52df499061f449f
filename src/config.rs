//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address every request path is appended to, without a trailing `/`.
    pub api_url: String,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_url: DEFAULT_API_URL.to_owned(), timeouts: Timeouts::default() }
    }
}

impl ClientConfig {
    /// Build a config for an explicit base address with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is empty or not `http(s)://`.
    pub fn with_api_url(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { api_url: normalize_api_url(api_url)?, timeouts: Timeouts::default() })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `OLAHUB_API_URL`: default `http://localhost:8000/api`, also when blank
    /// - `OLAHUB_REQUEST_TIMEOUT_SECS`: default 30
    /// - `OLAHUB_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `OLAHUB_API_URL` is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is set but unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("OLAHUB_API_URL").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => normalize_api_url(&raw)?,
            None => DEFAULT_API_URL.to_owned(),
        };
        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("OLAHUB_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("OLAHUB_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { api_url, timeouts })
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

pub(crate) fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyApiUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(trimmed.to_owned()));
    }
    Ok(trimmed.to_owned())
}
