//! Client configuration.

use url::Url;

/// Default gate address for local runs.
pub const DEFAULT_GATE_URL: &str = "http://localhost:3000";

/// Default linking service.
pub const DEFAULT_LINKING_URL: &str = "https://api.staging.self.xyz";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },
}

/// Base URL and timeout for one HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Per-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_secs: 30,
        }
    }

    /// Parse `base_url`, trimming any trailing slash.
    pub fn parse(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(base_url.trim_end_matches('/'))?))
    }

    /// Gate client config from `DISCLOSE_API_URL`.
    pub fn gate_from_env() -> Result<Self, ConfigError> {
        Self::from_env_var("DISCLOSE_API_URL", DEFAULT_GATE_URL)
    }

    /// Linking client config from `LINKING_SERVICE_URL`.
    pub fn linking_from_env() -> Result<Self, ConfigError> {
        Self::from_env_var("LINKING_SERVICE_URL", DEFAULT_LINKING_URL)
    }

    fn from_env_var(var: &'static str, default: &str) -> Result<Self, ConfigError> {
        let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
        let mut config =
            Self::parse(&raw).map_err(|source| ConfigError::InvalidUrl { var, source })?;
        if let Some(secs) = std::env::var("DISCLOSE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }
        Ok(config)
    }

    /// Join `path` onto the base URL as a string.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}
