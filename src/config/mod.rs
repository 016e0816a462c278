//! Configuration module for the Fastly client.
//!
//! Holds the API key, base URL, timeout, and header settings shared by every
//! request the client makes.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{FastlyError, FastlyResult};

/// Default base URL for the Fastly API.
pub const DEFAULT_BASE_URL: &str = "https://api.fastly.com";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = concat!("integrations-fastly/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the API key.
pub const API_KEY_ENV_VAR: &str = "FASTLY_API_KEY";

/// Environment variable overriding the base URL.
pub const API_URL_ENV_VAR: &str = "FASTLY_API_URL";

/// Environment variable overriding the timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "FASTLY_TIMEOUT";

/// Configuration for the Fastly client.
#[derive(Clone)]
pub struct FastlyConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl FastlyConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> FastlyConfigBuilder {
        FastlyConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FASTLY_API_KEY` (required): API key for authentication
    /// - `FASTLY_API_URL` (optional): Custom base URL
    /// - `FASTLY_TIMEOUT` (optional): Request timeout in seconds
    pub fn from_env() -> FastlyResult<Self> {
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|_| FastlyError::Configuration {
            message: format!("{} environment variable not set", API_KEY_ENV_VAR),
        })?;

        let mut builder = FastlyConfigBuilder::new().api_key(api_key);

        if let Ok(base_url) = std::env::var(API_URL_ENV_VAR) {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var(TIMEOUT_ENV_VAR) {
            match timeout_str.parse::<u64>() {
                Ok(secs) => builder = builder.timeout(Duration::from_secs(secs)),
                Err(_) => tracing::warn!(value = %timeout_str, "Ignoring unparseable {}", TIMEOUT_ENV_VAR),
            }
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        crate::auth::key_hint(self.api_key.expose_secret())
    }
}

impl std::fmt::Debug for FastlyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastlyConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for `FastlyConfig`.
#[derive(Default)]
pub struct FastlyConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    custom_headers: Vec<(String, String)>,
}

impl FastlyConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> FastlyResult<FastlyConfig> {
        let api_key = self.api_key.ok_or_else(|| FastlyError::Configuration {
            message: "API key is required".to_string(),
        })?;

        if api_key.is_empty() {
            return Err(FastlyError::Configuration {
                message: "API key cannot be empty".to_string(),
            });
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(FastlyError::Configuration {
                message: "Base URL must start with http:// or https://".to_string(),
            });
        }
        url::Url::parse(&base_url)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        if user_agent.is_empty() {
            return Err(FastlyError::Configuration {
                message: "User-Agent cannot be empty".to_string(),
            });
        }

        Ok(FastlyConfig {
            api_key: SecretString::new(api_key),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent,
            custom_headers: self.custom_headers,
        })
    }
}
