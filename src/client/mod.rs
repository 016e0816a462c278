//! Fastly API client.
//!
//! Provides the main client interface for the Fastly configuration API.

mod executor;

pub use executor::RequestExecutor;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{FastlyConfig, FastlyConfigBuilder};
use crate::errors::{FastlyError, FastlyResult};
use crate::observability::{DefaultMetricsCollector, MetricsCollector};
use crate::services::S3LoggingService;
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main Fastly client.
///
/// # Example
///
/// ```rust,no_run
/// use integrations_fastly::{FastlyClient, ListS3sInput};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = FastlyClient::builder()
///         .api_key("your-fastly-api-token")
///         .build()?;
///
///     let endpoints = client
///         .s3()
///         .list(&ListS3sInput::new("SU1Z0isxPaozGVKXdv0eY", 1))
///         .await?;
///     for endpoint in endpoints {
///         println!("{}", endpoint.name);
///     }
///     Ok(())
/// }
/// ```
pub struct FastlyClient {
    config: FastlyConfig,
    s3_service: S3LoggingService,
    metrics: Arc<dyn MetricsCollector>,
}

impl FastlyClient {
    /// Creates a new client builder.
    pub fn builder() -> FastlyClientBuilder {
        FastlyClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `FASTLY_API_KEY` and optionally `FASTLY_API_URL` and
    /// `FASTLY_TIMEOUT`.
    pub fn from_env() -> FastlyResult<Self> {
        let config = FastlyConfig::from_env()?;
        FastlyClientBuilder::from_config(config).build()
    }

    /// Creates a client from an API key.
    pub fn from_api_key(api_key: impl Into<String>) -> FastlyResult<Self> {
        FastlyClientBuilder::new().api_key(api_key).build()
    }

    /// Returns the S3 logging endpoint service.
    pub fn s3(&self) -> &S3LoggingService {
        &self.s3_service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FastlyConfig {
        &self.config
    }

    /// Returns the metrics collector.
    pub fn metrics(&self) -> &Arc<dyn MetricsCollector> {
        &self.metrics
    }
}

impl std::fmt::Debug for FastlyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastlyClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Fastly client.
pub struct FastlyClientBuilder {
    config_builder: FastlyConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    metrics: Option<Arc<dyn MetricsCollector>>,
}

impl FastlyClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: FastlyConfigBuilder::new(),
            transport: None,
            auth: None,
            metrics: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: FastlyConfig) -> Self {
        let mut config_builder = FastlyConfigBuilder::new()
            .api_key(config.api_key())
            .base_url(&config.base_url)
            .timeout(config.timeout)
            .user_agent(&config.user_agent);
        for (name, value) in &config.custom_headers {
            config_builder = config_builder.header(name, value);
        }

        Self {
            config_builder,
            ..Self::new()
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(user_agent);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets a custom metrics collector.
    pub fn metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the client.
    pub fn build(self) -> FastlyResult<FastlyClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout).map_err(|e| {
                    FastlyError::Configuration {
                        message: e.to_string(),
                    }
                })?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ApiKeyAuth::from_string(config.api_key())),
        };
        auth.validate()?;

        let metrics: Arc<dyn MetricsCollector> = self
            .metrics
            .unwrap_or_else(|| Arc::new(DefaultMetricsCollector::new()));

        let executor = Arc::new(RequestExecutor::new(config.clone(), transport, auth));
        let s3_service = S3LoggingService::new(executor, Arc::clone(&metrics));

        tracing::debug!(base_url = %config.base_url, "Fastly client initialised");

        Ok(FastlyClient {
            config,
            s3_service,
            metrics,
        })
    }
}

impl Default for FastlyClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FastlyClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastlyClientBuilder")
            .field("custom_transport", &self.transport.is_some())
            .field("custom_auth", &self.auth.is_some())
            .finish()
    }
}
