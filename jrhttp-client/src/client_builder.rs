//! Client builder for timeout, credentials, transport and observability
//!
//! The `ClientBuilder` provides a fluent API for configuring a client before
//! the first call. It allows you to:
//! - Set the exchange timeout
//! - Set Basic credentials or a raw `Authorization` header
//! - Swap in a custom [`Transport`]
//! - Configure observability (OpenTelemetry) and client metrics
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrhttp_client::ClientBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> jrhttp_core::Result<()> {
//! let client = ClientBuilder::new("http://localhost:8080/rpc")
//!     .timeout(Duration::from_secs(5))
//!     .basic_auth("svc", "s3cret")
//!     .build()?;
//!
//! let observed = ClientBuilder::new("http://localhost:8080/rpc")
//!     .with_default_observability()
//!     .service_name("billing-worker")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::basic_auth_header;
use crate::client::{url_auth, DEFAULT_TIMEOUT};
use crate::request::IdGenerator;
use crate::target::Target;
use crate::transport::{TcpTransport, Transport};
use crate::{ClientMetrics, HttpClient};
use jrhttp_core::{Error, ObservabilityConfig, Result};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_SERVICE_NAME: &str = "jrhttp";

/// Builder for configuring and creating an `HttpClient`
pub struct ClientBuilder {
    url: String,
    timeout: Duration,
    auth_header: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    observability_config: Option<ObservabilityConfig>,
    service_name: Option<String>,
    enable_metrics: bool,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            auth_header: None,
            transport: None,
            observability_config: None,
            service_name: None,
            enable_metrics: false,
        }
    }

    /// Timeout for each exchange (default 60 seconds)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Authenticate with HTTP Basic credentials
    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        self.auth_header = Some(basic_auth_header(username, password));
        self
    }

    /// Send this `Authorization` header value verbatim
    pub fn auth_header(mut self, header: impl Into<String>) -> Self {
        self.auth_header = Some(header.into());
        self
    }

    /// Use a custom transport instead of [`TcpTransport`]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Enable OpenTelemetry observability with custom configuration
    ///
    /// Implies metrics. The global subscriber and providers are installed by
    /// `build`, which fails if they already are.
    pub fn with_observability(mut self, config: ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Enable OpenTelemetry observability with default configuration
    pub fn with_default_observability(mut self) -> Self {
        self.observability_config = Some(ObservabilityConfig::default());
        self
    }

    /// Set service name for observability and metrics
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Record client metrics on the global meter provider
    ///
    /// Use this when the application sets up OpenTelemetry itself.
    pub fn with_metrics(mut self) -> Self {
        self.enable_metrics = true;
        self
    }

    /// Build the client
    ///
    /// Nothing is connected here; each call opens its own connection.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidTarget` if the URL cannot be used
    /// - `Error::Internal` if observability fails to initialize
    pub fn build(self) -> Result<HttpClient> {
        let target = Target::parse(&self.url)?;

        let metrics = if let Some(mut config) = self.observability_config {
            if let Some(name) = self.service_name {
                config.service_name = name;
            }

            jrhttp_core::init_observability(config.clone()).map_err(|e| {
                Error::Internal(format!("Failed to initialize observability: {}", e))
            })?;

            Some(Arc::new(ClientMetrics::new(config.service_name)))
        } else if self.enable_metrics {
            let name = self
                .service_name
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
            Some(Arc::new(ClientMetrics::new(name)))
        } else {
            None
        };

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(TcpTransport::new()));

        tracing::debug!(
            url = %target,
            timeout = ?self.timeout,
            authenticated = self.auth_header.is_some() || target.credentials().is_some(),
            "Client configured"
        );

        Ok(HttpClient {
            url_auth: url_auth(&target),
            target,
            auth_header: self.auth_header,
            timeout: self.timeout,
            transport,
            ids: IdGenerator::new(),
            metrics,
        })
    }
}
