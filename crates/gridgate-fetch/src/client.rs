//! HTTP client for the Markets Gateway exchanges.

use reqwest::Client;
use std::time::Duration;

use crate::Environment;

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Target environment (production or sandbox).
    pub environment: Environment,
    /// Bounded per-exchange timeout.
    pub timeout: Duration,
    /// Skip TLS certificate verification. Off by default; the gateway
    /// presents valid certificates and this exists only for debugging
    /// against intercepting proxies.
    pub accept_invalid_certs: bool,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            user_agent: format!("gridgate/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client shared by the login and query exchanges.
///
/// Exchanges are performed strictly one at a time; the client carries no
/// state besides the connection pool and the configuration.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    config: ClientConfig,
}

impl GatewayClient {
    /// Creates a new gateway client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the target environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.config.environment
    }

    /// The underlying HTTP client.
    pub(crate) const fn http(&self) -> &Client {
        &self.client
    }
}
