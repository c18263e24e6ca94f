//! HTTP client utilities.

use reqwest::{Client, Proxy};
use std::sync::Arc;
use std::time::Duration;

use crate::sources::SourceError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with sensible defaults
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        HttpClientBuilder::default().build()
    }

    /// Start configuring a client
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }
}

/// Builder for [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    timeout: Duration,
    proxy: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
        }
    }
}

impl HttpClientBuilder {
    /// Set the whole-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route every request through a proxy (http, https or socks5 URL)
    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HttpClient, SourceError> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .connect_timeout(self.timeout.min(Duration::from_secs(10)));

        if let Some(proxy) = self.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = Proxy::all(proxy).map_err(|e| {
                SourceError::InvalidRequest(format!("invalid proxy URL {}: {}", proxy, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SourceError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(HttpClient::from_client(Arc::new(client)))
    }
}
