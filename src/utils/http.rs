//! HTTP client utilities.

use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;

use crate::sources::SourceError;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with sensible defaults
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        Self::with_user_agent(USER_AGENT, timeout)
    }

    /// Create a new HTTP client with a custom user agent
    pub fn with_user_agent(user_agent: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SourceError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            timeout,
        })
    }

    /// Request timeout applied to every call
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a GET request with the client's timeout applied
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).timeout(self.timeout)
    }
}
