//! HTTP client utilities.

use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;

use crate::sources::SourceError;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the User-Agent header
pub const USER_AGENT_ENV: &str = "CITATION_RELATIONS_USER_AGENT";

/// User agent sent with every request, honouring [`USER_AGENT_ENV`]
pub fn get_user_agent() -> String {
    std::env::var(USER_AGENT_ENV).unwrap_or_else(|_| {
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
    })
}

/// Shared HTTP client with sensible defaults
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(&get_user_agent(), DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new HTTP client with a custom user agent and request timeout
    pub fn with_timeout(user_agent: &str, timeout_secs: u64) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SourceError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new().is_ok());
        assert!(HttpClient::with_timeout("test-agent/1.0", 5).is_ok());
    }

    #[test]
    fn test_default_user_agent_names_crate() {
        if std::env::var(USER_AGENT_ENV).is_err() {
            assert!(get_user_agent().starts_with("citation-relations/"));
        }
    }
}
