//! LinkOps Agent Client
//!
//! A simple, type-safe HTTP client for the agent gateway that runs scripts on
//! enrolled machines.
//!
//! The runner's agent probe is built on top of this client; anything else that
//! needs to talk to the gateway should go through it too.
//!
//! # Example
//!
//! ```no_run
//! use linkops_client::AgentClient;
//! use linkops_core::dto::script_run::ScriptRunRequest;
//!
//! # async fn example() -> linkops_client::Result<()> {
//! let client = AgentClient::new("http://localhost:9090");
//!
//! let response = client
//!     .run_script(
//!         "vm-gitea-01",
//!         &ScriptRunRequest {
//!             script_id: "baseline".to_string(),
//!             flags: vec!["--verbose".to_string()],
//!         },
//!     )
//!     .await?;
//!
//! println!("baseline on vm-gitea-01: {}", response.status);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod scripts;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use linkops_core::dto::script_run::{ScriptRunRequest, ScriptRunResponse};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the agent gateway API
#[derive(Debug, Clone)]
pub struct AgentClient {
    /// Base URL of the gateway (e.g., "http://localhost:9090")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl AgentClient {
    /// Create a new agent client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the gateway API (e.g., "http://localhost:9090")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new agent client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use linkops_client::AgentClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = AgentClient::with_client("http://localhost:9090", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the gateway
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success status codes become `ClientError::ApiError` carrying the
    /// response body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AgentClient::new("http://localhost:9090");
        assert_eq!(client.base_url(), "http://localhost:9090");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = AgentClient::new("http://localhost:9090/");
        assert_eq!(client.base_url(), "http://localhost:9090");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = AgentClient::with_client("http://localhost:9090", http_client);
        assert_eq!(client.base_url(), "http://localhost:9090");
    }
}
