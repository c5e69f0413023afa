use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::models::AppError;

/// Trait for HTTP client operations to enable testing with mocks.
///
/// This trait abstracts the single POST the client performs so tests can
/// substitute a mock and never touch the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a JSON POST request and return the response body as Value.
    ///
    /// The HTTP status is not inspected: any response whose body is JSON
    /// is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] if the request fails and
    /// [`AppError::InvalidResponse`] if the body is not JSON.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, AppError>;
}

/// Production HTTP client implementation using reqwest.
///
/// This client wraps `reqwest::Client` to implement the `HttpClient` trait
/// for production use. No request timeout is configured.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, AppError> {
        // .json() sets Content-Type: application/json
        let response = self.client.post(url).json(body).send().await?;

        debug!(status = %response.status(), "Received response");

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::InvalidResponse(e.to_string()))
    }
}
