//! REST client for the theme API
//!
//! Thin wrapper around reqwest: builds `{base_url}/v1/<endpoint>` URLs,
//! applies default headers, retries network failures and turns the
//! `{error: {message}}` envelope into [`ClientError::Api`].

use crate::error::{ClientError, Result};
use crate::retry::{network_retry, RetryConfig};
use reqwest::{Client as ReqwestClient, Response as ReqwestResponse};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the REST client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the dashboard backend (e.g., "https://stats.example.com")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Headers sent with every request (e.g., Authorization)
    pub default_headers: BTreeMap<String, String>,
    /// Retry policy for network failures
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8804".to_string(),
            timeout_secs: 30,
            user_agent: format!("dashboard-theme/{}", env!("CARGO_PKG_VERSION")),
            default_headers: BTreeMap::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

// =============================================================================
// Requests
// =============================================================================

/// HTTP method of an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

/// A request to one API endpoint
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint under `/v1/` (e.g., "theme")
    pub endpoint: String,
    /// Query parameters, in insertion order
    pub params: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self { method, endpoint: endpoint.into(), params: Vec::new(), body: None }
    }

    /// GET request
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// POST request
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    /// DELETE request
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Set the request body from JSON
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value).map_err(|e| ClientError::Config(e.to_string()))?;
        self.body = Some(body);
        Ok(self)
    }

    /// Full URL for a base URL, query values percent-encoded
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}/v1/{}", base_url.trim_end_matches('/'), self.endpoint);
        for (i, (key, value)) in self.params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

/// Error envelope returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details
    pub error: ErrorBody,
}

/// Body of an error envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
}

// =============================================================================
// Client
// =============================================================================

/// REST client for the theme endpoints
#[derive(Debug, Clone)]
pub struct RestClient {
    client: ReqwestClient,
    config: ClientConfig,
}

impl RestClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Execute a request with network retries and parse the JSON response
    pub async fn send<T>(&self, request: &ApiRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        network_retry(&self.config.retry, || self.execute_request(request)).await
    }

    async fn execute_request<T>(&self, request: &ApiRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = request.url(&self.config.base_url);

        let mut req = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        if let Some(body) = &request.body {
            req = req.header("Content-Type", "application/json").body(body.clone());
        }

        let response = req.send().await.map_err(|e| {
            tracing::debug!(url = %url, error = %e, "request failed");
            ClientError::Network(format!("Request failed: {e}"))
        })?;

        self.parse_response(response).await
    }

    async fn parse_response<T>(&self, response: ReqwestResponse) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => format!("HTTP {}: {}", status.as_u16(), body),
            };
            return Err(ClientError::Api { status: status.as_u16(), message });
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_query_values() {
        let request = ApiRequest::get("theme").param("theme", "My Theme & Co");
        assert_eq!(
            request.url("https://stats.example.com/"),
            "https://stats.example.com/v1/theme?theme=My%20Theme%20%26%20Co"
        );
    }

    #[test]
    fn test_url_without_params() {
        assert_eq!(ApiRequest::get("themes").url("http://h"), "http://h/v1/themes");
        let two = ApiRequest::delete("deleteTheme").param("a", "1").param("b", "2");
        assert_eq!(two.url("http://h"), "http://h/v1/deleteTheme?a=1&b=2");
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("saveTheme")
            .json_body(&serde_json::json!({"theme": {"name": "x"}}))
            .unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert!(body.contains("\"name\":\"x\""));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new("https://custom.server")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("Custom/1.0")
            .with_header("Authorization", "Bearer abc")
            .with_retry(RetryConfig::new(0));

        assert_eq!(config.base_url, "https://custom.server");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, "Custom/1.0");
        assert_eq!(config.default_headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
        assert_eq!(config.retry.max_retries, 0);

        let client = RestClient::new(config).unwrap();
        assert_eq!(client.base_url(), "https://custom.server");
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("dashboard-theme/"));
    }
}
