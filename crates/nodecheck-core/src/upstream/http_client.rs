use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::{
    types::{JsonRpcRequest, JsonRpcResponse},
    upstream::UpstreamError,
};

/// Maximum number of response body bytes kept in an [`UpstreamError::HttpError`].
const MAX_ERROR_BODY_LEN: usize = 256;

/// Configuration for the shared HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Upper bound for establishing a TCP/TLS connection to a node.
    pub connect_timeout: Duration,
    /// Optional per-request timeout. `None` leaves request deadlines to the
    /// caller's cancellation token.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            user_agent: concat!("evm-node-check/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP JSON-RPC client shared by every node session of a run.
///
/// Connection pooling is handled by reqwest; each call is a single POST with no
/// retries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, UpstreamError> {
        Self::with_config(&HttpClientConfig::default())
    }

    /// Creates a new HTTP client with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(config: &HttpClientConfig) -> Result<Self, UpstreamError> {
        let mut builder = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(config.connect_timeout)
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.as_str())
            .tcp_nodelay(true);

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            tracing::error!(error = %e, "failed to build http client");
            UpstreamError::ConnectionFailed(format!("HTTP client build failed: {e}"))
        })?;

        Ok(Self { client })
    }

    /// Sanitizes network errors so node URLs with embedded API keys do not leak into reports.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_timeout() {
            "connection timed out".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_decode() {
            "response decode error".to_string()
        } else if error.is_redirect() {
            "unexpected redirect".to_string()
        } else {
            "network error".to_string()
        }
    }

    /// Posts a JSON-RPC request and decodes the envelope.
    ///
    /// A JSON-RPC `error` object is turned into [`UpstreamError::RpcError`]; a
    /// missing or `null` result is returned as `None`.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Timeout`] if the request times out
    /// - [`UpstreamError::ConnectionFailed`] for network-level failures
    /// - [`UpstreamError::HttpError`] for non-success HTTP status codes
    /// - [`UpstreamError::InvalidResponse`] if the body is not a JSON-RPC response
    /// - [`UpstreamError::RpcError`] if the node answered with an error object
    pub async fn call(
        &self,
        url: &str,
        request: &JsonRpcRequest,
    ) -> Result<Option<serde_json::Value>, UpstreamError> {
        let body = serde_json::to_vec(request).map_err(|e| {
            UpstreamError::InvalidResponse(format!("failed to serialize request: {e}"))
        })?;

        tracing::trace!(method = %request.method, id = request.id, "http request started");

        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .body(bytes::Bytes::from(body))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::ConnectionFailed(Self::sanitize_network_error(&e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw_text = response.text().await.unwrap_or_default();
            let sanitized_text = if raw_text.len() > MAX_ERROR_BODY_LEN {
                let cut = floor_char_boundary(&raw_text, MAX_ERROR_BODY_LEN);
                format!("{}... (truncated)", &raw_text[..cut])
            } else {
                raw_text
            };
            tracing::trace!(status = status.as_u16(), "http request failed");
            return Err(UpstreamError::HttpError(status.as_u16(), sanitized_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::ConnectionFailed(Self::sanitize_network_error(&e)))?;

        let envelope: JsonRpcResponse = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::InvalidResponse(format!("invalid JSON: {e}")))?;

        if let Some(error) = envelope.error {
            return Err(UpstreamError::RpcError(error.code, error.message));
        }

        tracing::trace!(method = %request.method, id = request.id, "http request completed");
        Ok(envelope.result.filter(|value| !value.is_null()))
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
