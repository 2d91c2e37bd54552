//! Node sessions: the four remote operations the checker needs from one endpoint.
//!
//! [`NodeConnector`] opens a [`NodeSession`] for an address. The session is an
//! owned value; dropping it releases whatever the transport holds for that node,
//! so a probe that returns early on any path still releases its session.

use alloy_primitives::U256;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{
    types::{BlockHash, JsonRpcRequest},
    upstream::{http_client::HttpClient, UpstreamError},
    utils::{format_quantity, parse_quantity, parse_quantity_u256},
};

/// Opens sessions to node endpoints.
///
/// Abstracted so the checker can be driven by in-memory nodes in tests.
#[async_trait]
pub trait NodeConnector: Send + Sync {
    /// Establishes a session with the endpoint at `address`.
    async fn connect(&self, address: &str) -> Result<Box<dyn NodeSession>, UpstreamError>;
}

/// An open session with one node.
#[async_trait]
pub trait NodeSession: Send + Sync {
    /// Returns the network identity reported by the node (`eth_chainId`).
    async fn chain_id(&self) -> Result<U256, UpstreamError>;

    /// Returns the latest block height known to the node (`eth_blockNumber`).
    async fn block_number(&self) -> Result<u64, UpstreamError>;

    /// Returns the canonical hash of block `number`, or `None` if the node does not have it.
    async fn block_hash(&self, number: u64) -> Result<Option<BlockHash>, UpstreamError>;

    /// Runs the call tracer over block `number`. Only success matters.
    async fn trace_block(&self, number: u64) -> Result<(), UpstreamError>;
}

/// Connector for HTTP(S) JSON-RPC endpoints.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Arc<HttpClient>,
}

impl HttpConnector {
    #[must_use]
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeConnector for HttpConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn NodeSession>, UpstreamError> {
        let url = reqwest::Url::parse(address)
            .map_err(|e| UpstreamError::InvalidAddress(format!("{e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(UpstreamError::InvalidAddress(format!(
                "unsupported scheme '{}', expected http or https",
                url.scheme()
            )));
        }

        tracing::trace!(host = url.host_str().unwrap_or_default(), "node session opened");

        Ok(Box::new(HttpSession {
            client: Arc::clone(&self.client),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }))
    }
}

/// JSON-RPC session over the shared HTTP client.
struct HttpSession {
    client: Arc<HttpClient>,
    url: String,
    next_id: AtomicU64,
}

/// Minimal block header: only the hash is consumed.
#[derive(Deserialize)]
struct BlockHeader {
    hash: BlockHash,
}

impl HttpSession {
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<serde_json::Value>, UpstreamError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(method, params, id);
        self.client.call(&self.url, &request).await
    }

    async fn required(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.request(method, params)
            .await?
            .ok_or_else(|| UpstreamError::InvalidResponse(format!("{method} returned null")))
    }
}

#[async_trait]
impl NodeSession for HttpSession {
    async fn chain_id(&self) -> Result<U256, UpstreamError> {
        let value = self.required("eth_chainId", json!([])).await?;
        parse_quantity_u256(&value).map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }

    async fn block_number(&self) -> Result<u64, UpstreamError> {
        let value = self.required("eth_blockNumber", json!([])).await?;
        parse_quantity(&value).map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }

    async fn block_hash(&self, number: u64) -> Result<Option<BlockHash>, UpstreamError> {
        let Some(value) =
            self.request("eth_getBlockByNumber", json!([format_quantity(number), false])).await?
        else {
            return Ok(None);
        };

        let header: BlockHeader = serde_json::from_value(value)
            .map_err(|e| UpstreamError::InvalidResponse(format!("invalid block header: {e}")))?;
        Ok(Some(header.hash))
    }

    async fn trace_block(&self, number: u64) -> Result<(), UpstreamError> {
        self.request(
            "debug_traceBlockByNumber",
            json!([format_quantity(number), { "tracer": "callTracer" }]),
        )
        .await
        .map(|_| ())
    }
}

impl Drop for HttpSession {
    fn drop(&mut self) {
        tracing::trace!(requests = self.next_id.load(Ordering::Relaxed) - 1, "node session released");
    }
}
