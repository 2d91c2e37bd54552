//! RPC Mock Builder for Ethereum JSON-RPC Testing
//!
//! Wraps mockito to answer the calls the checker makes against a node.
//! Each matcher pins both the method and, where relevant, the first parameter,
//! so mocks for different blocks never shadow each other.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

/// Canonical hash for a block height.
#[must_use]
pub fn canonical_hash(number: u64) -> String {
    format!("0x{number:064x}")
}

/// Hash for a block height on a competing fork.
#[must_use]
pub fn fork_hash(number: u64) -> String {
    format!("0xff{number:062x}")
}

/// Builder for creating mock Ethereum RPC responses.
pub struct RpcMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl RpcMockBuilder {
    /// Creates a new RPC mock builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    /// Returns the URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    fn mock_result(&mut self, matcher: Matcher, result: &Value) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(matcher)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string())
            .create();

        self.mocks.push(mock);
        self
    }

    fn method_matcher(method: &str) -> Matcher {
        Matcher::Regex(format!(r#""method"\s*:\s*"{method}""#))
    }

    fn block_matcher(method: &str, block_number: u64) -> Matcher {
        Matcher::Regex(format!(
            r#""method"\s*:\s*"{method}".*"params"\s*:\s*\["0x{block_number:x}""#
        ))
    }

    /// Mocks an `eth_chainId` request.
    pub fn mock_chain_id(&mut self, chain_id: u64) -> &mut Self {
        self.mock_result(Self::method_matcher("eth_chainId"), &json!(format!("0x{chain_id:x}")))
    }

    /// Mocks an `eth_blockNumber` request.
    pub fn mock_block_number(&mut self, block_number: u64) -> &mut Self {
        self.mock_result(
            Self::method_matcher("eth_blockNumber"),
            &json!(format!("0x{block_number:x}")),
        )
    }

    /// Mocks an `eth_getBlockByNumber` request. `None` answers with a `null` block.
    pub fn mock_get_block_by_number(&mut self, block_number: u64, hash: Option<&str>) -> &mut Self {
        let result = hash.map_or(Value::Null, |hash| {
            json!({
                "number": format!("0x{block_number:x}"),
                "hash": hash,
                "parentHash": canonical_hash(block_number.saturating_sub(1)),
                "transactions": []
            })
        });
        self.mock_result(Self::block_matcher("eth_getBlockByNumber", block_number), &result)
    }

    /// Mocks a successful `debug_traceBlockByNumber` request.
    pub fn mock_trace_block(&mut self, block_number: u64) -> &mut Self {
        self.mock_result(Self::block_matcher("debug_traceBlockByNumber", block_number), &json!([]))
    }

    /// Mocks an RPC error response.
    pub fn mock_rpc_error(&mut self, method: &str, code: i32, message: &str) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Self::method_matcher(method))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {
                        "code": code,
                        "message": message
                    }
                })
                .to_string(),
            )
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a server error (500) for one block of `method`.
    pub fn mock_block_server_error(&mut self, method: &str, block_number: u64) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Self::block_matcher(method, block_number))
            .with_status(500)
            .with_body("Internal Server Error")
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a node at `height` that serves canonical hashes for the last
    /// `window` blocks and supports tracing.
    pub fn mock_healthy_node(&mut self, chain_id: u64, height: u64, window: u64) -> &mut Self {
        self.mock_chain_id(chain_id).mock_block_number(height);
        for number in (height.saturating_sub(window.saturating_sub(1))..=height).rev() {
            self.mock_get_block_by_number(number, Some(&canonical_hash(number)));
        }
        self.mock_trace_block(height)
    }

    /// Verifies all mocks were called.
    #[must_use]
    pub fn verify_all_called(&self) -> bool {
        self.mocks.iter().all(Mock::matched)
    }
}
