//! Core type definitions shared by the transport and the checker.
//!
//! # Type Categories
//!
//! ## JSON-RPC Protocol Types
//! - [`JsonRpcRequest`], [`JsonRpcResponse`], [`JsonRpcError`]: wire format spoken to nodes
//!
//! ## Chain Data Types
//! - [`BlockHash`]: 32-byte block hash parsed from `0x`-prefixed hex
//! - [`NodeDescriptor`]: one RPC endpoint belonging to a logical chain

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::BTreeMap};

/// JSON-RPC protocol version constant to avoid repeated allocations.
pub const JSONRPC_VERSION: &str = "2.0";

/// Pre-allocated `Cow` for the JSON-RPC version.
pub const JSONRPC_VERSION_COW: Cow<'static, str> = Cow::Borrowed(JSONRPC_VERSION);

/// JSON-RPC 2.0 request structure.
///
/// Field order matters for readability of the serialized body: `method` is
/// emitted before `params`, which the integration mocks rely on.
///
/// # Example
///
/// ```
/// use nodecheck_core::types::JsonRpcRequest;
/// use serde_json::json;
///
/// let request = JsonRpcRequest::new("eth_blockNumber", json!([]), 1);
///
/// assert_eq!(request.method, "eth_blockNumber");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: Cow<'static, str>,
    pub method: String,
    pub params: serde_json::Value,
    pub id: u64,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with zero allocation for the version string.
    #[must_use]
    pub fn new(method: impl Into<String>, params: serde_json::Value, id: u64) -> Self {
        Self { jsonrpc: JSONRPC_VERSION_COW, method: method.into(), params, id }
    }
}

/// JSON-RPC 2.0 response structure.
///
/// A response contains either a `result` or an `error`. A `null` result is a
/// valid answer (for example a block the node does not have yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// 32-byte block hash.
///
/// Displays and serializes as a lowercase `0x`-prefixed hex string.
///
/// # Example
/// ```
/// use nodecheck_core::types::BlockHash;
///
/// let hash: BlockHash = "0xabcd1234abcd1234abcd1234abcd1234abcd1234abcd1234abcd1234abcd1234"
///     .parse()
///     .unwrap();
/// assert_eq!(hash[0], 0xab);
/// ```
pub type BlockHash = B256;

/// One RPC endpoint of a logical chain.
///
/// Several descriptors may share an `id` when an upstream declares more than
/// one connector; `address` is unique across the whole configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: String,
    pub chain: String,
    pub address: String,
}

impl NodeDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, chain: impl Into<String>, address: impl Into<String>) -> Self {
        Self { id: id.into(), chain: chain.into(), address: address.into() }
    }
}

/// Node descriptors grouped by chain name.
///
/// A `BTreeMap` keeps chain processing order stable between runs.
pub type NodesByChain = BTreeMap<String, Vec<NodeDescriptor>>;
