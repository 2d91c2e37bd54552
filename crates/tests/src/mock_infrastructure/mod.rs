//! Mock Infrastructure for Testing the Node Checker
//!
//! ## Components
//!
//! - `RpcMockBuilder`: Wraps mockito to answer the JSON-RPC calls made while probing a node
//! - Test helpers for building node groups
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::RpcMockBuilder;
//!
//! let mut node = RpcMockBuilder::new().await;
//! node.mock_healthy_node(1, 100, 5);
//!
//! // Use node.url() as the connector URL
//! ```

pub mod rpc_mock;
pub mod test_helpers;

pub use rpc_mock::{canonical_hash, fork_hash, RpcMockBuilder};
pub use test_helpers::*;
