//! Test Helper Functions and Utilities
//!
//! Common helpers for building node groups and checkers over mock servers.

use nodecheck_core::{
    types::{NodeDescriptor, NodesByChain},
    upstream::HttpClientConfig,
    CheckOptions, Checker,
};
use std::time::Duration;

use super::RpcMockBuilder;

/// Address that refuses connections immediately.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Describes a node on `chain` served by `mock`.
#[must_use]
pub fn node_for(id: &str, chain: &str, mock: &RpcMockBuilder) -> NodeDescriptor {
    NodeDescriptor::new(id, chain, mock.url())
}

/// Groups `nodes` under a single chain.
#[must_use]
pub fn single_chain(chain: &str, nodes: Vec<NodeDescriptor>) -> NodesByChain {
    NodesByChain::from([(chain.to_string(), nodes)])
}

/// Creates an HTTP checker with short transport timeouts suited to local mocks.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn http_checker(options: CheckOptions) -> Checker {
    let http_config = HttpClientConfig {
        connect_timeout: Duration::from_secs(2),
        request_timeout: Some(Duration::from_secs(5)),
        ..HttpClientConfig::default()
    };
    Checker::with_http(options, &http_config).expect("http client should build")
}
