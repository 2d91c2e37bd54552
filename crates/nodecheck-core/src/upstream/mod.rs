//! Transport to node RPC endpoints.
//!
//! - [`http_client`]: shared reqwest-based JSON-RPC client
//! - [`session`]: [`NodeConnector`]/[`NodeSession`] seam used by the checker
//! - [`errors`]: [`UpstreamError`] and JSON-RPC error classification

pub mod errors;
pub mod http_client;
pub mod session;

pub use errors::{RpcErrorCategory, UpstreamError};
pub use http_client::{HttpClient, HttpClientConfig};
pub use session::{HttpConnector, NodeConnector, NodeSession};
