use thiserror::Error;

/// Classification of JSON-RPC error codes returned by a node.
///
/// Used for diagnostics only: a `debug_traceBlockByNumber` failure classified as
/// [`RpcErrorCategory::MethodNotFound`] means the debug namespace is disabled,
/// anything else usually means the node is struggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcErrorCategory {
    /// Invalid request or invalid params (-32600, -32602).
    ClientError,
    /// The method is not exposed by the node (-32601).
    MethodNotFound,
    /// Internal or server-defined errors.
    ProviderError,
    /// Rate limiting at JSON-RPC level (-32005).
    RateLimit,
    /// Parse error reported by the node (-32700).
    ParseError,
}

impl RpcErrorCategory {
    /// Classifies a JSON-RPC error code into a category.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32601 => Self::MethodNotFound,
            -32600 | -32602 => Self::ClientError,
            -32005 => Self::RateLimit,
            _ => Self::ProviderError,
        }
    }

    /// Returns a static string representation for log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientError => "client_error",
            Self::MethodNotFound => "method_not_found",
            Self::ProviderError => "provider_error",
            Self::RateLimit => "rate_limit",
            Self::ParseError => "parse_error",
        }
    }
}

/// Errors that can occur when talking to a node's RPC endpoint.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum UpstreamError {
    /// Request exceeded the transport timeout.
    #[error("request timeout")]
    Timeout,

    /// Failed to establish a session with the endpoint.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The endpoint address is not a usable JSON-RPC URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// HTTP-level error (non-2xx status code).
    ///
    /// First field is the HTTP status code, second is the (truncated) body.
    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    /// JSON-RPC error object returned by the node.
    ///
    /// First field is the RPC error code, second is the error message.
    #[error("RPC error {0}: {1}")]
    RpcError(i32, String),

    /// Response could not be parsed or was missing required fields.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The caller cancelled the run while the request was in flight.
    #[error("cancelled")]
    Cancelled,
}

impl UpstreamError {
    /// Returns the RPC error category if this is an RPC error.
    #[must_use]
    pub fn rpc_category(&self) -> Option<RpcErrorCategory> {
        match self {
            Self::RpcError(code, _) => Some(RpcErrorCategory::from_code(*code)),
            _ => None,
        }
    }

    /// Returns `true` if the error was produced by cancellation rather than by the node.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
