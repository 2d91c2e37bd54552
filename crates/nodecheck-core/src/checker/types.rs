//! Outcome types produced by a check run.
//!
//! Everything here is built once per run and never mutated afterwards.

use alloy_primitives::U256;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::{collections::BTreeMap, fmt};
use thiserror::Error;

use crate::{
    types::{BlockHash, NodeDescriptor},
    upstream::UpstreamError,
};

/// Why probing a node stopped before a snapshot could be taken.
#[derive(Debug, Clone, Error)]
pub enum ProbeFailure {
    /// No session could be established with the node.
    #[error("failed to connect: {0}")]
    Connect(#[source] UpstreamError),

    /// A required call failed after the session was established.
    #[error("failed to get {what}: {source}")]
    Query {
        what: &'static str,
        #[source]
        source: UpstreamError,
    },

    /// The probe task ended without producing an outcome.
    #[error("probe task aborted: {0}")]
    Aborted(String),
}

impl ProbeFailure {
    pub(crate) fn query(what: &'static str, source: UpstreamError) -> Self {
        Self::Query { what, source }
    }
}

/// What a node reported when every required call succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub network_id: U256,
    pub height: u64,
    /// Hashes of recent blocks keyed by height. Heights whose fetch failed are absent.
    pub block_hashes: BTreeMap<u64, BlockHash>,
    pub trace_capable: bool,
}

/// Result of probing one node.
#[derive(Debug, Clone)]
pub struct NodeOutcome {
    pub node: NodeDescriptor,
    pub result: Result<NodeSnapshot, ProbeFailure>,
}

impl NodeOutcome {
    #[must_use]
    pub fn snapshot(&self) -> Option<&NodeSnapshot> {
        self.result.as_ref().ok()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&ProbeFailure> {
        self.result.as_ref().err()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl Serialize for NodeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NodeOutcome", 8)?;
        state.serialize_field("id", &self.node.id)?;
        state.serialize_field("chain", &self.node.chain)?;
        state.serialize_field("address", &self.node.address)?;
        match &self.result {
            Ok(snapshot) => {
                state.serialize_field("network_id", &Some(snapshot.network_id))?;
                state.serialize_field("height", &snapshot.height)?;
                state.serialize_field("block_hashes", &snapshot.block_hashes)?;
                state.serialize_field("trace_capable", &snapshot.trace_capable)?;
                state.serialize_field("failure", &None::<String>)?;
            }
            Err(failure) => {
                state.serialize_field("network_id", &None::<U256>)?;
                state.serialize_field("height", &0u64)?;
                state.serialize_field("block_hashes", &BTreeMap::<u64, BlockHash>::new())?;
                state.serialize_field("trace_capable", &false)?;
                state.serialize_field("failure", &Some(failure.to_string()))?;
            }
        }
        state.end()
    }
}

/// A consistency rule a node failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The probe itself failed; carries the rendered [`ProbeFailure`].
    Probe(String),
    NetworkIdMismatch { expected: U256, actual: U256 },
    BehindTip { gap: u64, max_gap: u64 },
    TraceUnavailable,
    HashMismatch { height: u64, hash: BlockHash, majority: BlockHash },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe(cause) => write!(f, "connection/query error: {cause}"),
            Self::NetworkIdMismatch { expected, actual } => {
                write!(f, "network id mismatch: expected {expected}, got {actual}")
            }
            Self::BehindTip { gap, max_gap } => {
                write!(f, "behind by {gap} blocks (max allowed {max_gap})")
            }
            Self::TraceUnavailable => f.write_str("diagnostic trace capability unavailable"),
            Self::HashMismatch { height, hash, majority } => {
                write!(f, "hash mismatch at height {height}: got {hash}, majority {majority}")
            }
        }
    }
}

impl Serialize for FailureReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One failed rule for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub node_id: String,
    pub chain: String,
    pub address: String,
    pub reason: FailureReason,
}

impl FailureRecord {
    #[must_use]
    pub fn new(node: &NodeDescriptor, reason: FailureReason) -> Self {
        Self {
            node_id: node.id.clone(),
            chain: node.chain.clone(),
            address: node.address.clone(),
            reason,
        }
    }

    #[must_use]
    pub fn is_hash_mismatch(&self) -> bool {
        matches!(self.reason, FailureReason::HashMismatch { .. })
    }
}

/// Evaluation of one logical chain.
#[derive(Debug, Clone, Serialize)]
pub struct ChainOutcome {
    pub chain: String,
    /// Probe outcomes in configuration order.
    pub nodes: Vec<NodeOutcome>,
    pub expected_network_id: Option<U256>,
    pub max_height: u64,
    /// Rule failures in node order, followed by hash mismatches.
    pub failed_nodes: Vec<FailureRecord>,
    pub passed: bool,
}

impl ChainOutcome {
    /// Returns `true` if no failure record names the node at `address`.
    #[must_use]
    pub fn is_node_healthy(&self, address: &str) -> bool {
        !self.failed_nodes.iter().any(|f| f.address == address)
    }
}

/// Final verdict over every chain.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub chains: Vec<ChainOutcome>,
    pub all_failures: Vec<FailureRecord>,
    pub passed: bool,
}

/// Input errors that prevent a run from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("no chains to check")]
    NoChains,

    #[error("chain {0} has no nodes")]
    EmptyChain(String),
}
