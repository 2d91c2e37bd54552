//! Per-chain baseline computation and rule classification.
//!
//! # Rules
//!
//! Nodes are classified in configuration order. The first rule that matches
//! produces the node's only rule failure:
//!
//! 1. the probe failed
//! 2. network id differs from the baseline
//! 3. the node trails the highest node by more than `max_block_gap`
//! 4. trace checking is enabled and the node has no trace capability
//!
//! Hash mismatches are found separately by [`super::reconcile`] and appended
//! after the rule failures.

use alloy_primitives::U256;

use super::{
    config::CheckOptions,
    reconcile,
    types::{ChainOutcome, FailureReason, FailureRecord, NodeOutcome},
};

/// Reference values derived from the nodes that probed successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainBaseline {
    /// Network id of the first successful node in configuration order.
    pub network_id: Option<U256>,
    /// Highest height among successful nodes, 0 if none succeeded.
    pub max_height: u64,
}

impl ChainBaseline {
    #[must_use]
    pub fn from_outcomes(nodes: &[NodeOutcome]) -> Self {
        let network_id = nodes.iter().find_map(NodeOutcome::snapshot).map(|s| s.network_id);
        let max_height =
            nodes.iter().filter_map(NodeOutcome::snapshot).map(|s| s.height).max().unwrap_or(0);
        Self { network_id, max_height }
    }
}

/// Returns the first rule `node` fails against `baseline`, if any.
#[must_use]
pub fn classify(
    node: &NodeOutcome,
    baseline: &ChainBaseline,
    options: &CheckOptions,
) -> Option<FailureReason> {
    let snapshot = match &node.result {
        Ok(snapshot) => snapshot,
        Err(failure) => return Some(FailureReason::Probe(failure.to_string())),
    };

    if let Some(expected) = baseline.network_id {
        if snapshot.network_id != expected {
            return Some(FailureReason::NetworkIdMismatch {
                expected,
                actual: snapshot.network_id,
            });
        }
    }

    let gap = baseline.max_height.saturating_sub(snapshot.height);
    if gap > options.max_block_gap {
        return Some(FailureReason::BehindTip { gap, max_gap: options.max_block_gap });
    }

    if options.check_trace_capability && !snapshot.trace_capable {
        return Some(FailureReason::TraceUnavailable);
    }

    None
}

/// Builds the chain verdict from probe outcomes already joined in configuration order.
#[must_use]
pub fn evaluate_chain(
    chain: &str,
    nodes: Vec<NodeOutcome>,
    options: &CheckOptions,
) -> ChainOutcome {
    let baseline = ChainBaseline::from_outcomes(&nodes);

    let mut failed_nodes: Vec<FailureRecord> = nodes
        .iter()
        .filter_map(|node| {
            classify(node, &baseline, options).map(|reason| FailureRecord::new(&node.node, reason))
        })
        .collect();

    failed_nodes.extend(reconcile::reconcile_hashes(&nodes));

    ChainOutcome {
        chain: chain.to_string(),
        nodes,
        expected_network_id: baseline.network_id,
        max_height: baseline.max_height,
        passed: failed_nodes.is_empty(),
        failed_nodes,
    }
}
