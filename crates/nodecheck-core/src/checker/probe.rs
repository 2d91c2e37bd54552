//! Per-node probing.
//!
//! A probe runs the node's calls strictly in order: connect, network id,
//! height, recent block hashes, then the trace check. The first two queries
//! are required and end the probe on failure; block hash and trace failures
//! are soft and only logged.

use std::{collections::BTreeMap, future::Future};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};

use super::{
    config::CheckOptions,
    types::{NodeOutcome, NodeSnapshot, ProbeFailure},
};
use crate::{
    types::{BlockHash, NodeDescriptor},
    upstream::{NodeConnector, NodeSession, UpstreamError},
};

/// Probes a single node and never fails: errors are captured in the outcome.
pub async fn probe_node(
    connector: &dyn NodeConnector,
    node: &NodeDescriptor,
    options: &CheckOptions,
    cancel: &CancellationToken,
) -> NodeOutcome {
    let span = tracing::debug_span!("probe", node = %node.id, chain = %node.chain);
    let result = probe(connector, node, options, cancel).instrument(span).await;

    if let Err(failure) = &result {
        debug!(node = %node.id, error = %failure, "node probe failed");
    }

    NodeOutcome { node: node.clone(), result }
}

async fn probe(
    connector: &dyn NodeConnector,
    node: &NodeDescriptor,
    options: &CheckOptions,
    cancel: &CancellationToken,
) -> Result<NodeSnapshot, ProbeFailure> {
    let session = until_cancelled(cancel, connector.connect(&node.address))
        .await
        .map_err(ProbeFailure::Connect)?;

    let network_id = until_cancelled(cancel, session.chain_id())
        .await
        .map_err(|e| ProbeFailure::query("network id", e))?;

    let height = until_cancelled(cancel, session.block_number())
        .await
        .map_err(|e| ProbeFailure::query("height", e))?;

    let block_hashes =
        fetch_block_hashes(session.as_ref(), node, height, options.block_hash_window, cancel)
            .await?;

    let trace_capable = if options.check_trace_capability {
        check_trace(session.as_ref(), node, height, cancel).await?
    } else {
        true
    };

    debug!(
        node = %node.id,
        network_id = %network_id,
        height = height,
        hashes = block_hashes.len(),
        trace_capable = trace_capable,
        "node probed"
    );

    Ok(NodeSnapshot { network_id, height, block_hashes, trace_capable })
}

/// Collects hashes for `height`, `height - 1`, ... down to `window` blocks or genesis.
///
/// Cancellation is the only error that escapes; anything else leaves the height out.
async fn fetch_block_hashes(
    session: &dyn NodeSession,
    node: &NodeDescriptor,
    height: u64,
    window: u64,
    cancel: &CancellationToken,
) -> Result<BTreeMap<u64, BlockHash>, ProbeFailure> {
    let mut hashes = BTreeMap::new();

    for offset in 0..window {
        let Some(target) = height.checked_sub(offset) else {
            break;
        };

        match until_cancelled(cancel, session.block_hash(target)).await {
            Ok(Some(hash)) => {
                hashes.insert(target, hash);
            }
            Ok(None) => {
                warn!(node = %node.id, block = target, "block not found");
            }
            Err(e) if e.is_cancelled() => return Err(ProbeFailure::query("block hashes", e)),
            Err(e) => {
                warn!(node = %node.id, block = target, error = %e, "failed to get block");
            }
        }
    }

    Ok(hashes)
}

async fn check_trace(
    session: &dyn NodeSession,
    node: &NodeDescriptor,
    height: u64,
    cancel: &CancellationToken,
) -> Result<bool, ProbeFailure> {
    match until_cancelled(cancel, session.trace_block(height)).await {
        Ok(()) => Ok(true),
        Err(e) if e.is_cancelled() => Err(ProbeFailure::query("trace capability", e)),
        Err(e) => {
            debug!(
                node = %node.id,
                category = e.rpc_category().map_or("transport", |c| c.as_str()),
                error = %e,
                "debug API check failed"
            );
            Ok(false)
        }
    }
}

/// Races `fut` against the run's cancellation token.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, UpstreamError>>,
) -> Result<T, UpstreamError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(UpstreamError::Cancelled),
        result = fut => result,
    }
}
