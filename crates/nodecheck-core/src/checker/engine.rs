//! Check orchestration.
//!
//! [`Checker`] fans out one probe per node, validates each chain once all of
//! its probes have finished, and folds the chains into a [`CheckReport`].

use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

use super::{
    config::CheckOptions,
    probe::probe_node,
    report,
    types::{ChainOutcome, CheckError, CheckReport, NodeOutcome, ProbeFailure},
    validator,
};
use crate::{
    types::{NodeDescriptor, NodesByChain},
    upstream::{HttpClient, HttpClientConfig, HttpConnector, NodeConnector, UpstreamError},
};

/// Runs consistency checks against groups of nodes.
pub struct Checker {
    connector: Arc<dyn NodeConnector>,
    options: CheckOptions,
}

impl Checker {
    #[must_use]
    pub fn new(connector: Arc<dyn NodeConnector>, options: CheckOptions) -> Self {
        Self { connector, options }
    }

    /// Creates a checker that talks to nodes over HTTP JSON-RPC.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_http(
        options: CheckOptions,
        http_config: &HttpClientConfig,
    ) -> Result<Self, UpstreamError> {
        let client = Arc::new(HttpClient::with_config(http_config)?);
        Ok(Self::new(Arc::new(HttpConnector::new(client)), options))
    }

    #[must_use]
    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Probes every node of one chain and evaluates the chain.
    ///
    /// Each node is probed on its own spawned task, so a probe that panics only
    /// fails its own node. Outcomes keep the order of `nodes` regardless of
    /// completion order.
    pub async fn check_chain(
        &self,
        chain: &str,
        nodes: &[NodeDescriptor],
        cancel: &CancellationToken,
    ) -> ChainOutcome {
        let span = tracing::info_span!("chain", chain = %chain, nodes = nodes.len());

        async {
            let handles: Vec<_> = nodes
                .iter()
                .map(|node| {
                    let connector = Arc::clone(&self.connector);
                    let node = node.clone();
                    let options = self.options;
                    let cancel = cancel.clone();
                    let probe = async move {
                        probe_node(connector.as_ref(), &node, &options, &cancel).await
                    };
                    tokio::spawn(probe.in_current_span())
                })
                .collect();

            let outcomes = join_all(handles)
                .await
                .into_iter()
                .zip(nodes)
                .map(|(joined, node)| joined.unwrap_or_else(|e| aborted_outcome(node, &e)))
                .collect();

            let outcome = validator::evaluate_chain(chain, outcomes, &self.options);

            if outcome.passed {
                debug!(max_height = outcome.max_height, "chain passed");
            } else {
                warn!(
                    max_height = outcome.max_height,
                    failures = outcome.failed_nodes.len(),
                    "chain failed"
                );
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Checks every chain and aggregates the verdict.
    ///
    /// Chains run concurrently and appear in the report in the map's key order.
    /// Cancelling `cancel` makes every outstanding call fail, so the run still
    /// returns a complete report in which unfinished nodes are marked failed.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NoChains`] for an empty map and
    /// [`CheckError::EmptyChain`] if any chain has no nodes.
    pub async fn check(
        &self,
        chains: &NodesByChain,
        cancel: &CancellationToken,
    ) -> Result<CheckReport, CheckError> {
        if chains.is_empty() {
            return Err(CheckError::NoChains);
        }
        if let Some((chain, _)) = chains.iter().find(|(_, nodes)| nodes.is_empty()) {
            return Err(CheckError::EmptyChain(chain.clone()));
        }

        let total_nodes: usize = chains.values().map(Vec::len).sum();
        info!(chains = chains.len(), nodes = total_nodes, "starting node check");

        let outcomes =
            join_all(chains.iter().map(|(chain, nodes)| self.check_chain(chain, nodes, cancel)))
                .await;
        let report = report::aggregate(outcomes);

        info!(
            passed = report.passed,
            failures = report.all_failures.len(),
            cancelled = cancel.is_cancelled(),
            "node check finished"
        );

        Ok(report)
    }
}

fn aborted_outcome(node: &NodeDescriptor, err: &JoinError) -> NodeOutcome {
    error!(node = %node.id, error = %err, "probe task aborted");
    NodeOutcome { node: node.clone(), result: Err(ProbeFailure::Aborted(err.to_string())) }
}
