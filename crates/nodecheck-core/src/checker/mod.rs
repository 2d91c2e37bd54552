//! # Node Consistency Checking
//!
//! A run probes every configured node, then judges each chain on its own.
//!
//! ## Algorithm Steps
//!
//! 1. **Probe**: Per node, fetch network id, height, recent block hashes and
//!    trace capability. Nodes of a chain are probed concurrently.
//! 2. **Baseline**: The first successful node fixes the expected network id;
//!    the highest successful node fixes the tip.
//! 3. **Rules**: Each node gets at most one rule failure (probe error, wrong
//!    network, too far behind, no trace capability).
//! 4. **Reconcile**: Block hashes are grouped per height and every node that
//!    disagrees with the majority is flagged.
//! 5. **Aggregate**: The run passes only if every chain passed.
//!
//! # Module Organization
//!
//! - [`config`]: Check options (`CheckOptions`)
//! - [`types`]: Outcome and failure types
//! - [`probe`]: Per-node probing
//! - [`validator`]: Baselines and rule classification
//! - [`reconcile`]: Majority vote over block hashes
//! - [`report`]: Cross-chain aggregation
//! - [`engine`]: Orchestration (`Checker` - main entry point)

pub mod config;
pub mod engine;
pub mod probe;
pub mod reconcile;
pub mod report;
pub mod types;
pub mod validator;

#[cfg(test)]
mod tests;

pub use config::CheckOptions;
pub use engine::Checker;
pub use probe::probe_node;
pub use reconcile::{find_majority, group_hashes_by_height, reconcile_hashes, HashGroup};
pub use report::aggregate;
pub use types::{
    ChainOutcome, CheckError, CheckReport, FailureReason, FailureRecord, NodeOutcome, NodeSnapshot,
    ProbeFailure,
};
pub use validator::{classify, evaluate_chain, ChainBaseline};
