//! # Nodecheck Core
//!
//! Consistency checks across groups of EVM JSON-RPC nodes that serve the same
//! logical chain.
//!
//! This crate provides:
//!
//! - **[`upstream`]**: HTTP JSON-RPC transport and the [`NodeConnector`] /
//!   [`NodeSession`] seam used to talk to a node.
//!
//! - **[`checker`]**: Probing, rule validation, block hash reconciliation and
//!   report aggregation, orchestrated by [`Checker`].
//!
//! - **[`config`]**: YAML configuration with environment overrides.
//!
//! ## Check Flow
//!
//! ```text
//! AppConfig ──► nodes_by_chain()
//!                    │
//!                    ▼
//!            ┌───────────────┐
//!            │    Checker    │  one task per chain
//!            └───────┬───────┘
//!                    │ join_all
//!        ┌───────────┼───────────┐
//!        ▼           ▼           ▼
//!     probe_node  probe_node  probe_node    eth_chainId, eth_blockNumber,
//!        │           │           │          eth_getBlockByNumber, debug_trace*
//!        └───────────┼───────────┘
//!                    ▼
//!            evaluate_chain ──► reconcile_hashes
//!                    │
//!                    ▼
//!               aggregate ──► CheckReport
//! ```

pub mod checker;
pub mod config;
pub mod types;
pub mod upstream;
pub mod utils;

pub use checker::{CheckError, CheckOptions, CheckReport, Checker};
pub use upstream::{NodeConnector, NodeSession};
