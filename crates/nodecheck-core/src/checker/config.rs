//! Check configuration types and defaults.

use serde::{Deserialize, Serialize};

/// Options controlling which consistency rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Maximum number of blocks a node may trail the chain's highest node (default: 10).
    /// A node exactly `max_block_gap` blocks behind still passes.
    #[serde(default = "default_max_block_gap")]
    pub max_block_gap: u64,

    /// Number of most recent blocks whose hashes are compared across nodes (default: 5).
    /// Zero disables hash reconciliation.
    #[serde(default = "default_block_hash_window")]
    pub block_hash_window: u64,

    /// Whether nodes must answer `debug_traceBlockByNumber` (default: true).
    #[serde(default = "default_check_trace_capability")]
    pub check_trace_capability: bool,
}

fn default_max_block_gap() -> u64 {
    10
}

fn default_block_hash_window() -> u64 {
    5
}

fn default_check_trace_capability() -> bool {
    true
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            max_block_gap: default_max_block_gap(),
            block_hash_window: default_block_hash_window(),
            check_trace_capability: default_check_trace_capability(),
        }
    }
}
