//! Cross-chain aggregation.

use super::types::{ChainOutcome, CheckReport};

/// Folds chain outcomes into the final report, keeping chain order.
///
/// The run passes only if every chain passed; an empty input passes vacuously.
#[must_use]
pub fn aggregate(chains: Vec<ChainOutcome>) -> CheckReport {
    let all_failures = chains.iter().flat_map(|c| c.failed_nodes.iter().cloned()).collect();
    let passed = chains.iter().all(|c| c.passed);
    CheckReport { chains, all_failures, passed }
}

impl CheckReport {
    #[must_use]
    pub fn chain(&self, name: &str) -> Option<&ChainOutcome> {
        self.chains.iter().find(|c| c.chain == name)
    }

    #[must_use]
    pub fn failed_chains(&self) -> Vec<&str> {
        self.chains.iter().filter(|c| !c.passed).map(|c| c.chain.as_str()).collect()
    }
}
