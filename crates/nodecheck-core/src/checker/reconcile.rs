//! Majority-vote reconciliation of block hashes.
//!
//! Every successful node contributes the hashes it reported for its recent
//! window. Hashes are grouped per height and the largest group wins; any node
//! that reported a different hash at that height gets a mismatch record.
//!
//! # Tie-breaking
//!
//! Groups are created in configuration order and a later group only replaces
//! the current majority with a strictly larger vote count. On a tie the hash
//! reported by the earliest node wins.

use std::collections::BTreeMap;

use super::types::{FailureReason, FailureRecord, NodeOutcome};
use crate::types::BlockHash;

/// Nodes that agree on one hash at one height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashGroup {
    pub hash: BlockHash,
    /// Indexes into the chain's node list, ascending.
    pub voters: Vec<usize>,
}

/// Groups reported hashes by height, skipping nodes whose probe failed.
///
/// Groups within a height appear in the order their hash was first seen.
#[must_use]
pub fn group_hashes_by_height(nodes: &[NodeOutcome]) -> BTreeMap<u64, Vec<HashGroup>> {
    let mut by_height: BTreeMap<u64, Vec<HashGroup>> = BTreeMap::new();

    for (index, node) in nodes.iter().enumerate() {
        let Some(snapshot) = node.snapshot() else {
            continue;
        };
        for (&height, &hash) in &snapshot.block_hashes {
            let groups = by_height.entry(height).or_default();
            match groups.iter_mut().find(|g| g.hash == hash) {
                Some(group) => group.voters.push(index),
                None => groups.push(HashGroup { hash, voters: vec![index] }),
            }
        }
    }

    by_height
}

/// Picks the group with the most voters; the first-seen group wins ties.
#[must_use]
pub fn find_majority(groups: &[HashGroup]) -> Option<&HashGroup> {
    groups.iter().fold(None, |best: Option<&HashGroup>, group| match best {
        Some(current) if current.voters.len() >= group.voters.len() => Some(current),
        _ => Some(group),
    })
}

/// Returns one mismatch record per (height, dissenting node), ordered by
/// ascending height and then configuration order.
#[must_use]
pub fn reconcile_hashes(nodes: &[NodeOutcome]) -> Vec<FailureRecord> {
    let mut records = Vec::new();

    for (height, groups) in group_hashes_by_height(nodes) {
        if groups.len() < 2 {
            continue;
        }
        let Some(majority) = find_majority(&groups) else {
            continue;
        };

        let mut dissenters: Vec<(usize, BlockHash)> = groups
            .iter()
            .filter(|g| g.hash != majority.hash)
            .flat_map(|g| g.voters.iter().map(move |&i| (i, g.hash)))
            .collect();
        dissenters.sort_unstable_by_key(|&(index, _)| index);

        records.extend(dissenters.into_iter().map(|(index, hash)| {
            FailureRecord::new(
                &nodes[index].node,
                FailureReason::HashMismatch { height, hash, majority: majority.hash },
            )
        }));
    }

    records
}
