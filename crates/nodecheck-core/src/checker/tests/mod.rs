//! Tests for the checker module.
//!
//! - `engine_tests`: end-to-end runs of [`Checker`](super::Checker) over in-memory nodes
//! - Unit tests for probing, validation and reconciliation live in their own modules
//!
//! The in-memory [`FakeConnector`] below stands in for the HTTP transport.


use alloy_primitives::U256;
use async_trait::async_trait;
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use crate::{
    types::BlockHash,
    upstream::{NodeConnector, NodeSession, UpstreamError},
};

/// Deterministic hash for a block height.
pub(crate) fn hash(n: u64) -> BlockHash {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    BlockHash::new(bytes)
}

/// Hash of a block on a competing fork.
pub(crate) fn fork_hash(n: u64) -> BlockHash {
    let mut bytes = hash(n).0;
    bytes[0] = 0xff;
    BlockHash::new(bytes)
}

/// Scripted behaviour of one node.
#[derive(Debug, Clone)]
pub(crate) struct FakeNode {
    pub reachable: bool,
    pub chain_id: Option<U256>,
    pub height: Option<u64>,
    pub hashes: BTreeMap<u64, BlockHash>,
    pub failing_blocks: HashSet<u64>,
    pub trace_ok: bool,
    pub hang_on_height: bool,
    pub panic_on_chain_id: bool,
}

impl FakeNode {
    /// A healthy node at `height` knowing the last 32 canonical block hashes.
    pub fn at_height(chain_id: u64, height: u64) -> Self {
        let hashes = (height.saturating_sub(31)..=height).map(|n| (n, hash(n))).collect();
        Self {
            reachable: true,
            chain_id: Some(U256::from(chain_id)),
            height: Some(height),
            hashes,
            failing_blocks: HashSet::new(),
            trace_ok: true,
            hang_on_height: false,
            panic_on_chain_id: false,
        }
    }

    pub fn unreachable() -> Self {
        Self { reachable: false, ..Self::at_height(0, 0) }
    }

    /// Replaces the hash this node reports for `height`.
    pub fn with_hash(mut self, height: u64, hash: BlockHash) -> Self {
        self.hashes.insert(height, hash);
        self
    }
}

#[derive(Default)]
struct Stats {
    open_sessions: AtomicUsize,
    calls: Mutex<HashMap<String, usize>>,
    trace_calls: Mutex<HashMap<String, usize>>,
}

impl Stats {
    fn bump(map: &Mutex<HashMap<String, usize>>, address: &str) {
        *map.lock().unwrap().entry(address.to_string()).or_default() += 1;
    }

    fn get(map: &Mutex<HashMap<String, usize>>, address: &str) -> usize {
        map.lock().unwrap().get(address).copied().unwrap_or_default()
    }
}

/// In-memory [`NodeConnector`] keyed by address.
#[derive(Default)]
pub(crate) struct FakeConnector {
    nodes: HashMap<String, Arc<FakeNode>>,
    stats: Arc<Stats>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, address: &str, node: FakeNode) -> Self {
        self.nodes.insert(address.to_string(), Arc::new(node));
        self
    }

    pub fn open_sessions(&self) -> usize {
        self.stats.open_sessions.load(Ordering::SeqCst)
    }

    pub fn calls(&self, address: &str) -> usize {
        Stats::get(&self.stats.calls, address)
    }

    pub fn trace_calls(&self, address: &str) -> usize {
        Stats::get(&self.stats.trace_calls, address)
    }
}

#[async_trait]
impl NodeConnector for FakeConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn NodeSession>, UpstreamError> {
        let node = self
            .nodes
            .get(address)
            .filter(|node| node.reachable)
            .ok_or_else(|| UpstreamError::ConnectionFailed("connection refused or unreachable".into()))?;

        self.stats.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            node: Arc::clone(node),
            address: address.to_string(),
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct FakeSession {
    node: Arc<FakeNode>,
    address: String,
    stats: Arc<Stats>,
}

#[async_trait]
impl NodeSession for FakeSession {
    async fn chain_id(&self) -> Result<U256, UpstreamError> {
        Stats::bump(&self.stats.calls, &self.address);
        assert!(!self.node.panic_on_chain_id, "node crashed");
        self.node.chain_id.ok_or_else(|| UpstreamError::RpcError(-32603, "internal error".into()))
    }

    async fn block_number(&self) -> Result<u64, UpstreamError> {
        Stats::bump(&self.stats.calls, &self.address);
        if self.node.hang_on_height {
            std::future::pending::<()>().await;
        }
        self.node.height.ok_or(UpstreamError::Timeout)
    }

    async fn block_hash(&self, number: u64) -> Result<Option<BlockHash>, UpstreamError> {
        Stats::bump(&self.stats.calls, &self.address);
        if self.node.failing_blocks.contains(&number) {
            return Err(UpstreamError::HttpError(502, "bad gateway".into()));
        }
        Ok(self.node.hashes.get(&number).copied())
    }

    async fn trace_block(&self, _number: u64) -> Result<(), UpstreamError> {
        Stats::bump(&self.stats.calls, &self.address);
        Stats::bump(&self.stats.trace_calls, &self.address);
        if self.node.trace_ok {
            Ok(())
        } else {
            Err(UpstreamError::RpcError(
                -32601,
                "the method debug_traceBlockByNumber does not exist/is not available".into(),
            ))
        }
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.stats.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}
