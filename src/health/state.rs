//! Host health registry.
//!
//! # States
//! - Unknown: never contacted, or offered again for selection
//! - Alive: the last call against the node reached it
//! - Dead: the last call against the node failed at the transport level
//!
//! # State Transitions
//! ```text
//! Unknown/Dead → Alive: mark_success
//! Unknown/Alive → Dead: mark_failure
//! ```
//!
//! Status and last-checked timestamp live in one `AtomicU64` per node, so an
//! update replaces both at once and no lock spans the registry. An
//! observation older than the stored timestamp is discarded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::hosts::node::Node;
use crate::observability::metrics;

/// Health State enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Alive = 1,
    Dead = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Alive,
            2 => HealthState::Dead,
            _ => HealthState::Unknown,
        }
    }
}

const STATE_SHIFT: u32 = 56;
const TIMESTAMP_MASK: u64 = (1 << STATE_SHIFT) - 1;

fn pack(state: HealthState, timestamp_ms: u64) -> u64 {
    ((state as u64) << STATE_SHIFT) | (timestamp_ms & TIMESTAMP_MASK)
}

fn unpack(word: u64) -> (HealthState, u64) {
    (HealthState::from((word >> STATE_SHIFT) as u8), word & TIMESTAMP_MASK)
}

/// Point-in-time view of one node's health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostHealth {
    pub state: HealthState,
    /// Time since the registry was created at which the state was recorded.
    /// `None` if the node was never checked.
    pub last_checked: Option<Duration>,
}

/// Per-node health cell.
#[derive(Debug)]
struct NodeHealth {
    word: AtomicU64,
}

impl NodeHealth {
    fn new() -> Self {
        Self {
            word: AtomicU64::new(pack(HealthState::Unknown, 0)),
        }
    }

    fn load(&self) -> (HealthState, u64) {
        unpack(self.word.load(Ordering::Acquire))
    }

    /// Store `state` observed at `timestamp_ms` unless a newer observation won.
    /// Returns the previous state when the write was applied.
    fn record(&self, state: HealthState, timestamp_ms: u64) -> Option<HealthState> {
        self.word
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let (_, stored_ms) = unpack(current);
                if stored_ms > timestamp_ms {
                    None
                } else {
                    Some(pack(state, timestamp_ms))
                }
            })
            .ok()
            .map(|previous| unpack(previous).0)
    }
}

/// Tracks reachability of every configured node.
#[derive(Debug)]
pub struct HealthRegistry {
    nodes: Vec<Node>,
    cells: Vec<NodeHealth>,
    index: HashMap<Node, usize>,
    epoch: Instant,
}

impl HealthRegistry {
    /// Create a registry with every node in the Unknown state.
    pub fn new(nodes: Vec<Node>) -> Self {
        let mut unique = Vec::with_capacity(nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if index.contains_key(&node) {
                tracing::warn!(node = %node, "Ignoring duplicate node address");
                continue;
            }
            index.insert(node.clone(), unique.len());
            unique.push(node);
        }
        let cells = unique.iter().map(|_| NodeHealth::new()).collect();

        Self {
            nodes: unique,
            cells,
            index,
            epoch: Instant::now(),
        }
    }

    /// All registered nodes, in configuration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Whether the node belongs to this registry.
    pub fn contains(&self, node: &Node) -> bool {
        self.index.contains_key(node)
    }

    /// Current health of a node, or `None` if it is not registered.
    pub fn health(&self, node: &Node) -> Option<HostHealth> {
        self.index.get(node).map(|&i| self.health_at(i))
    }

    pub(crate) fn health_at(&self, i: usize) -> HostHealth {
        let (state, ts) = self.cells[i].load();
        let last_checked = if state == HealthState::Unknown && ts == 0 {
            None
        } else {
            Some(Duration::from_millis(ts))
        };
        HostHealth { state, last_checked }
    }

    /// Time elapsed since the registry was created.
    pub(crate) fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Record a successful call against the node.
    pub fn mark_success(&self, node: &Node) {
        self.record(node, HealthState::Alive);
    }

    /// Record a transport failure against the node.
    pub fn mark_failure(&self, node: &Node) {
        self.record(node, HealthState::Dead);
    }

    fn record(&self, node: &Node, state: HealthState) {
        let Some(&i) = self.index.get(node) else {
            tracing::debug!(node = %node, ?state, "Health update for unregistered node ignored");
            return;
        };

        // Keep timestamps non-zero so "never checked" stays distinguishable.
        let now_ms = (self.now().as_millis() as u64).max(1);

        match self.cells[i].record(state, now_ms) {
            Some(previous) if previous != state => {
                match state {
                    HealthState::Dead => {
                        tracing::warn!(node = %node, ?previous, "Node marked dead")
                    }
                    _ => tracing::info!(node = %node, ?previous, ?state, "Node health changed"),
                }
                metrics::record_node_health(node.base_url(), state == HealthState::Alive);
            }
            Some(_) => {}
            None => {
                tracing::trace!(node = %node, ?state, "Stale health observation discarded");
            }
        }
    }
}
