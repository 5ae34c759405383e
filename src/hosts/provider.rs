//! Host selection.
//!
//! # Responsibilities
//! - Own the health registry for the configured nodes
//! - Select one usable node per request
//! - Record call outcomes against nodes
//!
//! Selection never sleeps or retries; callers decide what to do with
//! `NoReachableHost`.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::health::state::{HealthRegistry, HealthState, HostHealth};
use crate::hosts::node::Node;
use crate::hosts::round_robin::RoundRobin;

/// Picks a node per request and tracks node health.
pub trait HostProvider: Send + Sync + Debug {
    /// Select a node to send the next request to.
    fn select_host(&self) -> Result<Node>;

    /// Record that a call reached the node.
    fn mark_success(&self, node: &Node);

    /// Record a transport failure against the node.
    fn mark_failure(&self, node: &Node);

    /// Every configured node.
    fn nodes(&self) -> &[Node];

    /// Current health of a configured node.
    fn health(&self, node: &Node) -> Option<HostHealth>;
}

/// Provider for a cluster reached through exactly one address.
#[derive(Debug)]
pub struct SingleNodeHostProvider {
    registry: HealthRegistry,
    resurrect_after: Option<Duration>,
}

impl SingleNodeHostProvider {
    pub fn new(node: Node) -> Self {
        Self {
            registry: HealthRegistry::new(vec![node]),
            resurrect_after: None,
        }
    }

    /// Offer the node for selection again once it has been dead this long.
    pub fn with_resurrect_after(mut self, window: Duration) -> Self {
        self.resurrect_after = Some(window);
        self
    }
}

impl HostProvider for SingleNodeHostProvider {
    fn select_host(&self) -> Result<Node> {
        let health = self.registry.health_at(0);
        if usable_state(&health, self.resurrect_after, self.registry.now()) == HealthState::Dead {
            return Err(ClientError::NoReachableHost);
        }
        Ok(self.registry.nodes()[0].clone())
    }

    fn mark_success(&self, node: &Node) {
        self.registry.mark_success(node);
    }

    fn mark_failure(&self, node: &Node) {
        self.registry.mark_failure(node);
    }

    fn nodes(&self) -> &[Node] {
        self.registry.nodes()
    }

    fn health(&self, node: &Node) -> Option<HostHealth> {
        self.registry.health(node)
    }
}

/// Provider for a pool of nodes.
///
/// Prefers nodes known to be alive, falls back to trying nodes in the
/// unknown state and fails with `NoReachableHost` once every node is dead.
#[derive(Debug)]
pub struct MultiNodeHostProvider {
    registry: HealthRegistry,
    alive_rotation: RoundRobin,
    unknown_rotation: RoundRobin,
    resurrect_after: Option<Duration>,
}

impl MultiNodeHostProvider {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            registry: HealthRegistry::new(nodes),
            alive_rotation: RoundRobin::new(),
            unknown_rotation: RoundRobin::new(),
            resurrect_after: None,
        }
    }

    /// Offer dead nodes for selection again once they have been dead this long.
    pub fn with_resurrect_after(mut self, window: Duration) -> Self {
        self.resurrect_after = Some(window);
        self
    }

    fn pick(&self, wanted: HealthState) -> Option<Node> {
        let nodes = self.registry.nodes();
        let now = self.registry.now();
        let rotation = match wanted {
            HealthState::Alive => &self.alive_rotation,
            _ => &self.unknown_rotation,
        };
        rotation
            .next_matching(nodes.len(), |i| {
                usable_state(&self.registry.health_at(i), self.resurrect_after, now) == wanted
            })
            .map(|i| nodes[i].clone())
    }
}

impl HostProvider for MultiNodeHostProvider {
    fn select_host(&self) -> Result<Node> {
        if let Some(node) = self.pick(HealthState::Alive) {
            return Ok(node);
        }
        if let Some(node) = self.pick(HealthState::Unknown) {
            tracing::debug!(node = %node, "No alive node known, trying unknown node");
            return Ok(node);
        }

        tracing::debug!(node_count = self.registry.nodes().len(), "All nodes marked dead");
        for (i, node) in self.registry.nodes().iter().enumerate() {
            tracing::trace!(node = %node, health = ?self.registry.health_at(i), "Node status");
        }
        Err(ClientError::NoReachableHost)
    }

    fn mark_success(&self, node: &Node) {
        self.registry.mark_success(node);
    }

    fn mark_failure(&self, node: &Node) {
        self.registry.mark_failure(node);
    }

    fn nodes(&self) -> &[Node] {
        self.registry.nodes()
    }

    fn health(&self, node: &Node) -> Option<HostHealth> {
        self.registry.health(node)
    }
}

/// The state selection should act on: a dead node past its resurrection
/// window counts as unknown.
fn usable_state(health: &HostHealth, resurrect_after: Option<Duration>, now: Duration) -> HealthState {
    match (health.state, resurrect_after, health.last_checked) {
        (HealthState::Dead, Some(window), Some(checked)) if now.saturating_sub(checked) >= window => {
            HealthState::Unknown
        }
        (state, _, _) => state,
    }
}

/// Build the provider matching the pool size.
pub fn build_host_provider(
    mut nodes: Vec<Node>,
    resurrect_after: Option<Duration>,
) -> Result<Arc<dyn HostProvider>> {
    match nodes.len() {
        0 => Err(ClientError::InvalidRequest("at least one node is required".into())),
        1 => {
            let mut provider = SingleNodeHostProvider::new(nodes.remove(0));
            if let Some(window) = resurrect_after {
                provider = provider.with_resurrect_after(window);
            }
            Ok(Arc::new(provider))
        }
        _ => {
            let mut provider = MultiNodeHostProvider::new(nodes);
            if let Some(window) = resurrect_after {
                provider = provider.with_resurrect_after(window);
            }
            Ok(Arc::new(provider))
        }
    }
}
