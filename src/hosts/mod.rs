//! Host selection subsystem.
//!
//! # Data Flow
//! ```text
//! Client call
//!     → provider.rs (pinned node, or select from pool)
//!         - round_robin.rs (rotate through alive nodes, then unknown ones)
//!         - health/state.rs (per-node ALIVE / DEAD / UNKNOWN)
//!     → node.rs (base URL for the executor)
//!     → Outcome reported back: mark_success / mark_failure
//! ```
//!
//! # Design Decisions
//! - The provider owns the registry; no process-wide state
//! - Dead nodes are excluded from selection until they succeed again
//!   (or their resurrection window expires)
//! - Selection tolerates races; health is best-effort information

pub mod node;
pub mod provider;
pub mod round_robin;

pub use node::Node;
pub use provider::{build_host_provider, HostProvider, MultiNodeHostProvider, SingleNodeHostProvider};
