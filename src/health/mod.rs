//! Health tracking subsystem.
//!
//! # Data Flow
//! ```text
//! Call outcomes (client.rs):
//!     Transport failure → mark DEAD
//!     Any HTTP response → mark ALIVE
//!     → Update state.rs
//!
//! Active health checks (active.rs, optional):
//!     Periodic timer
//!     → HEAD / on each node
//!     → Update state.rs
//!
//! State (state.rs):
//!     UNKNOWN → ALIVE ←→ DEAD
//!     Newest observation wins
//! ```
//!
//! # Design Decisions
//! - State and timestamp share one atomic word per node
//! - No thresholds: one observation flips the state
//! - Health is per-node and owned by the client instance

pub mod active;
pub mod state;

pub use active::{HealthMonitor, MonitorHandle};
pub use state::{HealthRegistry, HealthState, HostHealth};
