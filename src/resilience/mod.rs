//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call fails with Unreachable / NoReachableHost:
//!     → retries.rs (attempt budget, idempotency, error kind)
//!     → backoff.rs (pause before re-selecting, doubled per failure)
//!     → host re-selection for the next attempt
//! ```
//!
//! # Design Decisions
//! - Timeouts belong to the transport
//! - Retries are a policy layered on the client, off by default

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
