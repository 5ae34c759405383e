//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (node, status, request ID as fields)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (CLI), or the host application's own
//!     → whatever metrics recorder the host application installs
//! ```

pub mod logging;
pub mod metrics;
