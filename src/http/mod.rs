//! HTTP execution subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoint (request.rs: method, path, params, body)
//!     → executor.rs (resolve URL on the node, merge headers, request ID)
//!     → transport.rs (send over reqwest, or an injected Transport)
//!     → RawResponse (status, headers, body) | TransportError
//! ```
//!
//! # Design Decisions
//! - Connectivity failures feed host health; HTTP statuses do not
//! - Executor never interprets status codes

pub mod executor;
pub mod request;
pub mod transport;

pub use executor::RequestExecutor;
pub use request::{Endpoint, X_OPAQUE_ID};
pub use transport::{HttpRequest, HttpTransport, RawResponse, Transport, TransportError};
