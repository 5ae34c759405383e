//! Wire protocol.
//!
//! # Data Flow
//! ```text
//! Typed request (requests.rs)
//!     → Endpoint: verb, path, params, JSON body
//!     → RequestExecutor
//!     → RawResponse
//!     → translator.rs: status + body → typed result (responses.rs)
//! ```
//!
//! # Design Decisions
//! - Request building and response translation are pure functions
//! - Not-found documents are values, not errors
//! - Error bodies are mined for a reason string, never trusted for shape

pub(crate) mod json;
pub mod requests;
pub mod responses;
pub mod translator;

pub use requests::{
    GetRequest, IndexRequest, MultiGetItem, MultiGetRequest, RefreshPolicy, SearchRequest, ALL_TYPES,
};
pub use responses::{ClusterInfo, GetResult, IndexResponse, ResultCode, SearchHit, Source, VersionInfo};
