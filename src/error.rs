//! Client error taxonomy.
//!
//! Every public operation either completes or fails exactly once with one of
//! these kinds. Documents that do not exist, empty searches and empty
//! multi-get responses are values, never errors.

use thiserror::Error;

/// Errors surfaced to callers of [`crate::SearchClient`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The selected node could not be reached (connect refused, DNS, timeout).
    #[error("node {node} unreachable: {reason}")]
    Unreachable { node: String, reason: String },

    /// Every configured node is currently marked dead.
    #[error("no reachable host available")]
    NoReachableHost,

    /// The node answered with a non-success status.
    #[error("request failed with status {status}{}", reason.as_ref().map(|r| format!(": {}", r)).unwrap_or_default())]
    Protocol { status: u16, reason: Option<String> },

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be encoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Whether the failure is a connectivity problem rather than a protocol outcome.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Unreachable { .. } | ClientError::NoReachableHost)
    }

    /// Short label used in metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Unreachable { .. } => "unreachable",
            ClientError::NoReachableHost => "no_reachable_host",
            ClientError::Protocol { .. } => "protocol",
            ClientError::Decode(_) => "decode",
            ClientError::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
