//! Shared JSON decoding helpers.

use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::http::transport::RawResponse;
use crate::protocol::responses::{ErrorBody, ErrorDetail};

/// Decode a response body, naming the operation in the error.
pub(crate) fn decode<T: DeserializeOwned>(operation: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(format!("{} response: {}", operation, e)))
}

/// Best-effort extraction of the server's error reason.
pub(crate) fn error_reason(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(ErrorDetail::Text(text)) }) => Some(text),
        Ok(ErrorBody {
            error: Some(ErrorDetail::Structured { kind, reason }),
        }) => match (kind, reason) {
            (Some(kind), Some(reason)) => Some(format!("{}: {}", kind, reason)),
            (None, Some(reason)) => Some(reason),
            (Some(kind), None) => Some(kind),
            (None, None) => None,
        },
        _ => None,
    }
}

/// Protocol error for a non-success response.
pub(crate) fn protocol_error(response: &RawResponse) -> ClientError {
    ClientError::Protocol {
        status: response.status.as_u16(),
        reason: error_reason(&response.body),
    }
}
