//! Outgoing request description.
//!
//! # Responsibilities
//! - Describe one engine call independently of the node it goes to
//! - Generate a unique opaque ID per request for server-side tracing

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

/// Header the engine echoes into its slow logs and task listings.
pub const X_OPAQUE_ID: &str = "x-opaque-id";

/// Method, path, query parameters and body of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    /// Absolute path starting with `/`.
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: HeaderMap,
    /// JSON body, if any.
    pub body: Option<Vec<u8>>,
}

impl Endpoint {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Add a query parameter.
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter when a value is present.
    pub fn param_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Add a per-call header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a JSON body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether repeating the call cannot create a second effect.
    pub fn is_idempotent(&self) -> bool {
        self.method != Method::POST || self.path == "/_mget" || self.path.ends_with("/_search")
    }
}

/// A fresh request ID.
pub fn new_request_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let endpoint = Endpoint::new(Method::GET, "/twitter/_all/1")
            .param("routing", "kimchy")
            .param_opt::<String>("preference", None)
            .param_opt("realtime", Some(false));

        assert_eq!(endpoint.path, "/twitter/_all/1");
        assert_eq!(
            endpoint.params,
            vec![
                ("routing".to_string(), "kimchy".to_string()),
                ("realtime".to_string(), "false".to_string())
            ]
        );
        assert!(endpoint.body.is_none());
    }

    #[test]
    fn test_idempotency() {
        assert!(Endpoint::new(Method::PUT, "/twitter/1").is_idempotent());
        assert!(Endpoint::new(Method::POST, "/_mget").is_idempotent());
        assert!(Endpoint::new(Method::POST, "/twitter/_search").is_idempotent());
        assert!(!Endpoint::new(Method::POST, "/twitter").is_idempotent());
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(new_request_id(), new_request_id());
    }
}
