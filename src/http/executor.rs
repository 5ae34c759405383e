//! Request execution against one node.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ClientError, Result};
use crate::hosts::node::Node;
use crate::http::request::{new_request_id, Endpoint, X_OPAQUE_ID};
use crate::http::transport::{HttpRequest, RawResponse, Transport, TransportError};

/// Issues single calls through a [`Transport`].
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    default_headers: HeaderMap,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            default_headers: HeaderMap::new(),
        }
    }

    /// Headers sent with every request. Per-call headers take precedence.
    pub fn with_default_headers(mut self, headers: &HashMap<String, String>) -> Result<Self> {
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::InvalidRequest(format!("invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ClientError::InvalidRequest(format!("invalid value for header '{}': {}", name, e))
            })?;
            self.default_headers.insert(name, value);
        }
        Ok(self)
    }

    /// Send `endpoint` to `node`.
    ///
    /// Returns any HTTP response as-is. Only connectivity failures are errors,
    /// plus `InvalidUrl` when the endpoint cannot be addressed on the node.
    pub async fn execute(&self, node: &Node, endpoint: &Endpoint) -> std::result::Result<RawResponse, TransportError> {
        let url = node
            .url_for(&endpoint.path, &endpoint.params)
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        let mut headers = self.default_headers.clone();
        for (name, value) in endpoint.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        if !headers.contains_key(X_OPAQUE_ID) {
            headers.insert(X_OPAQUE_ID, new_request_id());
        }
        if endpoint.body.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        tracing::debug!(
            node = %node,
            method = %endpoint.method,
            path = %endpoint.path,
            request_id = ?headers.get(X_OPAQUE_ID),
            "Executing request"
        );

        let request = HttpRequest {
            method: endpoint.method.clone(),
            url,
            headers,
            body: endpoint.body.clone(),
        };

        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!(
                    node = %node,
                    status = %response.status,
                    content_type = response.content_type().unwrap_or("-"),
                    bytes = response.body.len(),
                    "Response received"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(node = %node, error = %e, "Transport failure");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::{Method, StatusCode};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, request: HttpRequest) -> std::result::Result<RawResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            Ok(RawResponse::new(StatusCode::NOT_FOUND, b"{}".to_vec()))
        }
    }

    #[tokio::test]
    async fn test_execute_builds_request() {
        let recorder = Arc::new(Recorder::default());
        let mut defaults = HashMap::new();
        defaults.insert("x-tenant".to_string(), "blue".to_string());
        let executor = RequestExecutor::new(recorder.clone())
            .with_default_headers(&defaults)
            .unwrap();

        let node = Node::parse("localhost:9200").unwrap();
        let endpoint = Endpoint::new(Method::PUT, "/twitter/10/_create")
            .param("refresh", "true")
            .body(br#"{"foo":"bar"}"#.to_vec());

        let response = executor.execute(&node, &endpoint).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let seen = recorder.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.url.as_str(), "http://localhost:9200/twitter/10/_create?refresh=true");
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(request.headers.get("x-tenant").unwrap(), "blue");
        assert!(request.headers.contains_key(X_OPAQUE_ID));
    }

    #[tokio::test]
    async fn test_bodyless_request_has_no_content_type() {
        let recorder = Arc::new(Recorder::default());
        let executor = RequestExecutor::new(recorder.clone());
        let node = Node::parse("localhost:9200").unwrap();

        executor.execute(&node, &Endpoint::new(Method::HEAD, "/")).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert!(!seen[0].headers.contains_key(CONTENT_TYPE));
        assert!(seen[0].body.is_none());
    }

    #[tokio::test]
    async fn test_call_headers_override_defaults() {
        let recorder = Arc::new(Recorder::default());
        let mut defaults = HashMap::new();
        defaults.insert("x-tenant".to_string(), "blue".to_string());
        let executor = RequestExecutor::new(recorder.clone())
            .with_default_headers(&defaults)
            .unwrap();
        let node = Node::parse("localhost:9200").unwrap();

        let endpoint = Endpoint::new(Method::POST, "/twitter/_search")
            .header(HeaderName::from_static("x-tenant"), HeaderValue::from_static("green"))
            .header(HeaderName::from_static(X_OPAQUE_ID), HeaderValue::from_static("trace-42"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/x-ndjson"))
            .body(b"{}".to_vec());
        executor.execute(&node, &endpoint).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0].headers.get("x-tenant").unwrap(), "green");
        assert_eq!(seen[0].headers.get(X_OPAQUE_ID).unwrap(), "trace-42");
        assert_eq!(seen[0].headers.get(CONTENT_TYPE).unwrap(), "application/x-ndjson");
        assert_eq!(seen[0].headers.get_all("x-tenant").iter().count(), 1);
    }

    #[test]
    fn test_invalid_default_header_rejected() {
        let mut defaults = HashMap::new();
        defaults.insert("bad header".to_string(), "x".to_string());
        let result = RequestExecutor::new(Arc::new(Recorder::default())).with_default_headers(&defaults);
        assert!(matches!(result, Err(ClientError::InvalidRequest(_))));
    }
}
