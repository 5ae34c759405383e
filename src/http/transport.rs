//! HTTP transport abstraction.
//!
//! # Responsibilities
//! - Send one fully addressed request and hand back status, headers and body
//! - Report connectivity failures as `TransportError`
//!
//! # Design Decisions
//! - Any HTTP status, including 4xx/5xx, is a valid response
//! - Timeouts belong to the transport, not to the layers above
//! - Dropping the `send` future abandons the in-flight call

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::{Credentials, TimeoutConfig};

/// A request addressed to one node.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Status, headers and body of one response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// The `Content-Type` header, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Connectivity failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established (refused, DNS, TLS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The transport deadline passed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// The connection broke while sending or receiving.
    #[error("I/O error: {0}")]
    Io(String),

    /// The endpoint could not be addressed on the node; nothing was sent.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Sends requests to nodes.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport with pooled connections.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    /// Build a transport with the given timeouts and optional basic auth.
    pub fn new(timeouts: &TimeoutConfig, credentials: Option<Credentials>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(Self { client, credentials })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Io(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(creds) = &self.credentials {
            builder = builder.basic_auth(&creds.username, Some(&creds.password));
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
