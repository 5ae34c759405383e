//! Client façade.
//!
//! # Data Flow
//! ```text
//! Typed request
//!     → endpoint (protocol::requests)
//!     → node from HostProvider, or the pinned node
//!     → RequestExecutor
//!         transport failure → mark DEAD → Unreachable (retry if policy allows)
//!         any response      → mark ALIVE → translator
//!     → typed result(s)
//! ```
//!
//! # Design Decisions
//! - Single-value calls are `async fn`; multi-document calls are lazy streams
//! - Nothing is sent until the future or stream is polled
//! - Dropping a call abandons it before any health update
//! - Pinned calls never fail over

use futures_util::future;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{validate_config, ClientConfig, ConfigError, HealthCheckConfig};
use crate::error::{ClientError, Result};
use crate::health::active::{HealthMonitor, MonitorHandle};
use crate::hosts::{build_host_provider, HostProvider, Node};
use crate::http::executor::RequestExecutor;
use crate::http::request::Endpoint;
use crate::http::transport::{HttpTransport, RawResponse, Transport, TransportError};
use crate::observability::metrics;
use crate::protocol::requests::{info_endpoint, ping_endpoint, GetRequest, IndexRequest, MultiGetRequest, SearchRequest};
use crate::protocol::responses::{ClusterInfo, GetResult, IndexResponse, SearchHit};
use crate::protocol::translator;
use crate::resilience::RetryPolicy;

/// Non-blocking client for a search cluster.
///
/// Cheap to clone; clones share host health.
#[derive(Debug, Clone)]
pub struct SearchClient {
    hosts: Arc<dyn HostProvider>,
    executor: RequestExecutor,
    retry: RetryPolicy,
    pinned: Option<Node>,
}

impl SearchClient {
    pub fn new(hosts: Arc<dyn HostProvider>, transport: Arc<dyn Transport>) -> Self {
        Self {
            hosts,
            executor: RequestExecutor::new(transport),
            retry: RetryPolicy::default(),
            pinned: None,
        }
    }

    /// Build a client with the default `reqwest` transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        validate_config(config)
            .map_err(|errors| ClientError::InvalidRequest(ConfigError::Validation(errors).to_string()))?;

        let nodes = config
            .nodes
            .iter()
            .map(String::as_str)
            .map(Node::parse)
            .collect::<Result<Vec<_>>>()?;
        let resurrect_after = config.health_check.resurrect_after_secs.map(Duration::from_secs);
        let hosts = build_host_provider(nodes, resurrect_after)?;

        let transport = HttpTransport::new(&config.timeouts, config.credentials.clone())
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        tracing::info!(
            nodes = hosts.nodes().len(),
            retries = config.retries.enabled,
            authenticated = config.credentials.is_some(),
            "Search client configured"
        );

        Self::new(hosts, Arc::new(transport))
            .with_default_headers(&config.default_headers)
            .map(|client| client.with_retry_policy(RetryPolicy::from_config(&config.retries)))
    }

    /// Headers sent with every request.
    pub fn with_default_headers(mut self, headers: &HashMap<String, String>) -> Result<Self> {
        self.executor = self.executor.with_default_headers(headers)?;
        Ok(self)
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// A view of this client that sends every call to `node`.
    ///
    /// Outcomes still update health when `node` belongs to the pool.
    pub fn with_host(&self, node: Node) -> Self {
        Self {
            pinned: Some(node),
            ..self.clone()
        }
    }

    pub fn host_provider(&self) -> &Arc<dyn HostProvider> {
        &self.hosts
    }

    /// Start checking every node in the background, if enabled.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_health_monitor(&self, config: &HealthCheckConfig) -> Option<MonitorHandle> {
        if !config.enabled {
            tracing::info!("Active health checks disabled");
            return None;
        }
        let monitor = HealthMonitor::new(
            self.hosts.clone(),
            self.executor.clone(),
            Duration::from_secs(config.interval_secs.max(1)),
        );
        Some(monitor.spawn())
    }

    /// `true` when a node answers `HEAD /` with 2xx. Never fails.
    pub async fn ping(&self) -> bool {
        let start = Instant::now();
        let outcome = self.execute(&ping_endpoint()).await;
        let alive = translator::translate_ping(&outcome);
        metrics::record_request("ping", if alive { "success" } else { "unavailable" }, start);
        alive
    }

    /// Cluster name and version.
    pub async fn info(&self) -> Result<ClusterInfo> {
        let start = Instant::now();
        let outcome: Result<ClusterInfo> = async {
            let response = self.execute(&info_endpoint()).await?;
            translator::translate_info(&response)
        }
        .await;
        record("info", &outcome, start);
        outcome
    }

    /// Fetch one document. A missing document is `Ok` with `exists == false`.
    pub async fn get(&self, request: GetRequest) -> Result<GetResult> {
        let start = Instant::now();
        let outcome: Result<GetResult> = async {
            let response = self.execute(&request.endpoint()?).await?;
            translator::translate_get(&response, &request)
        }
        .await;
        record("get", &outcome, start);
        outcome
    }

    /// Fetch several documents in one round trip.
    ///
    /// Entries the server failed to load are left out; documents that do
    /// not exist are yielded with `exists == false`.
    pub fn multi_get(&self, request: MultiGetRequest) -> BoxStream<'static, Result<GetResult>> {
        let client = self.clone();
        flatten(async move {
            let start = Instant::now();
            let outcome: Result<Vec<GetResult>> = async {
                let response = client.execute(&request.endpoint()?).await?;
                translator::translate_multi_get(&response)
            }
            .await;
            record("multi_get", &outcome, start);
            outcome
        })
    }

    /// Run a search; hits are yielded in server order.
    pub fn search(&self, request: SearchRequest) -> BoxStream<'static, Result<SearchHit>> {
        let client = self.clone();
        flatten(async move {
            let start = Instant::now();
            let outcome: Result<Vec<SearchHit>> = async {
                let response = client.execute(&request.endpoint()?).await?;
                translator::translate_search(&response)
            }
            .await;
            record("search", &outcome, start);
            outcome
        })
    }

    /// Store a document.
    pub async fn index(&self, request: IndexRequest) -> Result<IndexResponse> {
        let start = Instant::now();
        let outcome: Result<IndexResponse> = async {
            let response = self.execute(&request.endpoint()?).await?;
            translator::translate_index(&response, &request)
        }
        .await;
        record("index", &outcome, start);
        outcome
    }

    async fn execute(&self, endpoint: &Endpoint) -> Result<RawResponse> {
        let idempotent = endpoint.is_idempotent();
        let mut attempt = 1;

        loop {
            match self.attempt(endpoint).await {
                Ok(response) => return Ok(response),
                Err(e) if self.pinned.is_none() && self.retry.should_retry(attempt, &e, idempotent) => {
                    let delay = self.retry.delay(attempt);
                    tracing::info!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying on another node"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(&self, endpoint: &Endpoint) -> Result<RawResponse> {
        let node = match &self.pinned {
            Some(node) => node.clone(),
            None => self.hosts.select_host()?,
        };

        match self.executor.execute(&node, endpoint).await {
            Ok(response) => {
                self.hosts.mark_success(&node);
                Ok(response)
            }
            Err(TransportError::InvalidUrl(reason)) => Err(ClientError::InvalidRequest(reason)),
            Err(e) => {
                self.hosts.mark_failure(&node);
                Err(ClientError::Unreachable {
                    node: node.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn record<T>(operation: &'static str, outcome: &Result<T>, start: Instant) {
    match outcome {
        Ok(_) => metrics::record_request(operation, "success", start),
        Err(e) => {
            tracing::debug!(operation, error = %e, "Call failed");
            metrics::record_request(operation, e.kind(), start);
        }
    }
}

/// Turn one future of many results into a stream that yields them, or the
/// error once.
fn flatten<T, F>(call: F) -> BoxStream<'static, Result<T>>
where
    T: Send + 'static,
    F: std::future::Future<Output = Result<Vec<T>>> + Send + 'static,
{
    stream::once(call)
        .flat_map(|outcome| match outcome {
            Ok(items) => stream::iter(items.into_iter().map(Ok)).left_stream(),
            Err(e) => stream::once(future::ready(Err(e))).right_stream(),
        })
        .boxed()
}
