//! Non-blocking client for an Elasticsearch-style HTTP+JSON search cluster.
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use search_client::{ClientConfig, GetRequest, SearchClient, SearchRequest};
//!
//! # async fn demo() -> search_client::Result<()> {
//! let client = SearchClient::from_config(&ClientConfig::with_nodes(["localhost:9200"]))?;
//!
//! let tweet = client.get(GetRequest::new("twitter", "1")).await?;
//! if tweet.exists {
//!     println!("{:?}", tweet.source);
//! }
//!
//! let mut hits = client.search(SearchRequest::new(["twitter"]));
//! while let Some(hit) = hits.next().await {
//!     println!("{}", hit?.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod hosts;
pub mod http;
pub mod observability;
pub mod protocol;
pub mod resilience;

pub use client::SearchClient;
pub use config::schema::ClientConfig;
pub use error::{ClientError, Result};
pub use hosts::{HostProvider, Node};
pub use http::{HttpTransport, Transport};
pub use protocol::{
    ClusterInfo, GetRequest, GetResult, IndexRequest, IndexResponse, MultiGetItem, MultiGetRequest, RefreshPolicy,
    ResultCode, SearchHit, SearchRequest,
};
