//! Cluster node addresses.
//!
//! A node is immutable once configured. Its identity is the normalized base
//! URL; health is tracked separately by the registry.

use std::fmt;
use url::Url;

use crate::error::{ClientError, Result};

/// One address of the search cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// Base URL without trailing slash, e.g. `http://localhost:9200`.
    base: String,
}

impl Node {
    /// Parse a node address.
    ///
    /// Accepts `host:port`, `http://host:port` and `https://host:port[/prefix]`.
    /// A missing scheme defaults to `http`.
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ClientError::InvalidRequest("empty node address".into()));
        }

        let with_scheme = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };

        let url = Url::parse(&with_scheme).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid node address '{}': {}", address, e))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ClientError::InvalidRequest(format!(
                    "unsupported scheme '{}' in node address '{}'",
                    other, address
                )))
            }
        }
        if url.host_str().is_none() {
            return Err(ClientError::InvalidRequest(format!(
                "node address '{}' has no host",
                address
            )));
        }

        let mut base = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
        if let Some(port) = url.port() {
            base.push_str(&format!(":{}", port));
        }
        base.push_str(url.path().trim_end_matches('/'));

        Ok(Self { base })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Build the absolute URL for an endpoint path and query parameters.
    pub fn url_for(&self, path: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base, path)).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid endpoint '{}': {}", path, e))
        })?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

impl std::str::FromStr for Node {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Node::parse(s)
    }
}
