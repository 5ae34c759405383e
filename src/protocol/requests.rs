//! Typed requests and their wire mapping.
//!
//! | Operation | Verb | Path |
//! |---|---|---|
//! | ping | HEAD | `/` |
//! | info | GET | `/` |
//! | get | GET | `/{index}/{type}/{id}` (type defaults to `_all`) |
//! | multi get | POST | `/_mget` |
//! | search | POST | `/{index,...}/_search` |
//! | index, create only | PUT | `/{index}/{id}/_create` |
//! | index | PUT | `/{index}/{id}` |
//! | index, no id | POST | `/{index}` |

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::http::request::Endpoint;

/// Type segment used by `get` when none is given.
pub const ALL_TYPES: &str = "_all";

/// Percent-encode one path segment.
///
/// `.` and `..` are rejected: URL parsing resolves them (even escaped) as
/// dot segments, which would address a different endpoint.
pub(crate) fn encode_segment(segment: &str) -> Result<String> {
    if segment == "." || segment == ".." {
        return Err(ClientError::InvalidRequest(format!(
            "'{}' is not a valid path segment",
            segment
        )));
    }
    Ok(urlencoding::encode(segment).into_owned())
}

fn path(segments: &[&str]) -> Result<String> {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&encode_segment(segment)?);
    }
    if out.is_empty() {
        out.push('/');
    }
    Ok(out)
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidRequest(format!("{} must not be empty", what)));
    }
    Ok(())
}

/// `HEAD /`
pub fn ping_endpoint() -> Endpoint {
    Endpoint::new(Method::HEAD, "/")
}

/// `GET /`
pub fn info_endpoint() -> Endpoint {
    Endpoint::new(Method::GET, "/")
}

/// Fetch one document by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    pub index: String,
    pub doc_type: Option<String>,
    pub id: String,
    pub routing: Option<String>,
    pub preference: Option<String>,
    pub realtime: Option<bool>,
    pub refresh: Option<bool>,
}

impl GetRequest {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: id.into(),
            routing: None,
            preference: None,
            realtime: None,
            refresh: None,
        }
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = Some(realtime);
        self
    }

    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        require(&self.index, "index")?;
        require(&self.id, "id")?;
        let doc_type = self.doc_type.as_deref().unwrap_or(ALL_TYPES);

        Ok(Endpoint::new(Method::GET, path(&[self.index.as_str(), doc_type, self.id.as_str()])?)
            .param_opt("routing", self.routing.as_ref())
            .param_opt("preference", self.preference.as_ref())
            .param_opt("realtime", self.realtime)
            .param_opt("refresh", self.refresh))
    }
}

/// One document reference of a multi get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiGetItem {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
}

/// Fetch several documents in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiGetRequest {
    pub docs: Vec<MultiGetItem>,
    pub preference: Option<String>,
    pub realtime: Option<bool>,
    pub refresh: Option<bool>,
}

#[derive(Serialize)]
struct MultiGetBody<'a> {
    docs: &'a [MultiGetItem],
}

impl MultiGetRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document reference.
    pub fn add(mut self, index: impl Into<String>, doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        self.docs.push(MultiGetItem {
            index: index.into(),
            doc_type: Some(doc_type.into()),
            id: id.into(),
            routing: None,
        });
        self
    }

    /// Add a fully specified item.
    pub fn item(mut self, item: MultiGetItem) -> Self {
        self.docs.push(item);
        self
    }

    pub fn preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = Some(realtime);
        self
    }

    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        if self.docs.is_empty() {
            return Err(ClientError::InvalidRequest("multi get without documents".into()));
        }
        for doc in &self.docs {
            require(&doc.index, "index")?;
            require(&doc.id, "id")?;
        }

        let body = serde_json::to_vec(&MultiGetBody { docs: &self.docs })
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        Ok(Endpoint::new(Method::POST, "/_mget")
            .param_opt("preference", self.preference.as_ref())
            .param_opt("realtime", self.realtime)
            .param_opt("refresh", self.refresh)
            .body(body))
    }
}

/// Run a query against one or more indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub indices: Vec<String>,
    /// Search body (`query`, `sort`, `aggs`, ...). Sent as `{}` when absent.
    pub source: Option<Value>,
    pub routing: Option<String>,
    pub preference: Option<String>,
    pub size: Option<u32>,
    pub from: Option<u32>,
}

impl SearchRequest {
    pub fn new<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the full search body.
    pub fn source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    /// Set only the `query` part of the body.
    pub fn query(mut self, query: Value) -> Self {
        let mut body = match self.source.take() {
            Some(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        body.insert("query".to_string(), query);
        self.source = Some(Value::Object(body));
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn from(mut self, from: u32) -> Self {
        self.from = Some(from);
        self
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        for index in &self.indices {
            require(index, "index")?;
        }

        let path = if self.indices.is_empty() {
            "/_search".to_string()
        } else {
            let joined = self
                .indices
                .iter()
                .map(|i| encode_segment(i))
                .collect::<Result<Vec<_>>>()?
                .join(",");
            format!("/{}/_search", joined)
        };

        let body = match &self.source {
            Some(source) => serde_json::to_vec(source).map_err(|e| ClientError::InvalidRequest(e.to_string()))?,
            None => b"{}".to_vec(),
        };

        Ok(Endpoint::new(Method::POST, path)
            .param_opt("routing", self.routing.as_ref())
            .param_opt("preference", self.preference.as_ref())
            .param_opt("size", self.size)
            .param_opt("from", self.from)
            .body(body))
    }
}

/// When index changes become visible to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Refresh immediately.
    Immediate,
    /// Do not refresh.
    None,
    /// Wait for the next scheduled refresh.
    WaitFor,
}

impl RefreshPolicy {
    pub fn as_param(&self) -> &'static str {
        match self {
            RefreshPolicy::Immediate => "true",
            RefreshPolicy::None => "false",
            RefreshPolicy::WaitFor => "wait_for",
        }
    }
}

/// Store a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRequest {
    pub index: String,
    pub doc_type: Option<String>,
    /// Server generates an id when absent.
    pub id: Option<String>,
    /// Fail with a conflict instead of overwriting an existing document.
    pub create: bool,
    /// Raw JSON document.
    pub source: Vec<u8>,
    pub routing: Option<String>,
    pub refresh: Option<RefreshPolicy>,
    /// Wait time for active shards, e.g. `"1m"`.
    pub timeout: Option<String>,
}

impl IndexRequest {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: None,
            create: false,
            source: Vec::new(),
            routing: None,
            refresh: None,
            timeout: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Use an already encoded JSON document.
    pub fn source(mut self, json: impl Into<Vec<u8>>) -> Self {
        self.source = json.into();
        self
    }

    /// Encode a serializable document.
    pub fn source_json<T: Serialize>(mut self, document: &T) -> Result<Self> {
        self.source = serde_json::to_vec(document).map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        Ok(self)
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        require(&self.index, "index")?;
        if self.source.is_empty() {
            return Err(ClientError::InvalidRequest("index request without source".into()));
        }

        let mut segments: Vec<&str> = vec![self.index.as_str()];
        if let Some(doc_type) = &self.doc_type {
            segments.push(doc_type);
        }

        let (method, endpoint_path) = match &self.id {
            Some(id) => {
                require(id, "id")?;
                segments.push(id);
                if self.create {
                    segments.push("_create");
                }
                (Method::PUT, path(&segments)?)
            }
            None => (Method::POST, path(&segments)?),
        };

        Ok(Endpoint::new(method, endpoint_path)
            .param_opt("routing", self.routing.as_ref())
            .param_opt("refresh", self.refresh.map(|r| r.as_param()))
            .param_opt("timeout", self.timeout.as_ref())
            .body(self.source.clone()))
    }
}
