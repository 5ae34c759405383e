//! Typed results and the wire shapes they are decoded from.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// A document's `_source` as a JSON object.
pub type Source = Map<String, Value>;

fn source_as<T: DeserializeOwned>(source: &Source) -> Result<T> {
    T::deserialize(Value::Object(source.clone())).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Outcome of fetching one document. `exists == false` implies an empty source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetResult {
    pub index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    pub exists: bool,
    pub source: Source,
}

impl GetResult {
    /// A result for a document the server does not have.
    pub fn missing(index: impl Into<String>, doc_type: Option<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type,
            id: id.into(),
            version: None,
            exists: false,
            source: Source::new(),
        }
    }

    /// Decode the source into a caller type.
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<T> {
        source_as(&self.source)
    }
}

/// One hit of a search, in server order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    pub id: String,
    pub score: Option<f64>,
    pub source: Source,
}

impl SearchHit {
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<T> {
        source_as(&self.source)
    }
}

/// Whether an index call created or replaced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCode {
    Created,
    Updated,
}

/// Outcome of an index call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexResponse {
    pub index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    pub result: ResultCode,
}

/// Cluster metadata returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub name: String,
    pub cluster_name: String,
    #[serde(default)]
    pub cluster_uuid: Option<String>,
    pub version: VersionInfo,
    #[serde(default)]
    pub tagline: Option<String>,
}

/// Version block of [`ClusterInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub number: String,
    #[serde(default)]
    pub build_flavor: Option<String>,
    #[serde(default)]
    pub build_type: Option<String>,
    #[serde(default)]
    pub build_hash: Option<String>,
    #[serde(default)]
    pub build_date: Option<String>,
    #[serde(default)]
    pub build_snapshot: Option<bool>,
    #[serde(default)]
    pub lucene_version: Option<String>,
    #[serde(default)]
    pub minimum_wire_compatibility_version: Option<String>,
    #[serde(default)]
    pub minimum_index_compatibility_version: Option<String>,
}

// Wire shapes.

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentBody {
    #[serde(rename = "_index")]
    pub index: Option<String>,
    #[serde(rename = "_type")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_version")]
    pub version: Option<i64>,
    pub found: Option<bool>,
    #[serde(rename = "_source")]
    pub source: Option<Source>,
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MultiGetBody {
    pub docs: Vec<DocumentBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchBody {
    pub hits: HitsBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HitsBody {
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<HitBody>,
}

/// `hits.total` is a number up to 6.x and an object from 7.x on.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HitBody {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Option<Source>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexBody {
    #[serde(rename = "_index")]
    pub index: Option<String>,
    #[serde(rename = "_type")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_version")]
    pub version: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
    Text(String),
    Structured {
        #[serde(rename = "type")]
        kind: Option<String>,
        reason: Option<String>,
    },
}
