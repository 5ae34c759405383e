//! Response translation.
//!
//! Pure functions from a raw response to typed results. Not-found is a value
//! here; only unexpected statuses and malformed bodies become errors.

use reqwest::StatusCode;

use crate::error::{ClientError, Result};
use crate::http::transport::RawResponse;
use crate::protocol::json::{decode, protocol_error};
use crate::protocol::requests::{GetRequest, IndexRequest};
use crate::protocol::responses::{
    ClusterInfo, DocumentBody, GetResult, IndexBody, IndexResponse, MultiGetBody, ResultCode, SearchBody,
    SearchHit,
};

/// Ping decision table.
///
/// | Outcome | Result |
/// |---|---|
/// | 2xx | `true` |
/// | any other status | `false` |
/// | transport failure / no reachable host | `false` |
pub fn translate_ping(outcome: &Result<RawResponse>) -> bool {
    match outcome {
        Ok(response) => response.status.is_success(),
        Err(e) => {
            tracing::debug!(error = %e, "Ping failed");
            false
        }
    }
}

pub fn translate_info(response: &RawResponse) -> Result<ClusterInfo> {
    if !response.status.is_success() {
        return Err(protocol_error(response));
    }
    decode("info", &response.body)
}

/// Translate a get response. 200 and 404 both carry a document outcome.
pub fn translate_get(response: &RawResponse, request: &GetRequest) -> Result<GetResult> {
    match response.status {
        StatusCode::OK => {
            let body: DocumentBody = decode("get", &response.body)?;
            Ok(document_result(body, &request.index, &request.id))
        }
        StatusCode::NOT_FOUND => {
            // A missing index answers with an error body instead of a document.
            let body = serde_json::from_slice::<DocumentBody>(&response.body).ok();
            match body {
                Some(body) if body.error.is_none() => Ok(document_result(body, &request.index, &request.id)),
                _ => Ok(GetResult::missing(
                    request.index.clone(),
                    request.doc_type.clone(),
                    request.id.clone(),
                )),
            }
        }
        _ => Err(protocol_error(response)),
    }
}

/// A document exists only when it is found and carries a `_source`.
fn document_result(body: DocumentBody, index: &str, id: &str) -> GetResult {
    let source = match (body.found, body.source) {
        (Some(true), Some(source)) => Some(source),
        _ => None,
    };
    GetResult {
        index: body.index.unwrap_or_else(|| index.to_string()),
        doc_type: body.doc_type,
        id: body.id.unwrap_or_else(|| id.to_string()),
        version: source.as_ref().and(body.version),
        exists: source.is_some(),
        source: source.unwrap_or_default(),
    }
}

/// Translate a multi get response, preserving server order.
///
/// Entries carrying an `error` are dropped. Entries with `found: false` are
/// kept with `exists == false`.
pub fn translate_multi_get(response: &RawResponse) -> Result<Vec<GetResult>> {
    if !response.status.is_success() {
        return Err(protocol_error(response));
    }
    let body: MultiGetBody = decode("multi get", &response.body)?;

    let mut results = Vec::with_capacity(body.docs.len());
    for doc in body.docs {
        if let Some(error) = &doc.error {
            tracing::debug!(index = ?doc.index, id = ?doc.id, error = %error, "Skipping failed multi get entry");
            continue;
        }
        let (index, id) = match (doc.index.clone(), doc.id.clone()) {
            (Some(index), Some(id)) => (index, id),
            _ => {
                return Err(ClientError::Decode(
                    "multi get response: entry without _index or _id".into(),
                ))
            }
        };
        results.push(document_result(doc, &index, &id));
    }
    Ok(results)
}

pub fn translate_search(response: &RawResponse) -> Result<Vec<SearchHit>> {
    if !response.status.is_success() {
        return Err(protocol_error(response));
    }
    let body: SearchBody = decode("search", &response.body)?;

    tracing::debug!(
        total = ?body.hits.total.as_ref().map(|t| t.value()),
        returned = body.hits.hits.len(),
        "Search completed"
    );

    Ok(body
        .hits
        .hits
        .into_iter()
        .map(|hit| SearchHit {
            index: hit.index,
            doc_type: hit.doc_type,
            id: hit.id,
            score: hit.score,
            source: hit.source.unwrap_or_default(),
        })
        .collect())
}

/// 201 means created, 200 means an existing document was replaced.
pub fn translate_index(response: &RawResponse, request: &IndexRequest) -> Result<IndexResponse> {
    let result = match response.status {
        StatusCode::CREATED => ResultCode::Created,
        StatusCode::OK => ResultCode::Updated,
        _ => return Err(protocol_error(response)),
    };
    let body: IndexBody = decode("index", &response.body)?;

    let id = match body.id.or_else(|| request.id.clone()) {
        Some(id) => id,
        None => return Err(ClientError::Decode("index response: missing _id".into())),
    };

    Ok(IndexResponse {
        index: body.index.unwrap_or_else(|| request.index.clone()),
        doc_type: body.doc_type.or_else(|| request.doc_type.clone()),
        id,
        version: body.version,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn response(status: StatusCode, body: &str) -> RawResponse {
        RawResponse::new(status, body.as_bytes().to_vec())
    }

    fn ok(body: &str) -> RawResponse {
        response(StatusCode::OK, body)
    }

    #[test]
    fn test_ping_decision_table() {
        assert!(translate_ping(&Ok(response(StatusCode::OK, ""))));
        assert!(!translate_ping(&Ok(response(StatusCode::NOT_FOUND, ""))));
        assert!(!translate_ping(&Ok(response(StatusCode::INTERNAL_SERVER_ERROR, ""))));
        assert!(!translate_ping(&Err(ClientError::Unreachable {
            node: "http://localhost:9200".into(),
            reason: "connection refused".into(),
        })));
        assert!(!translate_ping(&Err(ClientError::NoReachableHost)));
    }

    #[test]
    fn test_info() {
        let info = translate_info(&ok(include_str!("../../tests/fixtures/info.json"))).unwrap();
        assert_eq!(info.name, "node-1");
        assert_eq!(info.cluster_name, "elasticsearch");
        assert_eq!(info.version.number, "6.4.0");
        assert_eq!(info.version.lucene_version.as_deref(), Some("7.4.0"));
        assert_eq!(info.tagline.as_deref(), Some("You Know, for Search"));

        let err = translate_info(&response(StatusCode::SERVICE_UNAVAILABLE, "")).unwrap_err();
        assert_eq!(err, ClientError::Protocol { status: 503, reason: None });
    }

    #[test]
    fn test_get_found_keeps_every_source_type() {
        let result = translate_get(
            &ok(include_str!("../../tests/fixtures/get-by-id-ok.json")),
            &GetRequest::new("twitter", "1"),
        )
        .unwrap();

        assert!(result.exists);
        assert_eq!(result.index, "twitter");
        assert_eq!(result.id, "1");
        assert_eq!(result.version, Some(1));
        assert_eq!(result.source["user"], json!("kimchy"));
        assert_eq!(result.source["likes"], json!(42));
        assert_eq!(result.source["retweeted"], json!(false));
        assert_eq!(result.source["geo"]["lat"], json!(52.37));
        assert_eq!(result.source["tags"], json!(["elasticsearch", "search"]));
        assert_eq!(result.source["reply_to"], Value::Null);
    }

    #[test]
    fn test_get_no_hit() {
        let request = GetRequest::new("twitter", "1");
        let body = include_str!("../../tests/fixtures/get-by-id-no-hit.json");

        for status in [StatusCode::OK, StatusCode::NOT_FOUND] {
            let result = translate_get(&response(status, body), &request).unwrap();
            assert!(!result.exists);
            assert!(result.source.is_empty());
            assert_eq!(result.id, "1");
        }
    }

    #[test]
    fn test_get_missing_index_is_not_found() {
        let result = translate_get(
            &response(StatusCode::NOT_FOUND, include_str!("../../tests/fixtures/index-not-found.json")),
            &GetRequest::new("twitter", "1"),
        )
        .unwrap();
        assert!(!result.exists);
        assert_eq!(result.index, "twitter");

        let empty = translate_get(&response(StatusCode::NOT_FOUND, ""), &GetRequest::new("twitter", "1")).unwrap();
        assert!(!empty.exists);
    }

    #[test]
    fn test_get_found_without_source_does_not_exist() {
        let result = translate_get(
            &ok(r#"{"_index":"twitter","_id":"1","_version":3,"found":true}"#),
            &GetRequest::new("twitter", "1"),
        )
        .unwrap();
        assert!(!result.exists);
        assert!(result.source.is_empty());
        assert_eq!(result.version, None);
        assert_eq!(result.id, "1");
    }

    #[test]
    fn test_get_found_with_empty_source_exists() {
        let result = translate_get(
            &ok(r#"{"_index":"twitter","_id":"1","found":true,"_source":{}}"#),
            &GetRequest::new("twitter", "1"),
        )
        .unwrap();
        assert!(result.exists);
        assert!(result.source.is_empty());
    }

    #[test]
    fn test_get_other_status_is_protocol_error() {
        let err = translate_get(
            &response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#),
            &GetRequest::new("twitter", "1"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClientError::Protocol {
                status: 500,
                reason: Some("boom".into())
            }
        );

        let garbage = translate_get(&ok("<html>"), &GetRequest::new("twitter", "1"));
        assert!(matches!(garbage, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_multi_get_two_hits() {
        let results = translate_multi_get(&ok(include_str!("../../tests/fixtures/multi-get-ok-2-hits.json"))).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(results.iter().all(|r| r.exists));
        assert_eq!(results[1].source["message"], json!("Another tweet, will it be indexed?"));
    }

    #[test]
    fn test_multi_get_skips_unavailable_entries() {
        let results = translate_multi_get(&ok(include_str!(
            "../../tests/fixtures/multi-get-ok-2-hits-1-unavailable.json"
        )))
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "1");
        assert_eq!(results[1].id, "3");
        for result in &results {
            assert!(result.exists);
            for key in ["user", "message", "post_date"] {
                assert!(result.source.contains_key(key), "missing {} in {}", key, result.id);
            }
        }
    }

    #[test]
    fn test_multi_get_keeps_not_found_entries() {
        let results = translate_multi_get(&ok(include_str!(
            "../../tests/fixtures/multi-get-1-hit-1-not-found.json"
        )))
        .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].exists);
        assert!(!results[1].exists);
        assert_eq!(results[1].id, "2");
        assert!(results[1].source.is_empty());
    }

    #[test]
    fn test_multi_get_entry_without_id_is_decode_error() {
        let result = translate_multi_get(&ok(r#"{"docs":[{"_index":"twitter","found":true}]}"#));
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_search_hits_in_server_order() {
        let hits = translate_search(&ok(include_str!("../../tests/fixtures/search-ok-multiple-hits.json"))).unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(hits[0].score, Some(0.2876821));

        let single = translate_search(&ok(include_str!("../../tests/fixtures/search-ok-single-hit.json"))).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].source["user"], json!("kimchy"));
    }

    #[test]
    fn test_search_no_hits() {
        let hits = translate_search(&ok(include_str!("../../tests/fixtures/search-ok-no-hits.json"))).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_missing_index() {
        let err = translate_search(&response(
            StatusCode::NOT_FOUND,
            include_str!("../../tests/fixtures/index-not-found.json"),
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ClientError::Protocol {
                status: 404,
                reason: Some("index_not_found_exception: no such index".into())
            }
        );
    }

    #[test]
    fn test_index_created_and_updated() {
        let request = IndexRequest::new("twitter").id("10").create(true).source("{}");
        let created = translate_index(
            &response(StatusCode::CREATED, include_str!("../../tests/fixtures/index-created.json")),
            &request,
        )
        .unwrap();
        assert_eq!(created.result, ResultCode::Created);
        assert_eq!(created.id, "10");
        assert_eq!(created.index, "twitter");

        let updated = translate_index(
            &ok(include_str!("../../tests/fixtures/index-updated.json")),
            &IndexRequest::new("twitter").id("1").source("{}"),
        )
        .unwrap();
        assert_eq!(updated.result, ResultCode::Updated);
        assert_eq!(updated.version, Some(2));
    }

    #[test]
    fn test_index_falls_back_to_request_identity() {
        let response = response(StatusCode::CREATED, "{}");
        let result = translate_index(&response, &IndexRequest::new("twitter").id("10").source("{}")).unwrap();
        assert_eq!(result.index, "twitter");
        assert_eq!(result.id, "10");

        let anonymous = translate_index(&response, &IndexRequest::new("twitter").source("{}"));
        assert!(matches!(anonymous, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_index_conflict() {
        let body = r#"{"error":{"type":"version_conflict_engine_exception","reason":"[_doc][10]: version conflict, document already exists"},"status":409}"#;
        let err = translate_index(
            &response(StatusCode::CONFLICT, body),
            &IndexRequest::new("twitter").id("10").create(true).source("{}"),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Protocol { status: 409, reason: Some(_) }));
    }
}
