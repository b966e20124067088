//! ES search-response parsing.
//!
//! Maps the ranked hit list back to [`EngineHits`], preserving engine
//! order exactly. Anything that does not parse as a hit list is an
//! `EngineProtocol` error surfaced to the caller; retries belong to the
//! transport, not here.

use serde::Deserialize;
use serde_json::Value;
use sift::engine::{EngineHit, EngineHits};
use sift::{Error, Result};

#[derive(Debug, Deserialize)]
struct EsSearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: TotalHits,
    hits: Vec<EsHit>,
}

/// ES 7+ reports `{"value": n, "relation": ...}`; older servers report a
/// bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EsHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f32>,
}

/// Parse a `_search` response body into engine hits.
pub fn parse(body: Value) -> Result<EngineHits> {
    let response: EsSearchResponse = serde_json::from_value(body)
        .map_err(|e| Error::EngineProtocol(format!("malformed search response: {e}")))?;
    Ok(EngineHits {
        total: response.hits.total.value() as usize,
        hits: response
            .hits
            .hits
            .into_iter()
            .map(|hit| EngineHit {
                id: hit.id,
                score: hit.score.unwrap_or(0.0),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_preserves_order() {
        let body = json!({
            "took": 3,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "max_score": 1.2,
                "hits": [
                    {"_index": "products", "_id": "b", "_score": 1.2},
                    {"_index": "products", "_id": "a", "_score": 0.4}
                ]
            }
        });
        let hits = parse(body).unwrap();
        assert_eq!(hits.total, 2);
        assert_eq!(hits.hits[0].id, "b");
        assert_eq!(hits.hits[1].id, "a");
    }

    #[test]
    fn test_parse_legacy_total() {
        let body = json!({"hits": {"total": 1, "hits": [{"_id": "x", "_score": null}]}});
        let hits = parse(body).unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.hits[0].score, 0.0);
    }

    #[test]
    fn test_malformed_response_is_protocol_error() {
        let err = parse(json!({"error": "boom"})).unwrap_err();
        assert!(matches!(err, Error::EngineProtocol(_)));
    }
}
