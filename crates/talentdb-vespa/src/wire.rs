//! JSON shapes exchanged with the search backend's HTTP API.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use talentdb_core::error::ExecutionError;
use talentdb_core::{CompiledQuery, RawHit};

/// Body for `POST /search/`: the query text, ranking profile, backend-side
/// timeout, then every vector input and feature weight as a top-level key.
pub fn search_body(query: &CompiledQuery, ranking: &str, timeout_secs: u64) -> Value {
    let mut body = Map::new();
    body.insert("yql".into(), Value::from(query.expression.as_str()));
    body.insert("ranking".into(), Value::from(ranking));
    body.insert("timeout".into(), Value::from(format!("{timeout_secs}s")));
    for (name, directive) in &query.vector_inputs {
        body.insert(name.clone(), Value::from(directive.as_str()));
    }
    for (name, weight) in &query.feature_weights {
        body.insert(name.clone(), Value::from(*weight));
    }
    Value::Object(body)
}

/// Body for a document put.
pub fn feed_body(fields: &Map<String, Value>) -> Value {
    json!({ "fields": fields })
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub root: Option<ResultRoot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResultRoot {
    #[serde(default)]
    pub children: Option<Vec<RawHit>>,
    #[serde(default)]
    pub errors: Vec<BackendMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl std::fmt::Display for BackendMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = [self.summary.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(": ");
        match self.code {
            Some(code) => write!(f, "[{code}] {text}"),
            None => f.write_str(&text),
        }
    }
}

impl SearchResponse {
    /// Hits in backend order. No `children` means zero hits, unless the backend
    /// also reported errors, in which case the errors are the result.
    pub fn into_hits(self) -> Result<Vec<RawHit>, ExecutionError> {
        let root = self.root.unwrap_or_default();
        match root.children {
            Some(children) => {
                if !root.errors.is_empty() {
                    tracing::warn!(errors = %join(&root.errors), "partial result from search backend");
                }
                Ok(children)
            }
            None if !root.errors.is_empty() => Err(ExecutionError::Backend(join(&root.errors))),
            None => Ok(Vec::new()),
        }
    }
}

fn join(messages: &[BackendMessage]) -> String {
    messages.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn search_body_flattens_inputs_and_weights() {
        let query = CompiledQuery {
            expression: "select * from job where (x) limit 10 offset 0".into(),
            vector_inputs: BTreeMap::from([("input.query(s)".to_string(), "embed(m,'python')".to_string())]),
            feature_weights: BTreeMap::from([
                ("input.query(skills_weight)".to_string(), 1),
                ("input.query(latest_role_weight)".to_string(), 0),
            ]),
            limit: 10,
            offset: 0,
        };
        let body = search_body(&query, "default", 20);
        assert_eq!(body["yql"], json!("select * from job where (x) limit 10 offset 0"));
        assert_eq!(body["timeout"], json!("20s"));
        assert_eq!(body["input.query(s)"], json!("embed(m,'python')"));
        assert_eq!(body["input.query(skills_weight)"], json!(1));
        assert_eq!(body["input.query(latest_role_weight)"], json!(0));
    }

    #[test]
    fn missing_children_is_empty_page() {
        let resp: SearchResponse = serde_json::from_value(json!({ "root": { "fields": { "totalCount": 0 } } })).expect("resp");
        assert!(resp.into_hits().expect("hits").is_empty());
        let resp: SearchResponse = serde_json::from_value(json!({})).expect("resp");
        assert!(resp.into_hits().expect("hits").is_empty());
    }

    #[test]
    fn errors_without_children_fail() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "root": { "errors": [ { "code": 4, "summary": "Invalid query parameter", "message": "Could not parse" } ] }
        }))
        .expect("resp");
        match resp.into_hits() {
            Err(ExecutionError::Backend(msg)) => assert_eq!(msg, "[4] Invalid query parameter: Could not parse"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn children_win_over_errors() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "root": {
                "errors": [ { "code": 12, "summary": "Timed out" } ],
                "children": [ { "id": "id:default:job::j-1", "relevance": 0.4, "fields": { "id": "j-1" } } ]
            }
        }))
        .expect("resp");
        let hits = resp.into_hits().expect("hits");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].identity().as_deref(), Some("j-1"));
    }
}
