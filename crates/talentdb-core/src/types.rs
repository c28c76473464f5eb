//! Domain types shared by the compiler, the executor and the formatter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which query-building branches run for a request.
///
/// `Lexical` builds the exact-match hard clauses, `Semantic` builds the
/// ranked weak-OR and nearest-neighbor clauses, `Both` builds all of them.
/// Location and range clauses are built for every mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Lexical,
    Semantic,
    #[default]
    Both,
}

impl SearchMode {
    /// Exact skill/role/title containment clauses.
    pub fn builds_exact_clauses(self) -> bool {
        match self {
            SearchMode::Lexical | SearchMode::Both => true,
            SearchMode::Semantic => false,
        }
    }

    /// Weak-OR text clauses and vector-similarity clauses.
    pub fn builds_ranked_clauses(self) -> bool {
        match self {
            SearchMode::Semantic | SearchMode::Both => true,
            SearchMode::Lexical => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Lexical => "lexical",
            SearchMode::Semantic => "semantic",
            SearchMode::Both => "both",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(SearchMode::Lexical),
            "semantic" => Ok(SearchMode::Semantic),
            "both" => Ok(SearchMode::Both),
            other => Err(format!("unknown search mode '{other}' (expected lexical, semantic or both)")),
        }
    }
}

/// The document schemas the compiler and formatter know how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Candidate,
    Job,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Candidate => "candidate",
            DocumentType::Job => "job",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "candidate" | "candidates" | "profile" => Ok(DocumentType::Candidate),
            "job" | "jobs" => Ok(DocumentType::Job),
            other => Err(format!("unknown document type '{other}' (expected candidate or job)")),
        }
    }
}

/// One ranked hit as returned by the search backend.
///
/// - `id`: backend document id (`id:<ns>:<schema>::<doc>`), if reported
/// - `relevance`: raw score, expected in `[0, 1]`
/// - `fields`: stored document fields
/// - `subscores`: named sub-scores when the backend reports them at hit level;
///   otherwise they are looked up under `fields.summaryfeatures`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub relevance: Value,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub subscores: Map<String, Value>,
}

impl RawHit {
    /// The document's own `id` field, falling back to the backend id.
    pub fn identity(&self) -> Option<String> {
        match self.fields.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => self.id.clone(),
        }
    }

    pub fn subscore(&self, name: &str) -> Option<&Value> {
        self.subscores
            .get(name)
            .or_else(|| {
                self.fields
                    .get("summaryfeatures")
                    .and_then(|s| s.as_object())
                    .and_then(|s| s.get(name))
            })
            .filter(|v| !v.is_null())
    }
}

/// Compiler output, handed straight to a [`crate::traits::QueryExecutor`].
///
/// `vector_inputs` maps `input.query(<tensor>)` to an `embed(<model>,'<text>')`
/// directive; `feature_weights` maps `input.query(<weight>)` to 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub expression: String,
    pub vector_inputs: BTreeMap<String, String>,
    pub feature_weights: BTreeMap<String, u8>,
    pub limit: u64,
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mode_gates_are_exhaustive() {
        assert!(SearchMode::Lexical.builds_exact_clauses());
        assert!(!SearchMode::Lexical.builds_ranked_clauses());
        assert!(!SearchMode::Semantic.builds_exact_clauses());
        assert!(SearchMode::Semantic.builds_ranked_clauses());
        assert!(SearchMode::Both.builds_exact_clauses());
        assert!(SearchMode::Both.builds_ranked_clauses());
        assert_eq!(SearchMode::default(), SearchMode::Both);
    }

    #[test]
    fn mode_parses_named_form_only() {
        assert_eq!("Semantic".parse::<SearchMode>(), Ok(SearchMode::Semantic));
        assert!("1".parse::<SearchMode>().is_err());
        let m: SearchMode = serde_json::from_value(json!("lexical")).expect("named mode");
        assert_eq!(m, SearchMode::Lexical);
        assert!(serde_json::from_value::<SearchMode>(json!(0)).is_err());
    }

    #[test]
    fn hit_identity_prefers_document_field() {
        let hit: RawHit = serde_json::from_value(json!({
            "id": "id:default:candidate_profile::c-1",
            "relevance": 0.5,
            "fields": { "id": "c-1" }
        }))
        .expect("hit");
        assert_eq!(hit.identity().as_deref(), Some("c-1"));

        let bare = RawHit { id: Some("id:x::y".into()), ..RawHit::default() };
        assert_eq!(bare.identity().as_deref(), Some("id:x::y"));
    }

    #[test]
    fn subscores_fall_back_to_summary_features() {
        let hit: RawHit = serde_json::from_value(json!({
            "relevance": 0.5,
            "fields": { "summaryfeatures": { "skills_score": 0.25, "latest_role_score": null } }
        }))
        .expect("hit");
        assert_eq!(hit.subscore("skills_score"), Some(&json!(0.25)));
        assert_eq!(hit.subscore("latest_role_score"), None);

        let top: RawHit = serde_json::from_value(json!({
            "relevance": 0.5,
            "subscores": { "skills_score": 0.75 },
            "fields": { "summaryfeatures": { "skills_score": 0.25 } }
        }))
        .expect("hit");
        assert_eq!(top.subscore("skills_score"), Some(&json!(0.75)));
    }
}
