//! Raw hit to typed record projection.
//!
//! Absent or null fields become `None`. A field holding the wrong JSON type
//! fails the hit, and one failed hit fails the whole page, so data-quality
//! problems in the index reach the caller instead of being dropped.

use serde_json::Value;
use tracing::error;

use talentdb_core::error::ResultFormatError;
use talentdb_core::{DocumentType, RawHit};

use crate::records::{CandidateResult, JobResult, TypedResult};
use crate::timestamp::render_created_at;

pub const ROLE_SCORE: &str = "latest_role_score";
pub const TITLE_SCORE: &str = "latest_title_score";
pub const SKILLS_SCORE: &str = "skills_score";

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultFormatter;

impl ResultFormatter {
    /// Format every hit, preserving backend order.
    pub fn format(&self, hits: &[RawHit], doc_type: DocumentType) -> Result<Vec<TypedResult>, ResultFormatError> {
        hits.iter()
            .map(|hit| match doc_type {
                DocumentType::Candidate => self.candidate(hit).map(TypedResult::Candidate),
                DocumentType::Job => self.job(hit).map(TypedResult::Job),
            })
            .collect()
    }

    pub fn candidate(&self, hit: &RawHit) -> Result<CandidateResult, ResultFormatError> {
        let f = Fields(hit);
        let project = || -> Result<CandidateResult, String> {
            Ok(CandidateResult {
                id: f.id()?,
                relevance_score: percent(&hit.relevance, "relevance")?,
                name: display_name(f.string("first_name")?, f.string("last_name")?),
                email: f.string("primary_email")?,
                mobile_number: f.string("primary_mobile_number")?,
                current_city: f.string("current_city")?,
                job_role: f.string("latest_role")?,
                job_title: f.string("latest_job_title")?,
                total_months_of_experience: f.count("total_months_of_experience")?,
                skills: f.strings("skills")?,
                job_role_score: f.subscore(ROLE_SCORE)?,
                job_title_score: f.subscore(TITLE_SCORE)?,
                skills_score: f.subscore(SKILLS_SCORE)?,
                created_at: hit.fields.get("created_at").and_then(render_created_at),
                created_by: f.string("created_by")?,
            })
        };
        project().map_err(|reason| failure(hit, reason))
    }

    pub fn job(&self, hit: &RawHit) -> Result<JobResult, ResultFormatError> {
        let f = Fields(hit);
        let project = || -> Result<JobResult, String> {
            Ok(JobResult {
                id: f.id()?,
                relevance_score: percent(&hit.relevance, "relevance")?,
                company: f.string("company_name")?,
                location: f.strings("location")?,
                experience_required: f.count("total_months_of_experience")?.map(|months| months / 12),
                salary: f.number("annual_ctc")?,
                description: f.string("job_summary")?,
                role: f.string("job_role")?,
                title: f.string("job_title")?,
            })
        };
        project().map_err(|reason| failure(hit, reason))
    }
}

fn failure(hit: &RawHit, reason: String) -> ResultFormatError {
    let hit_id = hit.identity();
    error!(hit = hit_id.as_deref().unwrap_or("<unknown>"), %reason, "hit could not be formatted");
    ResultFormatError { hit_id, reason }
}

/// First and last name joined by a space when both are present, else either.
fn display_name(first: Option<String>, last: Option<String>) -> Option<String> {
    let present = |name: Option<String>| name.filter(|n| !n.trim().is_empty());
    match (present(first), present(last)) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (first, last) => first.or(last),
    }
}

fn percent(value: &Value, what: &str) -> Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(|v| Some(v * 100.0)).ok_or_else(|| format!("{what} is not a finite number")),
        other => Err(format!("{what} should be a number, got {}", kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Typed accessors over a hit's stored fields. Null and absent read as `None`.
struct Fields<'a>(&'a RawHit);

impl Fields<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.0.fields.get(name).filter(|v| !v.is_null())
    }

    fn mismatch(name: &str, expected: &str, got: &Value) -> String {
        format!("field `{name}` should be {expected}, got {}", kind(got))
    }

    fn id(&self) -> Result<Option<String>, String> {
        match self.get("id") {
            None | Some(Value::String(_) | Value::Number(_)) => Ok(self.0.identity()),
            Some(other) => Err(Self::mismatch("id", "a string", other)),
        }
    }

    fn string(&self, name: &str) -> Result<Option<String>, String> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Self::mismatch(name, "a string", other)),
        }
    }

    fn number(&self, name: &str) -> Result<Option<f64>, String> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(Self::mismatch(name, "a number", other)),
        }
    }

    /// Non-negative whole number; integral floats such as `36.0` are accepted.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn count(&self, name: &str) -> Result<Option<u64>, String> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => match (n.as_u64(), n.as_f64()) {
                (Some(v), _) => Ok(Some(v)),
                (None, Some(v)) if v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 => Ok(Some(v as u64)),
                _ => Err(format!("field `{name}` should be a non-negative whole number, got {n}")),
            },
            Some(other) => Err(Self::mismatch(name, "a number", other)),
        }
    }

    fn strings(&self, name: &str) -> Result<Option<Vec<String>>, String> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(Self::mismatch(name, "a list of strings", other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(Self::mismatch(name, "a list of strings", other)),
        }
    }

    fn subscore(&self, name: &str) -> Result<Option<f64>, String> {
        match self.0.subscore(name) {
            None => Ok(None),
            Some(value) => percent(value, name),
        }
    }
}
