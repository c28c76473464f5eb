//! Abstract-to-concrete field name tables, one per document schema.
//!
//! The compiler only ever speaks in [`FieldKey`]s; a [`FieldMap`] turns them
//! into the backend's field and embedding index names. Serving a new document
//! type means supplying a new table, not touching the compiler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::QueryBuildError;
use crate::types::DocumentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    SkillsExact,
    SkillsSoft,
    SkillsVector,
    Role,
    RoleVector,
    Title,
    TitleVector,
    Location,
    ExperienceMonths,
    Compensation,
}

impl FieldKey {
    pub const ALL: [FieldKey; 10] = [
        FieldKey::SkillsExact,
        FieldKey::SkillsSoft,
        FieldKey::SkillsVector,
        FieldKey::Role,
        FieldKey::RoleVector,
        FieldKey::Title,
        FieldKey::TitleVector,
        FieldKey::Location,
        FieldKey::ExperienceMonths,
        FieldKey::Compensation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::SkillsExact => "skills_exact",
            FieldKey::SkillsSoft => "skills_soft",
            FieldKey::SkillsVector => "skills_vector",
            FieldKey::Role => "role",
            FieldKey::RoleVector => "role_vector",
            FieldKey::Title => "title",
            FieldKey::TitleVector => "title_vector",
            FieldKey::Location => "location",
            FieldKey::ExperienceMonths => "experience_months",
            FieldKey::Compensation => "compensation",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend schema name plus its field table, keyed by [`FieldKey::as_str`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    pub schema: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl FieldMap {
    pub fn new<S: Into<String>>(schema: S, fields: impl IntoIterator<Item = (FieldKey, String)>) -> Self {
        Self { schema: schema.into(), fields: fields.into_iter().map(|(k, v)| (k.as_str().to_string(), v)).collect() }
    }

    pub fn candidate() -> Self {
        Self::from_pairs(
            "candidate_profile",
            [
                (FieldKey::SkillsExact, "skills_attr"),
                (FieldKey::SkillsSoft, "skills"),
                (FieldKey::SkillsVector, "skills_embedding"),
                (FieldKey::Role, "latest_role"),
                (FieldKey::RoleVector, "latest_role_embedding"),
                (FieldKey::Title, "latest_job_title"),
                (FieldKey::TitleVector, "latest_job_title_embedding"),
                (FieldKey::Location, "preferred_and_current_cities"),
                (FieldKey::ExperienceMonths, "total_months_of_experience"),
                (FieldKey::Compensation, "expected_annual_ctc"),
            ],
        )
    }

    pub fn job() -> Self {
        Self::from_pairs(
            "job",
            [
                (FieldKey::SkillsExact, "skills"),
                (FieldKey::SkillsSoft, "skills"),
                (FieldKey::SkillsVector, "skills_embedding"),
                (FieldKey::Role, "job_role"),
                (FieldKey::RoleVector, "job_role_embedding"),
                (FieldKey::Title, "job_title"),
                (FieldKey::TitleVector, "job_title_embedding"),
                (FieldKey::Location, "location"),
                (FieldKey::ExperienceMonths, "total_months_of_experience"),
                (FieldKey::Compensation, "annual_ctc"),
            ],
        )
    }

    /// The built-in table for a document type.
    pub fn builtin(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::Candidate => Self::candidate(),
            DocumentType::Job => Self::job(),
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(key.as_str()).map(String::as_str).filter(|name| !name.trim().is_empty())
    }

    /// Like [`FieldMap::get`] but a missing entry is a build error.
    pub fn require(&self, key: FieldKey, doc_type: DocumentType) -> Result<&str, QueryBuildError> {
        self.get(key).ok_or(QueryBuildError::MissingField { doc_type, key })
    }

    /// Abstract keys this table does not map.
    pub fn missing_keys(&self) -> Vec<FieldKey> {
        FieldKey::ALL.into_iter().filter(|k| self.get(*k).is_none()).collect()
    }

    fn from_pairs<const N: usize>(schema: &str, pairs: [(FieldKey, &str); N]) -> Self {
        Self::new(schema, pairs.into_iter().map(|(k, v)| (k, v.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_every_key() {
        assert!(FieldMap::candidate().missing_keys().is_empty());
        assert!(FieldMap::job().missing_keys().is_empty());
    }

    #[test]
    fn schemas_differ_but_share_keys() {
        let c = FieldMap::builtin(DocumentType::Candidate);
        let j = FieldMap::builtin(DocumentType::Job);
        assert_eq!(c.get(FieldKey::Role), Some("latest_role"));
        assert_eq!(j.get(FieldKey::Role), Some("job_role"));
        assert_eq!(c.schema, "candidate_profile");
        assert_eq!(j.schema, "job");
    }

    #[test]
    fn blank_names_count_as_missing() {
        let mut map = FieldMap::job();
        map.fields.insert("location".into(), "  ".into());
        assert_eq!(
            map.require(FieldKey::Location, DocumentType::Job),
            Err(QueryBuildError::MissingField { doc_type: DocumentType::Job, key: FieldKey::Location })
        );
        assert_eq!(map.missing_keys(), vec![FieldKey::Location]);
    }

    #[test]
    fn deserializes_from_snake_case_keys() {
        let map: FieldMap = serde_json::from_str(
            r#"{ "schema": "intern", "fields": { "skills_exact": "skill_tags", "location": "city" } }"#,
        )
        .expect("map");
        assert_eq!(map.get(FieldKey::SkillsExact), Some("skill_tags"));
        assert_eq!(map.missing_keys().len(), 8);
    }
}
