//! Hybrid query compilation.
//!
//! Three clause groups are built independently and combined as
//! `hard AND (soft OR vector)`:
//!
//! - hard: exact skill/role/title containment (lexical and both modes),
//!   location containment and the experience/compensation ranges (every mode)
//! - soft: one weak-OR over per-value containment predicates (semantic and both)
//! - vector: one nearest-neighbor predicate per populated field, OR-ed
//!   (semantic and both)
//!
//! Alongside the expression the compiler emits the `embed(...)` inputs the
//! vector predicates reference and a 0/1 presence weight per ranking signal.

use std::collections::BTreeMap;

use talentdb_core::config::EmbeddingSettings;
use talentdb_core::error::QueryBuildError;
use talentdb_core::{CompiledQuery, DocumentType, FieldKey, FieldMap, Page, SearchCriteria};
use tracing::debug;

use crate::clauses;

/// Query tensor names referenced by the nearest-neighbor predicates.
pub const SKILLS_TENSOR: &str = "s";
pub const ROLE_TENSOR: &str = "r";
pub const TITLE_TENSOR: &str = "t";

/// Ranking-signal presence weights.
pub const SKILLS_WEIGHT: &str = "skills_weight";
pub const TITLE_WEIGHT: &str = "latest_job_title_weight";
pub const ROLE_WEIGHT: &str = "latest_role_weight";

#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    embedding: EmbeddingSettings,
}

impl QueryCompiler {
    pub fn new(embedding: EmbeddingSettings) -> Self { Self { embedding } }

    pub fn compile(
        &self,
        criteria: &SearchCriteria,
        fields: &FieldMap,
        doc_type: DocumentType,
        page: Page,
    ) -> Result<CompiledQuery, QueryBuildError> {
        let resolver = Resolver { fields, doc_type };
        let mode = criteria.mode();

        let hard = self.hard_clauses(criteria, &resolver)?;
        let (soft, vector, vector_inputs) = if mode.builds_ranked_clauses() {
            let soft = self.soft_clauses(criteria, &resolver)?;
            let (vector, inputs) = self.vector_clauses(criteria, &resolver)?;
            (soft, vector, inputs)
        } else {
            (None, None, BTreeMap::new())
        };
        debug!(%doc_type, %mode, ?hard, ?soft, ?vector, "built clause groups");

        let ranked = match (soft, vector) {
            (Some(s), Some(v)) => Some(format!("({s} OR {v})")),
            (Some(s), None) => Some(format!("({s})")),
            (None, Some(v)) => Some(format!("({v})")),
            (None, None) => None,
        };
        let combined = clauses::all_of(hard.into_iter().chain(ranked).collect())
            .ok_or(QueryBuildError::NoClauses { doc_type })?;

        let expression = format!(
            "select * from {} where {} limit {} offset {}",
            fields.schema, combined, page.limit, page.offset
        );
        debug!(%expression, "compiled query");

        Ok(CompiledQuery {
            expression,
            vector_inputs,
            feature_weights: feature_weights(criteria),
            limit: page.limit,
            offset: page.offset,
        })
    }

    fn hard_clauses(&self, c: &SearchCriteria, r: &Resolver<'_>) -> Result<Option<String>, QueryBuildError> {
        let mut parts: Vec<Option<String>> = Vec::new();
        if c.mode().builds_exact_clauses() {
            parts.push(r.contains_any(FieldKey::SkillsExact, c.skills())?);
            parts.push(r.contains_any(FieldKey::Role, c.job_roles())?);
            parts.push(r.contains_any(FieldKey::Title, c.job_titles())?);
        }
        parts.push(r.contains_any(FieldKey::Location, c.locations())?);

        if c.experience_min().is_some() || c.experience_max().is_some() {
            let field = r.name(FieldKey::ExperienceMonths)?;
            let to_months = |years: u32| u64::from(years) * 12;
            parts.push(clauses::range(field, c.experience_min().map(to_months), c.experience_max().map(to_months)));
        }
        if c.compensation_min().is_some() || c.compensation_max().is_some() {
            let field = r.name(FieldKey::Compensation)?;
            parts.push(clauses::range(field, c.compensation_min(), c.compensation_max()));
        }
        Ok(clauses::all_of(parts.into_iter().flatten().collect()))
    }

    fn soft_clauses(&self, c: &SearchCriteria, r: &Resolver<'_>) -> Result<Option<String>, QueryBuildError> {
        let mut preds = Vec::new();
        for (key, values) in [
            (FieldKey::SkillsSoft, c.skills()),
            (FieldKey::Role, c.job_roles()),
            (FieldKey::Title, c.job_titles()),
        ] {
            if values.is_empty() {
                continue;
            }
            let field = r.name(key)?;
            preds.extend(values.iter().map(|v| clauses::contains(field, v)));
        }
        Ok(clauses::weak_and(self.embedding.weak_and_target_hits, preds))
    }

    fn vector_clauses(
        &self,
        c: &SearchCriteria,
        r: &Resolver<'_>,
    ) -> Result<(Option<String>, BTreeMap<String, String>), QueryBuildError> {
        let mut preds = Vec::new();
        let mut inputs = BTreeMap::new();

        if !c.skills().is_empty() {
            // skill similarity is role-aware: roles are embedded ahead of the skills
            let text = c.job_roles().iter().chain(c.skills()).cloned().collect::<Vec<_>>().join(",");
            let index = r.name(FieldKey::SkillsVector)?;
            inputs.insert(clauses::query_input(SKILLS_TENSOR), clauses::embed(&self.embedding.skills_model, &text));
            preds.push(clauses::nearest_neighbor(index, SKILLS_TENSOR, self.embedding.vector_target_hits));
        }
        for (key, tensor, values) in [
            (FieldKey::RoleVector, ROLE_TENSOR, c.job_roles()),
            (FieldKey::TitleVector, TITLE_TENSOR, c.job_titles()),
        ] {
            if values.is_empty() {
                continue;
            }
            let index = r.name(key)?;
            inputs.insert(
                clauses::query_input(tensor),
                clauses::embed(&self.embedding.role_title_model, &values.join(" ")),
            );
            preds.push(clauses::nearest_neighbor(index, tensor, self.embedding.vector_target_hits));
        }

        let vector = if preds.is_empty() { None } else { Some(preds.join(" OR ")) };
        Ok((vector, inputs))
    }
}

/// 1 for every ranking signal the caller asked for, 0 for the rest.
pub fn feature_weights(c: &SearchCriteria) -> BTreeMap<String, u8> {
    [
        (SKILLS_WEIGHT, c.skills()),
        (TITLE_WEIGHT, c.job_titles()),
        (ROLE_WEIGHT, c.job_roles()),
    ]
    .into_iter()
    .map(|(name, values)| (clauses::query_input(name), u8::from(!values.is_empty())))
    .collect()
}

struct Resolver<'a> {
    fields: &'a FieldMap,
    doc_type: DocumentType,
}

impl Resolver<'_> {
    fn name(&self, key: FieldKey) -> Result<&str, QueryBuildError> {
        self.fields.require(key, self.doc_type)
    }

    /// Field names are only resolved for populated lists.
    fn contains_any(&self, key: FieldKey, values: &[String]) -> Result<Option<String>, QueryBuildError> {
        if values.is_empty() {
            return Ok(None);
        }
        Ok(clauses::contains_any(self.name(key)?, values))
    }
}
