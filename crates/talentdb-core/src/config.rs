//! Lightweight configuration loader.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nesting levels).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::field_map::FieldMap;
use crate::pagination::PaginationPolicy;
use crate::types::DocumentType;

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Load from `$APP_CONFIG_DIR` (or the working directory) using `$RUST_ENV`.
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let base = env::var("APP_CONFIG_DIR").map(expand_path).unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(&base, &env_name)
    }

    pub fn load_from(base: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        tracing::debug!(env = env_name, base = %base.display(), "loading configuration");

        let config = Self { figment };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    /// Defaults overlaid with an inline TOML document; no files, no environment.
    pub fn from_toml_str(toml: &str) -> Self {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml));
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.backend.timeout_secs == 0 {
            anyhow::bail!("backend.timeout_secs must be at least 1");
        }
        match env {
            "prod" | "production" => {
                for doc_type in [DocumentType::Candidate, DocumentType::Job] {
                    let missing = settings.schemas.field_map(doc_type).missing_keys();
                    if !missing.is_empty() {
                        anyhow::bail!("schemas.{} is missing field names for {:?}", doc_type, missing);
                    }
                }
            }
            "dev" | "development" => {}
            "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

/// Typed view of the whole configuration tree. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub pagination: PaginationPolicy,
    pub embedding: EmbeddingSettings,
    pub schemas: SchemaSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub query_url: String,
    pub feed_url: String,
    pub namespace: String,
    pub ranking: String,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            query_url: "http://localhost:8080".to_string(),
            feed_url: "http://localhost:8080".to_string(),
            namespace: "default".to_string(),
            ranking: "default".to_string(),
            timeout_secs: 20,
        }
    }
}

/// Embedding models and retrieval-depth hints referenced by compiled queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub skills_model: String,
    pub role_title_model: String,
    pub vector_target_hits: u32,
    pub weak_and_target_hits: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            skills_model: "e5-small-skills-v1".to_string(),
            role_title_model: "e5-small-finetuned-role-title".to_string(),
            vector_target_hits: 10,
            weak_and_target_hits: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
    pub candidate: FieldMap,
    pub job: FieldMap,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self { candidate: FieldMap::candidate(), job: FieldMap::job() }
    }
}

impl SchemaSettings {
    pub fn field_map(&self, doc_type: DocumentType) -> &FieldMap {
        match doc_type {
            DocumentType::Candidate => &self.candidate,
            DocumentType::Job => &self.job,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_map::FieldKey;

    #[test]
    fn empty_config_is_all_defaults() {
        let settings = Config::from_toml_str("").settings().expect("settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pagination.max_page_size, 400);
        assert_eq!(settings.backend.timeout_secs, 20);
        assert_eq!(settings.schemas.field_map(DocumentType::Job).schema, "job");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml_str(
            r#"
            [backend]
            query_url = "http://vespa:8080"

            [embedding]
            vector_target_hits = 25
            "#,
        );
        let settings = config.settings().expect("settings");
        assert_eq!(settings.backend.query_url, "http://vespa:8080");
        assert_eq!(settings.backend.ranking, "default");
        assert_eq!(settings.embedding.vector_target_hits, 25);
        assert_eq!(settings.embedding.skills_model, "e5-small-skills-v1");
        let url: String = config.get("backend.query_url").expect("key");
        assert_eq!(url, "http://vespa:8080");
    }

    #[test]
    fn schema_table_overlays_builtin() {
        let config = Config::from_toml_str(
            r#"
            [schemas.job]
            schema = "internship"
            [schemas.job.fields]
            skills_exact = "skill_tags"
            "#,
        );
        let settings = config.settings().expect("settings");
        let job = settings.schemas.field_map(DocumentType::Job);
        assert_eq!(job.schema, "internship");
        assert_eq!(job.get(FieldKey::SkillsExact), Some("skill_tags"));
        // untouched keys keep their built-in names
        assert_eq!(job.get(FieldKey::SkillsSoft), Some("skills"));
        assert_eq!(settings.schemas.candidate, FieldMap::candidate());
    }

    #[test]
    fn expand_path_handles_env_vars() {
        std::env::set_var("TALENTDB_TEST_DIR", "/srv/talentdb");
        assert_eq!(expand_path("${TALENTDB_TEST_DIR}/conf"), PathBuf::from("/srv/talentdb/conf"));
    }
}
