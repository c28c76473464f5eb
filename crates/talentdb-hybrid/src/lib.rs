//! Request pipeline: validate, paginate, compile, execute, format.
//!
//! [`SearchService`] is generic over the backend seam so the same pipeline
//! runs against the HTTP adapter in production and an in-memory fake in tests.

use serde_json::{Map, Value};
use tracing::{debug, info};

use talentdb_core::config::{SchemaSettings, Settings};
use talentdb_core::profile::CandidateProfile;
use talentdb_core::traits::{DocumentFeeder, QueryExecutor};
use talentdb_core::{CompiledQuery, DocumentType, Page, PaginationPolicy, Result, SearchCriteria, SearchParams};
use talentdb_format::{ResultFormatter, TypedResult};
use talentdb_query::QueryCompiler;

pub struct SearchService<B> {
    backend: B,
    compiler: QueryCompiler,
    pagination: PaginationPolicy,
    schemas: SchemaSettings,
    formatter: ResultFormatter,
}

impl<B> SearchService<B> {
    pub fn new(settings: &Settings, backend: B) -> Self {
        Self {
            backend,
            compiler: QueryCompiler::new(settings.embedding.clone()),
            pagination: settings.pagination,
            schemas: settings.schemas.clone(),
            formatter: ResultFormatter,
        }
    }

    pub fn backend(&self) -> &B { &self.backend }

    /// Validate and paginate a raw request, then compile it without executing.
    pub fn prepare(
        &self,
        params: SearchParams,
        doc_type: DocumentType,
        page_number: &str,
        page_size: &str,
    ) -> Result<CompiledQuery> {
        let criteria = SearchCriteria::validate(params)?;
        let page = self.pagination.compute(page_number, page_size)?;
        self.compile(&criteria, doc_type, page)
    }

    pub fn compile(&self, criteria: &SearchCriteria, doc_type: DocumentType, page: Page) -> Result<CompiledQuery> {
        let query = self.compiler.compile(criteria, self.schemas.field_map(doc_type), doc_type, page)?;
        debug!(%doc_type, yql = %query.expression, "compiled query");
        Ok(query)
    }
}

impl<B> SearchService<B> where B: QueryExecutor {
    /// Full pipeline for one request. Results keep backend rank order.
    pub async fn search(
        &self,
        params: SearchParams,
        doc_type: DocumentType,
        page_number: &str,
        page_size: &str,
    ) -> Result<Vec<TypedResult>> {
        let query = self.prepare(params, doc_type, page_number, page_size)?;
        self.run(&query, doc_type).await
    }

    pub async fn search_criteria(
        &self,
        criteria: &SearchCriteria,
        doc_type: DocumentType,
        page: Page,
    ) -> Result<Vec<TypedResult>> {
        let query = self.compile(criteria, doc_type, page)?;
        self.run(&query, doc_type).await
    }

    async fn run(&self, query: &CompiledQuery, doc_type: DocumentType) -> Result<Vec<TypedResult>> {
        let hits = self.backend.execute(query).await?;
        let results = self.formatter.format(&hits, doc_type)?;
        info!(%doc_type, limit = query.limit, offset = query.offset, results = results.len(), "search complete");
        Ok(results)
    }
}

impl<B> SearchService<B> where B: DocumentFeeder {
    /// Feed a parsed candidate profile, adding the derived index fields.
    /// Returns the document id.
    pub async fn feed_candidate(&self, profile: CandidateProfile, actor: &str) -> Result<String> {
        let id = profile.id.clone();
        let fields = profile.into_feed_fields(chrono::Utc::now().timestamp(), actor);
        self.feed(DocumentType::Candidate, &id, &fields).await?;
        Ok(id)
    }

    /// Feed pre-built fields for any document type.
    pub async fn feed(&self, doc_type: DocumentType, id: &str, fields: &Map<String, Value>) -> Result<()> {
        let schema = &self.schemas.field_map(doc_type).schema;
        self.backend.feed(schema, id, fields).await?;
        info!(%doc_type, id, "fed document");
        Ok(())
    }
}
