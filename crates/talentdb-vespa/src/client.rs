use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde_json::{Map, Value};
use tracing::{debug, info};

use talentdb_core::config::BackendSettings;
use talentdb_core::error::ExecutionError;
use talentdb_core::traits::{DocumentFeeder, QueryExecutor};
use talentdb_core::{CompiledQuery, RawHit};

use crate::wire::{self, SearchResponse};

/// Added on top of the backend-side timeout so the backend reports its own
/// timeout before the connection is dropped.
const CLIENT_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// HTTP adapter for the search/document API. One connection pool is shared by
/// every request issued through a client (and its clones).
#[derive(Debug, Clone)]
pub struct VespaClient {
    http: Client,
    query_url: Url,
    feed_url: Url,
    namespace: String,
    ranking: String,
    timeout_secs: u64,
}

impl VespaClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, ExecutionError> {
        let timeout_secs = settings.timeout_secs.max(1);
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs) + CLIENT_TIMEOUT_SLACK)
            .build()
            .map_err(|err| ExecutionError::Transport(format!("http client: {err}")))?;
        Ok(Self {
            http,
            query_url: parse_url(&settings.query_url)?,
            feed_url: parse_url(&settings.feed_url)?,
            namespace: settings.namespace.clone(),
            ranking: settings.ranking.clone(),
            timeout_secs,
        })
    }

    fn search_url(&self) -> Result<Url, ExecutionError> {
        // trailing slash is significant for the search handler
        join_segments(&self.query_url, &["search", ""])
    }

    fn document_url(&self, schema: &str, id: &str) -> Result<Url, ExecutionError> {
        join_segments(&self.feed_url, &["document", "v1", &self.namespace, schema, "docid", id])
    }
}

impl QueryExecutor for VespaClient {
    async fn execute(&self, query: &CompiledQuery) -> Result<Vec<RawHit>, ExecutionError> {
        let url = self.search_url()?;
        let body = wire::search_body(query, &self.ranking, self.timeout_secs);
        debug!(%url, yql = %query.expression, "search request");

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| ExecutionError::Transport(err.to_string()))?;
        let text = success_text(response).await?;
        let parsed: SearchResponse =
            serde_json::from_str(&text).map_err(|err| ExecutionError::Decode(err.to_string()))?;
        let hits = parsed.into_hits()?;
        debug!(hits = hits.len(), "search response");
        Ok(hits)
    }
}

impl DocumentFeeder for VespaClient {
    async fn feed(&self, schema: &str, id: &str, fields: &Map<String, Value>) -> Result<(), ExecutionError> {
        let url = self.document_url(schema, id)?;
        let response = self
            .http
            .post(url)
            .json(&wire::feed_body(fields))
            .send()
            .await
            .map_err(|err| ExecutionError::Transport(err.to_string()))?;
        success_text(response).await?;
        info!(schema, id, "document fed");
        Ok(())
    }
}

async fn success_text(response: Response) -> Result<String, ExecutionError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| ExecutionError::Transport(format!("reading response body: {err}")))?;
    if !status.is_success() {
        return Err(ExecutionError::Status { status: status.as_u16(), body: text });
    }
    Ok(text)
}

fn parse_url(raw: &str) -> Result<Url, ExecutionError> {
    Url::parse(raw).map_err(|err| ExecutionError::Transport(format!("invalid backend url {raw:?}: {err}")))
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ExecutionError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ExecutionError::Transport(format!("backend url {base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
