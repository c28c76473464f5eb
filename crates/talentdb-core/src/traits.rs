//! Seams to the external search engine.
//!
//! Both traits are implemented by the HTTP adapter in `talentdb-vespa`; tests
//! and alternative backends can supply their own.

use serde_json::{Map, Value};
use std::future::Future;

use crate::error::ExecutionError;
use crate::types::{CompiledQuery, RawHit};

pub trait QueryExecutor: Send + Sync {
    /// Run a compiled query and return the ranked hits in backend order.
    fn execute(&self, query: &CompiledQuery) -> impl Future<Output = Result<Vec<RawHit>, ExecutionError>> + Send;
}

pub trait DocumentFeeder: Send + Sync {
    /// Store (or replace) document `id` in `schema`.
    fn feed(
        &self,
        schema: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = Result<(), ExecutionError>> + Send;
}
