//! HTTP adapter for a Vespa-style search engine.
//!
//! [`VespaClient`] implements both backend seams from `talentdb-core`:
//! query execution against `/search/` and document puts against
//! `/document/v1/{namespace}/{schema}/docid/{id}`.

pub mod client;
pub mod wire;

pub use client::VespaClient;
