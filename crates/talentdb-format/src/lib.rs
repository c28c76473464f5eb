//! Maps raw backend hits onto typed, per-schema result records.

pub mod formatter;
pub mod records;
pub mod timestamp;

pub use formatter::ResultFormatter;
pub use records::{CandidateResult, JobResult, TypedResult};
