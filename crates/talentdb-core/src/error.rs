use thiserror::Error;

use crate::field_map::FieldKey;
use crate::types::DocumentType;

/// Malformed or contradictory filter input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} contains an empty value")]
    EmptyValue { field: &'static str },

    #[error("{field} must not be negative")]
    NegativeValue { field: &'static str },

    #[error("{field} is out of range, got {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("experienceMin ({min}) cannot be greater than experienceMax ({max})")]
    ExperienceRange { min: u32, max: u32 },

    #[error("compensationMin ({min}) cannot be greater than compensationMax ({max})")]
    CompensationRange { min: f64, max: f64 },

    #[error("no filter provided: at least one of skills, jobRoles, jobTitles or locations is required")]
    NoFilterProvided,
}

/// Bad page parameters or a request that reads too deep into the result set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("{param} must be an integer, got '{value}'")]
    NotAnInteger { param: &'static str, value: String },

    #[error("{param} must be positive, got {value}")]
    NonPositive { param: &'static str, value: i64 },

    #[error("page size {size} is out of range [1, {max}]")]
    PageSizeOutOfRange { size: i64, max: u32 },

    #[error("offset {offset} exceeds the maximum of {max}")]
    OffsetTooLarge { offset: u64, max: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryBuildError {
    #[error("field map for {doc_type} has no entry for '{key}'")]
    MissingField { doc_type: DocumentType, key: FieldKey },

    #[error("no clause could be built for {doc_type}")]
    NoClauses { doc_type: DocumentType },
}

/// Failures talking to the external search engine.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("search backend unreachable: {0}")]
    Transport(String),

    #[error("search backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode search backend response: {0}")]
    Decode(String),

    #[error("search backend reported errors: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot format hit {}: {reason}", hit_id.as_deref().unwrap_or("<unknown>"))]
pub struct ResultFormatError {
    pub hit_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    QueryBuild(#[from] QueryBuildError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    ResultFormat(#[from] ResultFormatError),
}

pub type Result<T> = std::result::Result<T, Error>;
