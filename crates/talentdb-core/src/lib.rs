#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod criteria;
pub mod error;
pub mod field_map;
pub mod pagination;
pub mod profile;
pub mod traits;
pub mod types;

pub use criteria::{SearchCriteria, SearchParams};
pub use error::{Error, Result};
pub use field_map::{FieldKey, FieldMap};
pub use pagination::{Page, PaginationPolicy};
pub use types::{CompiledQuery, DocumentType, RawHit, SearchMode};
