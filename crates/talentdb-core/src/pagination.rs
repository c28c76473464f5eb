use serde::{Deserialize, Serialize};

use crate::error::PaginationError;

pub const DEFAULT_MAX_PAGE_SIZE: u32 = 400;
pub const DEFAULT_MAX_OFFSET: u64 = 1000;

/// A bounded window into the ranked result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

/// Turns a 1-based page number and a page size into `(limit, offset)`.
///
/// `limit = page_number * page_size`, `offset = limit - page_size`; requests
/// whose offset exceeds `max_offset` are refused rather than served slowly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationPolicy {
    pub max_page_size: u32,
    pub max_offset: u64,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self { max_page_size: DEFAULT_MAX_PAGE_SIZE, max_offset: DEFAULT_MAX_OFFSET }
    }
}

impl PaginationPolicy {
    /// Parse string inputs (query-string style) and compute the page.
    pub fn compute(&self, page_number: &str, page_size: &str) -> Result<Page, PaginationError> {
        let number = parse_int("pageNumber", page_number)?;
        let size = parse_int("pageSize", page_size)?;
        self.compute_numbers(number, size)
    }

    pub fn compute_numbers(&self, page_number: i64, page_size: i64) -> Result<Page, PaginationError> {
        if page_number <= 0 {
            return Err(PaginationError::NonPositive { param: "pageNumber", value: page_number });
        }
        if page_size <= 0 {
            return Err(PaginationError::NonPositive { param: "pageSize", value: page_size });
        }
        let size = u32::try_from(page_size)
            .ok()
            .filter(|s| *s <= self.max_page_size)
            .ok_or(PaginationError::PageSizeOutOfRange { size: page_size, max: self.max_page_size })?;

        // page_number is positive here, so the conversion cannot fail.
        let number = page_number.unsigned_abs();
        let limit = number.checked_mul(u64::from(size)).ok_or(PaginationError::OffsetTooLarge {
            offset: u64::MAX,
            max: self.max_offset,
        })?;
        let offset = limit - u64::from(size);
        if offset > self.max_offset {
            return Err(PaginationError::OffsetTooLarge { offset, max: self.max_offset });
        }
        Ok(Page { limit, offset })
    }
}

fn parse_int(param: &'static str, raw: &str) -> Result<i64, PaginationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| PaginationError::NotAnInteger { param, value: raw.to_string() })
}
