//! Error types shared by the market service and its clients
//!
//! Caller mistakes are never clamped or corrected; they surface as one of
//! these variants.

use thiserror::Error;

/// Query engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid pagination parameters: pageNumber must be >= 1, pageSize must be 1-100 (got page {page}, size {page_size})")]
    InvalidPagination { page: u32, page_size: u32 },

    #[error("Page number out of range: requested {requested}, max page {max_page}")]
    PageOutOfRange { requested: u32, max_page: u32 },
}

/// Request parameter errors raised while parsing query strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Invalid sort order: {0} (expected asc or desc)")]
    InvalidSortOrder(String),

    #[error("Only daily interval (d1) is supported, got {0}")]
    UnsupportedInterval(String),

    #[error("Parameter {name} must be an integer, got {value}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidRange { start: i64, end: i64 },
}
