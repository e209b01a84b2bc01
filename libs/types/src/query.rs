//! Paged list query types
//!
//! Sort keys, sort orders and history intervals are closed enumerations
//! parsed at the API boundary. Only `sortBy` has a documented fallback
//! (unknown values mean rank); everything else is rejected.

use crate::errors::ParamError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// First page number.
pub const FIRST_PAGE: u32 = 1;
/// Page size used when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Column a coin list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Rank,
    MarketCap,
    Price,
    Change,
}

impl SortKey {
    /// Parse a `sortBy` query value, case-insensitively.
    ///
    /// Unrecognized values fall back to [`SortKey::Rank`].
    pub fn parse_or_rank(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "marketcap" => SortKey::MarketCap,
            "price" => SortKey::Price,
            "change" => SortKey::Change,
            _ => SortKey::Rank,
        }
    }

    /// Value sent as `sortBy`.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::Rank => "rank",
            SortKey::MarketCap => "marketCap",
            SortKey::Price => "price",
            SortKey::Change => "change",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a `sortOrder` query value (`asc` / `desc`, any case).
    pub fn parse(s: &str) -> Result<Self, ParamError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ParamError::InvalidSortOrder(s.to_string())),
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// History interval. Only daily granularity exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    D1,
}

impl Interval {
    pub fn parse(s: &str) -> Result<Self, ParamError> {
        match s {
            "d1" => Ok(Interval::D1),
            other => Err(ParamError::UnsupportedInterval(other.to_string())),
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            Interval::D1 => "d1",
        }
    }
}

/// One page request against the coin list.
///
/// Bounds are not enforced on construction; the query engine validates them
/// and reports violations as caller errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub search: Option<String>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort_key: SortKey, sort_order: SortOrder) -> Self {
        self.sort_key = sort_key;
        self.sort_order = sort_order;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Search needle folded for matching; `None` when absent or blank.
    pub fn normalized_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_key: SortKey::Rank,
            sort_order: SortOrder::Asc,
            search: None,
        }
    }
}

/// Number of pages needed to hold `total_items` at `page_size` per page.
pub fn total_pages(total_items: usize, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size as usize) as u32
}
