//! Query-string models
//!
//! Every parameter arrives as an optional string so that malformed values
//! are reported through [`AppError`](crate::error::AppError) instead of the
//! extractor's plain-text rejection.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use types::errors::ParamError;
use types::query::{Interval, PageRequest, SortKey, SortOrder, DEFAULT_PAGE_SIZE, FIRST_PAGE};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsQuery {
    pub page_number: Option<String>,
    pub page_size: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub interval: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Validated history parameters, times in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryParams {
    pub interval: Interval,
    pub start: i64,
    pub end: i64,
}

fn parse_int(name: &'static str, raw: &str) -> Result<i64, ParamError> {
    raw.trim().parse().map_err(|_| ParamError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

/// Out-of-range integers saturate so the query engine reports them as
/// pagination errors rather than silently wrapping.
fn saturating_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Whether `millis` is a calendar instant the history dates can render.
fn representable(millis: i64) -> bool {
    DateTime::<Utc>::from_timestamp_millis(millis).is_some()
}

impl AssetsQuery {
    pub fn into_page_request(self) -> Result<PageRequest, ParamError> {
        let page = match self.page_number.as_deref() {
            Some(raw) => saturating_u32(parse_int("pageNumber", raw)?),
            None => FIRST_PAGE,
        };
        let page_size = match self.page_size.as_deref() {
            Some(raw) => saturating_u32(parse_int("pageSize", raw)?),
            None => DEFAULT_PAGE_SIZE,
        };
        let sort_key = self
            .sort_by
            .as_deref()
            .map(SortKey::parse_or_rank)
            .unwrap_or_default();
        let sort_order = match self.sort_order.as_deref() {
            Some(raw) => SortOrder::parse(raw)?,
            None => SortOrder::default(),
        };

        let mut request = PageRequest::new(page, page_size).sorted(sort_key, sort_order);
        request.search = self.search;
        Ok(request)
    }
}

impl HistoryQuery {
    /// Missing bounds default to the `window_ms` ending at `now_ms`.
    pub fn into_params(self, now_ms: i64, window_ms: i64) -> Result<HistoryParams, ParamError> {
        let interval = match self.interval.as_deref() {
            Some(raw) => Interval::parse(raw)?,
            None => Interval::default(),
        };
        let end = match self.end.as_deref() {
            Some(raw) => parse_int("end", raw)?,
            None => now_ms,
        };
        let start = match self.start.as_deref() {
            Some(raw) => parse_int("start", raw)?,
            None => end.saturating_sub(window_ms),
        };
        if start > end || !representable(start) || !representable(end) {
            return Err(ParamError::InvalidRange { start, end });
        }
        Ok(HistoryParams { interval, start, end })
    }
}
