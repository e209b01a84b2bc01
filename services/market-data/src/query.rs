//! Query engine: search, sort, paginate
//!
//! Steps run in a fixed order, each a total function over its input:
//! validate bounds → filter by search needle → stable sort → page slice.

use std::cmp::Ordering;

use types::coin::CoinRecord;
use types::errors::QueryError;
use types::query::{total_pages, PageRequest, SortKey, SortOrder, FIRST_PAGE, MAX_PAGE_SIZE};

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    pub items: Vec<CoinRecord>,
    /// Size of the filtered set, not of this page.
    pub total_items: usize,
    pub total_pages: u32,
}

/// Reject out-of-bounds page numbers and sizes.
pub fn validate_bounds(request: &PageRequest) -> Result<(), QueryError> {
    if request.page < FIRST_PAGE || request.page_size < 1 || request.page_size > MAX_PAGE_SIZE {
        return Err(QueryError::InvalidPagination {
            page: request.page,
            page_size: request.page_size,
        });
    }
    Ok(())
}

/// Ascending order on the primary column only.
fn primary_cmp(key: SortKey, a: &CoinRecord, b: &CoinRecord) -> Ordering {
    match key {
        SortKey::Rank => a.rank.cmp(&b.rank),
        SortKey::MarketCap => a.market_cap_usd.total_cmp(&b.market_cap_usd),
        SortKey::Price => a.price_usd.total_cmp(&b.price_usd),
        SortKey::Change => a.change_percent_24h.total_cmp(&b.change_percent_24h),
    }
}

/// Comparator for `key`/`order`. Descending flips the primary column only;
/// ties are always broken by ascending rank, then id.
pub fn comparator(key: SortKey, order: SortOrder) -> impl Fn(&CoinRecord, &CoinRecord) -> Ordering {
    move |a, b| {
        let primary = match order {
            SortOrder::Asc => primary_cmp(key, a, b),
            SortOrder::Desc => primary_cmp(key, b, a),
        };
        primary
            .then_with(|| a.rank.cmp(&b.rank))
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Run a page request over `records`.
///
/// An empty filtered set counts as a single empty page, so page 1 yields
/// an empty result rather than an error.
pub fn query(mut records: Vec<CoinRecord>, request: &PageRequest) -> Result<QueryPage, QueryError> {
    validate_bounds(request)?;

    if let Some(needle) = request.normalized_search() {
        records.retain(|coin| coin.matches_search(&needle));
    }

    records.sort_by(comparator(request.sort_key, request.sort_order));

    let total_items = records.len();
    let total_pages = total_pages(total_items, request.page_size);
    let max_page = total_pages.max(FIRST_PAGE);

    if request.page > max_page {
        return Err(QueryError::PageOutOfRange {
            requested: request.page,
            max_page,
        });
    }

    let items = records
        .chunks(request.page_size as usize)
        .nth((request.page - 1) as usize)
        .map(|chunk| chunk.to_vec())
        .unwrap_or_default();

    Ok(QueryPage {
        items,
        total_items,
        total_pages,
    })
}
