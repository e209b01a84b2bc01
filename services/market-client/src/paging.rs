//! Cursor-style paging over the coin list
//!
//! [`CoinPagingSource`] turns "page N under a fixed sort/search" calls into
//! pages with previous/next keys. [`PagingState`] is the window of loaded
//! pages the UI is scrolling through, plus the position last viewed.

use std::sync::Arc;

use types::coin::CoinRecord;
use types::query::{PageRequest, FIRST_PAGE};

use crate::api::MarketApi;
use crate::error::ClientError;

/// One loaded page. Keys are page numbers; `None` marks either end.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub key: u32,
    pub data: Vec<CoinRecord>,
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
}

/// Loads pages for one fixed sort key, order, search string and page size.
pub struct CoinPagingSource {
    api: Arc<dyn MarketApi>,
    template: PageRequest,
}

impl CoinPagingSource {
    pub fn new(api: Arc<dyn MarketApi>, template: PageRequest) -> Self {
        Self { api, template }
    }

    pub fn page_size(&self) -> u32 {
        self.template.page_size
    }

    /// Load page `key` (the first page when `None`).
    ///
    /// A page past the end of the set is the end of data, not an error: the
    /// set can shrink between two loads as search results change.
    pub async fn load(&self, key: Option<u32>) -> Result<Page, ClientError> {
        let key = key.unwrap_or(FIRST_PAGE).max(FIRST_PAGE);
        let prev_key = (key > FIRST_PAGE).then(|| key - 1);

        let request = PageRequest {
            page: key,
            ..self.template.clone()
        };

        match self.api.list_assets(&request).await {
            Ok(list) => {
                let page_size = self.page_size() as usize;
                let seen = key as usize * page_size;
                let at_end = list.items.len() < page_size || seen >= list.total_items;
                Ok(Page {
                    key,
                    data: list.items,
                    prev_key,
                    next_key: (!at_end).then(|| key + 1),
                })
            }
            Err(ClientError::PageOutOfRange { .. }) if key > FIRST_PAGE => Ok(Page {
                key,
                data: Vec::new(),
                prev_key,
                next_key: None,
            }),
            Err(err) => Err(err),
        }
    }
}

/// Loaded pages in key order plus the index of the item last viewed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagingState {
    pub pages: Vec<Page>,
    pub anchor_position: Option<usize>,
}

impl PagingState {
    pub fn items(&self) -> impl Iterator<Item = &CoinRecord> {
        self.pages.iter().flat_map(|page| page.data.iter())
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|page| page.data.len()).sum()
    }

    pub fn item(&self, position: usize) -> Option<&CoinRecord> {
        self.items().nth(position)
    }

    /// Next key after the last loaded page.
    pub fn next_key(&self) -> Option<u32> {
        self.pages.last().and_then(|page| page.next_key)
    }

    /// Previous key before the first loaded page.
    pub fn prev_key(&self) -> Option<u32> {
        self.pages.first().and_then(|page| page.prev_key)
    }

    /// Number of items held in pages before `pages[index]`.
    fn offset_of(&self, index: usize) -> usize {
        self.pages[..index].iter().map(|page| page.data.len()).sum()
    }

    /// The page holding `position`, or the nearest end page when the
    /// position lies beyond the loaded items.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page> {
        let mut seen = 0;
        for page in &self.pages {
            seen += page.data.len();
            if position < seen {
                return Some(page);
            }
        }
        self.pages.last()
    }

    /// Key of the page around the anchor, so a reload keeps the user's place.
    pub fn refresh_key(&self) -> Option<u32> {
        let anchor = self.anchor_position?;
        let page = self.closest_page_to_position(anchor)?;
        page.prev_key
            .map(|key| key + 1)
            .or_else(|| page.next_key.map(|key| key - 1))
    }

    /// Add a page after the window, dropping pages from the front beyond
    /// `max_pages`. The anchor moves with the items it points at.
    pub fn append(&mut self, page: Page, max_pages: usize) {
        self.pages.push(page);
        while self.pages.len() > max_pages.max(1) {
            let dropped = self.pages.remove(0);
            self.anchor_position = self
                .anchor_position
                .map(|pos| pos.saturating_sub(dropped.data.len()));
        }
    }

    /// Add a page before the window, dropping pages from the back beyond
    /// `max_pages`.
    pub fn prepend(&mut self, page: Page, max_pages: usize) {
        let added = page.data.len();
        self.pages.insert(0, page);
        self.pages.truncate(max_pages.max(1));
        self.anchor_position = self.anchor_position.map(|pos| pos + added);
    }

    /// Replace the window with `pages`, loaded starting at `key`. The anchor
    /// keeps its distance from the start of that page.
    pub fn replace_from(&mut self, key: u32, pages: Vec<Page>) {
        let start = self
            .pages
            .iter()
            .position(|page| page.key == key)
            .map(|index| self.offset_of(index));
        self.anchor_position = match (self.anchor_position, start) {
            (Some(pos), Some(start)) => Some(pos.saturating_sub(start)),
            (anchor, None) => anchor.map(|_| 0),
            (None, _) => None,
        };
        self.pages = pages;
    }

    /// Swap in fresher copies of loaded coins, matched by id.
    pub fn apply_updates(&mut self, updates: &[CoinRecord]) {
        for page in &mut self.pages {
            for coin in &mut page.data {
                if let Some(fresh) = updates.iter().find(|u| u.id == coin.id) {
                    *coin = fresh.clone();
                }
            }
        }
    }
}
