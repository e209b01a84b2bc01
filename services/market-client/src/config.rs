//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use types::query::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the market API, e.g. `http://127.0.0.1:8080/`
    pub base_url: String,
    pub page_size: u32,
    /// Pages fetched when a stream starts or refreshes.
    pub initial_load_pages: u32,
    /// Upper bound on pages held at once; the far end is dropped beyond it.
    pub max_loaded_pages: usize,
    pub realtime_period: Duration,
    pub request_timeout: Duration,
    /// Trailing window requested for price history.
    pub history_window: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            initial_load_pages: 2,
            max_loaded_pages: 3,
            realtime_period: Duration::from_secs(20),
            request_timeout: Duration::from_secs(10),
            history_window: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}
