//! Market API access
//!
//! [`MarketApi`] is the seam between the paging pipeline and the network.
//! [`HttpMarketApi`] talks to the gateway over HTTP; tests plug in their own
//! implementations.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use types::coin::{CoinRecord, HistoryPoint};
use types::envelope::ResponseEnvelope;
use types::query::{Interval, PageRequest};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// One list response: the page items plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub items: Vec<CoinRecord>,
    pub total_items: usize,
}

#[async_trait]
pub trait MarketApi: Send + Sync {
    async fn list_assets(&self, request: &PageRequest) -> Result<ListPage, ClientError>;

    async fn asset(&self, id: &str) -> Result<CoinRecord, ClientError>;

    /// Daily history between `start` and `end` (Unix ms).
    async fn history(&self, id: &str, start: i64, end: i64) -> Result<Vec<HistoryPoint>, ClientError>;
}

/// `(start, end)` in Unix ms for a window of `window` ending at `now_ms`.
pub fn trailing_window(now_ms: i64, window: Duration) -> (i64, i64) {
    let span = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
    (now_ms.saturating_sub(span), now_ms)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    message: String,
    max_page: Option<u32>,
}

pub struct HttpMarketApi {
    client: Client,
    base_url: Url,
}

impl HttpMarketApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<ResponseEnvelope<T>, ClientError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(status_error(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            max_page: Some(max_page),
            ..
        }) if status == StatusCode::BAD_REQUEST => ClientError::PageOutOfRange { max_page },
        Ok(err) => ClientError::Status {
            status: status.as_u16(),
            message: err.message,
        },
        Err(_) => ClientError::Status {
            status: status.as_u16(),
            message: String::from_utf8_lossy(body).into_owned(),
        },
    }
}

#[async_trait]
impl MarketApi for HttpMarketApi {
    async fn list_assets(&self, request: &PageRequest) -> Result<ListPage, ClientError> {
        let mut url = self.endpoint("assets")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("pageNumber", &request.page.to_string())
                .append_pair("pageSize", &request.page_size.to_string())
                .append_pair("sortBy", request.sort_key.as_param())
                .append_pair("sortOrder", request.sort_order.as_param());
            if let Some(search) = request.normalized_search() {
                query.append_pair("search", &search);
            }
        }

        let envelope = self.fetch::<Vec<CoinRecord>>(url).await?;
        Ok(ListPage {
            total_items: envelope.info.coins_num,
            items: envelope.into_data(),
        })
    }

    async fn asset(&self, id: &str) -> Result<CoinRecord, ClientError> {
        let mut url = self.endpoint("assets")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .push(id);
        Ok(self.fetch::<CoinRecord>(url).await?.into_data())
    }

    async fn history(&self, id: &str, start: i64, end: i64) -> Result<Vec<HistoryPoint>, ClientError> {
        let mut url = self.endpoint("assets")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .push(id)
            .push("history");
        url.query_pairs_mut()
            .append_pair("interval", Interval::D1.as_param())
            .append_pair("start", &start.to_string())
            .append_pair("end", &end.to_string());
        Ok(self.fetch::<Vec<HistoryPoint>>(url).await?.into_data())
    }
}
