//! Controller behavior against an in-memory market
//!
//! Time is paused, so slow responses and the realtime period cost nothing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use market_client::{
    ClientConfig, ClientError, Effect, ListPage, MarketApi, MarketController, MarketFilter,
    MarketState,
};
use market_data::query::query;
use market_data::seed::initial_coins;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::time::{sleep, timeout};
use types::coin::{CoinRecord, HistoryPoint};
use types::errors::QueryError;
use types::query::{PageRequest, SortKey, SortOrder};

const UPDATED_MARKER: f64 = -1.0;

#[derive(Default)]
struct FakeApi {
    coins: Vec<CoinRecord>,
    delays: Mutex<HashMap<SortKey, Duration>>,
    fail_lists: AtomicBool,
    fail_ids: Mutex<HashSet<String>>,
    list_calls: AtomicUsize,
    asset_calls: AtomicUsize,
    history_windows: Mutex<Vec<(i64, i64)>>,
}

impl FakeApi {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            coins: initial_coins(97, &mut ChaCha8Rng::seed_from_u64(11)),
            ..Self::default()
        })
    }

    fn delay(&self, key: SortKey, delay: Duration) {
        self.delays.lock().unwrap().insert(key, delay);
    }

    fn expected_ids(&self, request: &PageRequest) -> Vec<String> {
        query(self.coins.clone(), request)
            .unwrap()
            .items
            .iter()
            .map(|c| c.id.to_string())
            .collect()
    }
}

#[async_trait]
impl MarketApi for FakeApi {
    async fn list_assets(&self, request: &PageRequest) -> Result<ListPage, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().get(&request.sort_key).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                message: "unavailable".to_string(),
            });
        }
        match query(self.coins.clone(), request) {
            Ok(page) => Ok(ListPage {
                items: page.items,
                total_items: page.total_items,
            }),
            Err(QueryError::PageOutOfRange { max_page, .. }) => {
                Err(ClientError::PageOutOfRange { max_page })
            }
            Err(err) => Err(ClientError::Status {
                status: 400,
                message: err.to_string(),
            }),
        }
    }

    async fn asset(&self, id: &str) -> Result<CoinRecord, ClientError> {
        self.asset_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.fail_ids.lock().unwrap().contains(id);
        let found = self.coins.iter().find(|c| c.id.as_str() == id);
        match found {
            Some(coin) if !failing => {
                let mut fresh = coin.clone();
                fresh.vwap_24h = UPDATED_MARKER;
                Ok(fresh)
            }
            _ => Err(ClientError::Status {
                status: 404,
                message: format!("Coin {id} not found"),
            }),
        }
    }

    async fn history(&self, _id: &str, start: i64, end: i64) -> Result<Vec<HistoryPoint>, ClientError> {
        self.history_windows.lock().unwrap().push((start, end));
        Ok(Vec::new())
    }
}

fn controller(api: &Arc<FakeApi>) -> MarketController {
    MarketController::new(api.clone(), ClientConfig::default())
}

async fn wait_until(ctl: &MarketController, pred: impl FnMut(&MarketState) -> bool) -> MarketState {
    let mut rx = ctl.subscribe();
    let state = timeout(Duration::from_secs(600), rx.wait_for(pred))
        .await
        .expect("state never matched")
        .expect("state channel closed")
        .clone();
    state
}

async fn settled(ctl: &MarketController) -> MarketState {
    wait_until(ctl, |s| !s.is_loading).await
}

fn ids(state: &MarketState) -> Vec<String> {
    state.items().iter().map(|c| c.id.to_string()).collect()
}

fn keys(state: &MarketState) -> Vec<u32> {
    state.paging.pages.iter().map(|p| p.key).collect()
}

fn first_pages(api: &FakeApi, key: SortKey, order: SortOrder) -> Vec<String> {
    api.expected_ids(&PageRequest::new(1, 40).sorted(key, order))
}

#[tokio::test(start_paused = true)]
async fn test_initial_load_is_market_cap_descending() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    ctl.start().await;

    let state = settled(&ctl).await;
    assert_eq!(state.filter, MarketFilter::MarketCap);
    assert_eq!(state.generation, 1);
    assert_eq!(keys(&state), vec![1, 2]);
    assert_eq!(ids(&state), first_pages(&api, SortKey::MarketCap, SortOrder::Desc));
    assert_eq!(ids(&state)[0], "bitcoin");
    assert!(!state.is_error);
}

#[tokio::test(start_paused = true)]
async fn test_switching_sort_drops_the_stale_stream() {
    let api = FakeApi::new();
    api.delay(SortKey::MarketCap, Duration::from_secs(10));
    let ctl = controller(&api);

    ctl.start().await;
    sleep(Duration::from_secs(1)).await;
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);

    ctl.select_change().await;
    let state = settled(&ctl).await;
    let expected = first_pages(&api, SortKey::Change, SortOrder::Desc);
    assert_eq!(state.filter, MarketFilter::ChangePercent24h);
    assert_eq!(state.generation, 2);
    assert_eq!(ids(&state), expected);

    // Long after the cancelled response would have arrived.
    sleep(Duration::from_secs(60)).await;
    let later = ctl.state();
    assert_eq!(ids(&later), expected);
    assert_eq!(later.generation, 2);
    assert_eq!(later.filter, MarketFilter::ChangePercent24h);
}

#[tokio::test(start_paused = true)]
async fn test_price_toggles_and_remembers_direction() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    ctl.start().await;
    settled(&ctl).await;

    ctl.select_price().await;
    let state = settled(&ctl).await;
    assert!(state.price_ascending);
    assert_eq!(ids(&state), first_pages(&api, SortKey::Price, SortOrder::Asc));

    ctl.select_price().await;
    let state = settled(&ctl).await;
    assert!(!state.price_ascending);
    assert_eq!(ids(&state), first_pages(&api, SortKey::Price, SortOrder::Desc));

    ctl.select_market_cap().await;
    settled(&ctl).await;
    ctl.select_price().await;
    let state = settled(&ctl).await;
    assert_eq!(state.filter, MarketFilter::Price);
    assert!(!state.price_ascending);
    assert_eq!(state.generation, 5);
}

#[tokio::test(start_paused = true)]
async fn test_search_restarts_with_same_sort() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    ctl.select_price().await;
    ctl.select_price().await;
    settled(&ctl).await;

    ctl.set_search_mode(true).await;
    ctl.set_search("Crypto-1").await;
    let state = settled(&ctl).await;
    assert!(state.is_search);
    assert_eq!(state.search, "Crypto-1");
    assert_eq!(state.sort(), (SortKey::Price, SortOrder::Desc));
    // crypto-1 and crypto-10..=19
    assert_eq!(state.paging.item_count(), 11);
    assert_eq!(state.paging.next_key(), None);
    assert!(ids(&state).iter().all(|id| id.starts_with("crypto-1")));

    ctl.set_search_mode(false).await;
    let state = settled(&ctl).await;
    assert!(!state.is_search);
    assert!(state.search.is_empty());
    assert_eq!(state.paging.item_count(), 40);
}

#[tokio::test(start_paused = true)]
async fn test_paging_window_and_refresh_keep_place() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    ctl.start().await;
    settled(&ctl).await;

    ctl.load_next().await;
    wait_until(&ctl, |s| s.paging.pages.len() == 3).await;
    ctl.load_next().await;
    let state = wait_until(&ctl, |s| s.paging.pages.first().map(|p| p.key) == Some(2)).await;
    assert_eq!(keys(&state), vec![2, 3, 4]);
    assert_eq!(state.paging.prev_key(), Some(1));

    ctl.update_range(25, 27).await;
    let state = wait_until(&ctl, |s| {
        s.paging.item(27).map(|c| c.vwap_24h) == Some(UPDATED_MARKER)
    })
    .await;
    assert_eq!(state.paging.anchor_position, Some(25));
    assert_eq!(state.paging.refresh_key(), Some(3));

    ctl.refresh().await;
    let state = wait_until(&ctl, |s| keys(s) == vec![3, 4]).await;
    assert_eq!(state.paging.anchor_position, Some(5));

    ctl.load_previous().await;
    let state = wait_until(&ctl, |s| keys(s) == vec![2, 3, 4]).await;
    assert_eq!(state.paging.anchor_position, Some(25));
}

#[tokio::test(start_paused = true)]
async fn test_update_range_keeps_successes_and_flags_failures() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    ctl.start().await;
    let state = settled(&ctl).await;
    let broken = ids(&state)[1].clone();
    api.fail_ids.lock().unwrap().insert(broken);

    ctl.update_range(0, 2).await;
    let state = wait_until(&ctl, |s| s.is_error).await;
    assert_eq!(state.paging.item(0).unwrap().vwap_24h, UPDATED_MARKER);
    assert_ne!(state.paging.item(1).unwrap().vwap_24h, UPDATED_MARKER);
    assert_eq!(state.paging.item(2).unwrap().vwap_24h, UPDATED_MARKER);

    ctl.set_error(false);
    assert!(!ctl.state().is_error);
}

#[tokio::test(start_paused = true)]
async fn test_update_range_outside_loaded_items_is_a_no_op() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    ctl.start().await;
    let before = settled(&ctl).await;

    ctl.update_range(10, 400).await;
    ctl.update_range(5, 3).await;
    sleep(Duration::from_secs(1)).await;

    assert_eq!(api.asset_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ctl.state(), before);
}

#[tokio::test(start_paused = true)]
async fn test_load_failure_sets_error_and_refresh_recovers() {
    let api = FakeApi::new();
    api.fail_lists.store(true, Ordering::SeqCst);
    let ctl = controller(&api);
    ctl.start().await;

    let state = settled(&ctl).await;
    assert!(state.is_error);
    assert_eq!(state.paging.item_count(), 0);

    api.fail_lists.store(false, Ordering::SeqCst);
    ctl.set_error(false);
    ctl.refresh().await;
    let state = wait_until(&ctl, |s| s.paging.item_count() == 40).await;
    assert!(!state.is_error);
    assert_eq!(keys(&state), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_realtime_ticks_drive_refresh_and_stop_cleanly() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    let mut effects = ctl.effects();
    ctl.start().await;
    settled(&ctl).await;
    let calls = api.list_calls.load(Ordering::SeqCst);

    ctl.start_realtime().await;
    assert!(ctl.is_realtime_running().await);
    let effect = effects.recv().await.unwrap();
    assert_eq!(effect, Effect::RefreshData);
    ctl.handle_effect(effect).await;
    wait_until(&ctl, |_| api.list_calls.load(Ordering::SeqCst) >= calls + 2).await;

    sleep(Duration::from_secs(21)).await;
    assert_eq!(effects.try_recv().unwrap(), Effect::RefreshData);

    ctl.stop_realtime().await;
    assert!(!ctl.is_realtime_running().await);
    sleep(Duration::from_secs(100)).await;
    assert!(effects.try_recv().is_err());

    // The paging stream outlives the ticker.
    ctl.load_next().await;
    wait_until(&ctl, |s| s.paging.pages.len() == 3).await;
}

#[tokio::test(start_paused = true)]
async fn test_restarting_realtime_does_not_leak_tickers() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    let mut effects = ctl.effects();

    ctl.start_realtime().await;
    ctl.start_realtime().await;
    sleep(Duration::from_millis(10)).await;
    while effects.try_recv().is_ok() {}

    sleep(Duration::from_secs(61)).await;
    let mut ticks = 0;
    while effects.try_recv().is_ok() {
        ticks += 1;
    }
    assert_eq!(ticks, 3);

    // Replacing the stream leaves the ticker alone.
    ctl.select_change().await;
    assert!(ctl.is_realtime_running().await);
    ctl.shutdown().await;
    assert!(!ctl.is_realtime_running().await);
}

#[tokio::test(start_paused = true)]
async fn test_history_requests_trailing_week() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    ctl.history("bitcoin").await.unwrap();

    let windows = api.history_windows.lock().unwrap().clone();
    assert_eq!(windows.len(), 1);
    let (start, end) = windows[0];
    assert_eq!(end - start, 7 * 86_400_000);
}

#[tokio::test(start_paused = true)]
async fn test_commands_without_a_stream_are_ignored() {
    let api = FakeApi::new();
    let ctl = controller(&api);
    ctl.load_next().await;
    ctl.refresh().await;
    sleep(Duration::from_secs(1)).await;
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ctl.state(), MarketState::default());
}
