//! Retrieval orchestrator
//!
//! Owns the single live paging stream. Every sort, filter or search change
//! replaces the stream: the old task is cancelled and awaited before the new
//! generation is published, and every write a stream makes is checked
//! against its generation, so a response from a replaced stream is dropped
//! rather than merely outraced.
//!
//! ```text
//!   UI ──select/search──► restart ──cancel+join──► old stream
//!                            │
//!                            └──spawn──► PagingStream ──► MarketApi
//!                                             │
//!   UI ◄──watch::Receiver<MarketState>────────┘
//!   UI ◄──broadcast::Receiver<Effect>──── realtime ticker
//! ```

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use types::coin::{CoinRecord, HistoryPoint};
use types::ids::CoinId;
use types::query::{PageRequest, SortKey, SortOrder, FIRST_PAGE};

use crate::api::{trailing_window, MarketApi};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::paging::{CoinPagingSource, PagingState};
use crate::realtime::{spawn_ticker, Effect, RealtimeHandle};

const EFFECT_CAPACITY: usize = 16;

/// Sort choices offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketFilter {
    #[default]
    MarketCap,
    ChangePercent24h,
    Price,
}

/// Everything the list screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketState {
    pub filter: MarketFilter,
    /// Remembered direction of the price sort, kept while other filters
    /// are active.
    pub price_ascending: bool,
    pub search: String,
    pub is_search: bool,
    pub is_loading: bool,
    pub is_error: bool,
    pub paging: PagingState,
    /// Bumped each time the paging stream is replaced.
    pub generation: u64,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            filter: MarketFilter::default(),
            price_ascending: true,
            search: String::new(),
            is_search: false,
            is_loading: false,
            is_error: false,
            paging: PagingState::default(),
            generation: 0,
        }
    }
}

impl MarketState {
    pub fn sort(&self) -> (SortKey, SortOrder) {
        match self.filter {
            MarketFilter::MarketCap => (SortKey::MarketCap, SortOrder::Desc),
            MarketFilter::ChangePercent24h => (SortKey::Change, SortOrder::Desc),
            MarketFilter::Price if self.price_ascending => (SortKey::Price, SortOrder::Asc),
            MarketFilter::Price => (SortKey::Price, SortOrder::Desc),
        }
    }

    pub fn page_request(&self, page_size: u32) -> PageRequest {
        let (key, order) = self.sort();
        let request = PageRequest::new(FIRST_PAGE, page_size).sorted(key, order);
        if self.search.trim().is_empty() {
            request
        } else {
            request.with_search(self.search.clone())
        }
    }

    pub fn items(&self) -> Vec<&CoinRecord> {
        self.paging.items().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamCommand {
    LoadNext,
    LoadPrevious,
    Refresh,
    UpdateRange { first: usize, last: usize },
}

struct StreamHandle {
    cancellation_token: CancellationToken,
    join_handle: JoinHandle<()>,
    commands: mpsc::UnboundedSender<StreamCommand>,
}

impl StreamHandle {
    async fn stop(self) {
        self.cancellation_token.cancel();
        let _ = self.join_handle.await;
    }
}

pub struct MarketController {
    api: Arc<dyn MarketApi>,
    config: ClientConfig,
    state: Arc<watch::Sender<MarketState>>,
    effects: broadcast::Sender<Effect>,
    stream: Mutex<Option<StreamHandle>>,
    realtime: Mutex<Option<RealtimeHandle>>,
}

impl MarketController {
    /// Create an idle controller; call [`start`](Self::start) to begin loading.
    pub fn new(api: Arc<dyn MarketApi>, config: ClientConfig) -> Self {
        let (effects, _) = broadcast::channel(EFFECT_CAPACITY);
        Self {
            api,
            config,
            state: Arc::new(watch::Sender::new(MarketState::default())),
            effects,
            stream: Mutex::new(None),
            realtime: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MarketState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MarketState {
        self.state.borrow().clone()
    }

    pub fn effects(&self) -> broadcast::Receiver<Effect> {
        self.effects.subscribe()
    }

    /// Start streaming with the current filter and search.
    pub async fn start(&self) {
        self.restart(|_| {}).await;
    }

    pub async fn select_market_cap(&self) {
        self.restart(|s| s.filter = MarketFilter::MarketCap).await;
    }

    pub async fn select_change(&self) {
        self.restart(|s| s.filter = MarketFilter::ChangePercent24h).await;
    }

    /// Switch to the price sort in its remembered direction, or flip the
    /// direction when price is already active.
    pub async fn select_price(&self) {
        self.restart(|s| {
            if s.filter == MarketFilter::Price {
                s.price_ascending = !s.price_ascending;
            } else {
                s.filter = MarketFilter::Price;
            }
        })
        .await;
    }

    pub async fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.restart(move |s| s.search = search).await;
    }

    /// Leaving search mode clears the search string and restarts the stream.
    pub async fn set_search_mode(&self, is_search: bool) {
        if is_search {
            self.state.send_modify(|s| s.is_search = true);
        } else {
            self.restart(|s| {
                s.is_search = false;
                s.search.clear();
            })
            .await;
        }
    }

    pub fn set_error(&self, is_error: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.is_error != is_error;
            s.is_error = is_error;
            changed
        });
    }

    pub async fn load_next(&self) {
        self.command(StreamCommand::LoadNext).await;
    }

    pub async fn load_previous(&self) {
        self.command(StreamCommand::LoadPrevious).await;
    }

    /// Reload the pages around the last viewed position.
    pub async fn refresh(&self) {
        self.command(StreamCommand::Refresh).await;
    }

    /// Re-fetch the loaded items at indexes `first..=last` and record
    /// `first` as the viewed position.
    pub async fn update_range(&self, first: usize, last: usize) {
        self.command(StreamCommand::UpdateRange { first, last }).await;
    }

    pub async fn handle_effect(&self, effect: Effect) {
        match effect {
            Effect::RefreshData => self.refresh().await,
        }
    }

    /// Start the periodic refresh signal, replacing any running ticker.
    pub async fn start_realtime(&self) {
        let mut slot = self.realtime.lock().await;
        if let Some(old) = slot.take() {
            old.stop().await;
        }
        *slot = Some(spawn_ticker(self.config.realtime_period, self.effects.clone()));
        info!(period = ?self.config.realtime_period, "Realtime updates started");
    }

    pub async fn stop_realtime(&self) {
        let handle = self.realtime.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
            info!("Realtime updates stopped");
        }
    }

    pub async fn is_realtime_running(&self) -> bool {
        self.realtime.lock().await.is_some()
    }

    /// Stop the ticker and the paging stream and wait for both.
    pub async fn shutdown(&self) {
        self.stop_realtime().await;
        let handle = self.stream.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    pub async fn asset(&self, id: &str) -> Result<CoinRecord, ClientError> {
        self.api.asset(id).await
    }

    /// Daily history over the configured trailing window.
    pub async fn history(&self, id: &str) -> Result<Vec<HistoryPoint>, ClientError> {
        let now = chrono::Utc::now().timestamp_millis();
        let (start, end) = trailing_window(now, self.config.history_window);
        self.api.history(id, start, end).await
    }

    async fn command(&self, command: StreamCommand) {
        match self.stream.lock().await.as_ref() {
            Some(handle) => {
                let _ = handle.commands.send(command);
            }
            None => debug!(?command, "No active stream"),
        }
    }

    /// Cancel and await the live stream, apply `update`, then spawn the next
    /// generation. The slot lock is held throughout, so concurrent restarts
    /// are applied one at a time.
    async fn restart(&self, update: impl FnOnce(&mut MarketState)) {
        let mut slot = self.stream.lock().await;
        if let Some(old) = slot.take() {
            old.stop().await;
        }

        self.state.send_modify(|s| {
            update(s);
            s.generation += 1;
            s.paging = PagingState::default();
            s.is_loading = true;
        });
        let (generation, request) = {
            let s = self.state.borrow();
            (s.generation, s.page_request(self.config.page_size))
        };
        info!(
            generation,
            sort = %request.sort_key,
            order = %request.sort_order,
            search = request.search.as_deref().unwrap_or(""),
            "Starting paging stream"
        );

        let cancellation_token = CancellationToken::new();
        let (commands, receiver) = mpsc::unbounded_channel();
        let stream = PagingStream {
            api: Arc::clone(&self.api),
            source: CoinPagingSource::new(Arc::clone(&self.api), request),
            state: Arc::clone(&self.state),
            generation,
            initial_load_pages: self.config.initial_load_pages,
            max_loaded_pages: self.config.max_loaded_pages,
            token: cancellation_token.clone(),
        };
        let join_handle = tokio::spawn(stream.run(receiver));

        *slot = Some(StreamHandle {
            cancellation_token,
            join_handle,
            commands,
        });
    }
}

impl Drop for MarketController {
    fn drop(&mut self) {
        if let Some(handle) = self.stream.get_mut().take() {
            handle.cancellation_token.cancel();
        }
        if let Some(handle) = self.realtime.get_mut().take() {
            handle.cancellation_token.cancel();
        }
    }
}

/// One generation of the paging stream.
struct PagingStream {
    api: Arc<dyn MarketApi>,
    source: CoinPagingSource,
    state: Arc<watch::Sender<MarketState>>,
    generation: u64,
    initial_load_pages: u32,
    max_loaded_pages: usize,
    token: CancellationToken,
}

impl PagingStream {
    async fn run(self, mut commands: mpsc::UnboundedReceiver<StreamCommand>) {
        self.reload(FIRST_PAGE).await;

        loop {
            let command = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                command = commands.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
            };
            debug!(generation = self.generation, ?command, "Stream command");

            match command {
                StreamCommand::LoadNext => self.extend(true).await,
                StreamCommand::LoadPrevious => self.extend(false).await,
                StreamCommand::Refresh => {
                    let key = self.state.borrow().paging.refresh_key().unwrap_or(FIRST_PAGE);
                    self.reload(key).await;
                }
                StreamCommand::UpdateRange { first, last } => self.update_range(first, last).await,
            }
        }
        debug!(generation = self.generation, "Paging stream finished");
    }

    /// Apply `modify` only while this stream is still the live generation.
    fn publish(&self, modify: impl FnOnce(&mut MarketState)) -> bool {
        self.state.send_if_modified(|s| {
            if s.generation != self.generation || self.token.is_cancelled() {
                return false;
            }
            modify(s);
            true
        })
    }

    fn fail(&self, err: &ClientError) {
        warn!(generation = self.generation, "Page load failed: {}", err);
        self.publish(|s| {
            s.is_loading = false;
            s.is_error = true;
        });
    }

    /// Load up to `initial_load_pages` pages from `start` and make them the
    /// whole window. `None` when cancelled.
    async fn reload(&self, start: u32) {
        self.publish(|s| s.is_loading = true);

        let mut pages = Vec::new();
        let mut key = Some(start);
        for _ in 0..self.initial_load_pages.max(1) {
            let Some(next) = key else { break };
            let Some(result) = self.token.run_until_cancelled(self.source.load(Some(next))).await
            else {
                return;
            };
            match result {
                Ok(page) => {
                    key = page.next_key;
                    pages.push(page);
                }
                Err(err) => return self.fail(&err),
            }
        }

        self.publish(|s| {
            s.paging.replace_from(start, pages);
            s.is_loading = false;
        });
    }

    async fn extend(&self, forward: bool) {
        let key = {
            let s = self.state.borrow();
            if forward {
                s.paging.next_key()
            } else {
                s.paging.prev_key()
            }
        };
        let Some(key) = key else { return };

        self.publish(|s| s.is_loading = true);
        let Some(result) = self.token.run_until_cancelled(self.source.load(Some(key))).await else {
            return;
        };

        match result {
            Ok(page) => {
                let max_pages = self.max_loaded_pages;
                self.publish(|s| {
                    if forward {
                        s.paging.append(page, max_pages);
                    } else {
                        s.paging.prepend(page, max_pages);
                    }
                    s.is_loading = false;
                });
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Successful fetches are applied even when others fail; any failure
    /// raises the error flag.
    async fn update_range(&self, first: usize, last: usize) {
        let ids: Vec<CoinId> = {
            let s = self.state.borrow();
            if first > last || last >= s.paging.item_count() {
                return;
            }
            s.paging
                .items()
                .skip(first)
                .take(last - first + 1)
                .map(|coin| coin.id.clone())
                .collect()
        };
        self.publish(|s| s.paging.anchor_position = Some(first));

        let mut updates = Vec::with_capacity(ids.len());
        let mut failed = false;
        for id in ids {
            match self.token.run_until_cancelled(self.api.asset(id.as_str())).await {
                None => return,
                Some(Ok(coin)) => updates.push(coin),
                Some(Err(err)) => {
                    warn!(coin = %id, "Item update failed: {}", err);
                    failed = true;
                }
            }
        }

        self.publish(|s| {
            s.paging.apply_updates(&updates);
            if failed {
                s.is_error = true;
            }
        });
    }
}
