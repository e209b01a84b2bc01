//! Market service facade
//!
//! Owns the coin store and routes every read through the simulation step,
//! so each read advances the market by one snapshot and writes it back.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use types::coin::{CoinRecord, HistoryPoint};
use types::errors::QueryError;
use types::query::{Interval, PageRequest};

use crate::history::random_walk;
use crate::query::{query, validate_bounds, QueryPage};
use crate::seed::{initial_coins, SeedConfig};
use crate::simulation::randomize;
use crate::store::CoinStore;

/// Simulated market: store plus simulation, query and history operations.
///
/// Created once at startup and shared (behind an `Arc`) by all request
/// handlers until process exit.
#[derive(Debug)]
pub struct MarketService {
    store: CoinStore,
}

impl MarketService {
    /// Wrap an existing store.
    pub fn new(store: CoinStore) -> Self {
        Self { store }
    }

    /// Seed a fresh store according to `config`.
    pub fn seeded(config: &SeedConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let store = CoinStore::from_records(initial_coins(config.synthetic_coins, &mut rng));
        info!(coins = store.len(), seed = ?config.seed, "Seeded coin store");
        Self::new(store)
    }

    pub fn store(&self) -> &CoinStore {
        &self.store
    }

    pub fn coin_count(&self) -> usize {
        self.store.len()
    }

    /// Advance one coin by a simulation step and return the new snapshot.
    pub fn snapshot<R: Rng + ?Sized>(&self, id: &str, rng: &mut R) -> Option<CoinRecord> {
        self.store.update(id, |coin| randomize(coin, &mut *rng))
    }

    /// Advance every coin by a simulation step and return the snapshots.
    pub fn snapshot_all<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<CoinRecord> {
        self.store.update_all(|coin| randomize(coin, &mut *rng))
    }

    /// Paged, filtered, sorted list over fresh snapshots.
    ///
    /// Bounds are checked before any coin is touched, so a rejected request
    /// leaves the market unchanged.
    pub fn list<R: Rng + ?Sized>(
        &self,
        request: &PageRequest,
        rng: &mut R,
    ) -> Result<QueryPage, QueryError> {
        validate_bounds(request)?;
        let page = query(self.snapshot_all(rng), request)?;
        debug!(
            page = request.page,
            page_size = request.page_size,
            sort = %request.sort_key,
            order = %request.sort_order,
            total = page.total_items,
            "Served coin page"
        );
        Ok(page)
    }

    /// 24-point daily history for `id` between `start` and `end` (Unix ms).
    /// Empty if the coin is unknown.
    pub fn history<R: Rng + ?Sized>(
        &self,
        id: &str,
        interval: Interval,
        start: i64,
        end: i64,
        rng: &mut R,
    ) -> Vec<HistoryPoint> {
        let Some(coin) = self.snapshot(id, rng) else {
            return Vec::new();
        };
        debug!(coin = id, interval = interval.as_param(), start, end, "Generating history");
        random_walk(coin.price_usd, start, end, rng)
    }
}
