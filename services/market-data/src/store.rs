//! Coin store
//!
//! Authoritative in-memory state for every simulated coin, keyed by id.
//! Records are created at startup, mutated in place, never deleted.
//!
//! # Concurrency
//!
//! Backed by a sharded `DashMap`. Read-modify-write goes through
//! [`CoinStore::update`] / [`CoinStore::update_all`], which hold the write
//! lock of the record's shard for the whole update, so no reader can observe
//! a half-written record and two updates of the same id are serialized.
//! Updates of ids living in different shards proceed in parallel.
//!
//! Callers only ever receive clones; the live record never leaves the map.

use dashmap::DashMap;
use types::coin::CoinRecord;
use types::ids::CoinId;

/// Shared coin state.
#[derive(Debug, Default)]
pub struct CoinStore {
    coins: DashMap<CoinId, CoinRecord>,
}

impl CoinStore {
    pub fn new() -> Self {
        Self {
            coins: DashMap::new(),
        }
    }

    /// Build a store holding `coins`, keyed by their ids.
    pub fn from_records(coins: impl IntoIterator<Item = CoinRecord>) -> Self {
        let store = Self::new();
        for coin in coins {
            store.put(coin);
        }
        store
    }

    /// Copy of the stored record, or `None` for an unknown id.
    pub fn get(&self, id: &str) -> Option<CoinRecord> {
        self.coins.get(id).map(|entry| entry.value().clone())
    }

    /// Copies of all stored records, in no particular order.
    pub fn get_all(&self) -> Vec<CoinRecord> {
        self.coins.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Insert or replace the record stored under its id.
    pub fn put(&self, coin: CoinRecord) {
        self.coins.insert(coin.id.clone(), coin);
    }

    /// Replace the record for `id` with `f(current)` and return a copy of
    /// the new value. `None` if the id is unknown.
    pub fn update<F>(&self, id: &str, f: F) -> Option<CoinRecord>
    where
        F: FnOnce(&CoinRecord) -> CoinRecord,
    {
        let mut entry = self.coins.get_mut(id)?;
        let next = f(entry.value());
        *entry.value_mut() = next.clone();
        Some(next)
    }

    /// Apply `f` to every record, writing each result back, and return
    /// copies of the new values.
    pub fn update_all<F>(&self, mut f: F) -> Vec<CoinRecord>
    where
        F: FnMut(&CoinRecord) -> CoinRecord,
    {
        let mut out = Vec::with_capacity(self.coins.len());
        for mut entry in self.coins.iter_mut() {
            let next = f(entry.value());
            *entry.value_mut() = next.clone();
            out.push(next);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}
