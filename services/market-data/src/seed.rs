//! Initial market contents
//!
//! Three well-known coins with fixed figures, followed by a large batch of
//! synthetic coins whose statistics are drawn from the supplied RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};
use types::coin::{CoinRecord, MIN_PRICE_USD};
use types::ids::CoinId;

/// Number of synthetic coins seeded by default (2000 coins in total).
pub const DEFAULT_SYNTHETIC_COINS: usize = 1997;

/// Seeding parameters for the coin store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Number of `crypto-{i}` coins appended after the named ones.
    pub synthetic_coins: usize,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            synthetic_coins: DEFAULT_SYNTHETIC_COINS,
            seed: None,
        }
    }
}

/// The named coins, ranks 1..=3.
pub fn named_coins() -> Vec<CoinRecord> {
    vec![
        CoinRecord {
            id: CoinId::new("bitcoin"),
            rank: 1,
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            supply: 18_938_281.0,
            max_supply: 21_000_000.0,
            market_cap_usd: 1_674_213_186_750.2,
            volume_usd_24h: 25_159_311_166.0,
            price_usd: 84_375.27,
            change_percent_24h: 0.75,
            vwap_24h: 84_200.5,
        },
        CoinRecord {
            id: CoinId::new("ethereum"),
            rank: 2,
            symbol: "ETH".to_string(),
            name: "Ethereum".to_string(),
            supply: 120_000_000.0,
            max_supply: 0.0,
            market_cap_usd: 542_184_567_890.12,
            volume_usd_24h: 15_432_123_456.0,
            price_usd: 4_521.64,
            change_percent_24h: 1.25,
            vwap_24h: 4_500.0,
        },
        CoinRecord {
            id: CoinId::new("xrp"),
            rank: 3,
            symbol: "XRP".to_string(),
            name: "XRP".to_string(),
            supply: 45_000_000_000.0,
            max_supply: 100_000_000_000.0,
            market_cap_usd: 45_123_456_789.01,
            volume_usd_24h: 1_234_567_890.0,
            price_usd: 0.95,
            change_percent_24h: -0.35,
            vwap_24h: 0.94,
        },
    ]
}

/// Synthetic coin number `index` (1-based), ranked after `rank_offset` coins.
pub fn synthetic_coin<R: Rng + ?Sized>(index: usize, rank_offset: usize, rng: &mut R) -> CoinRecord {
    let base_price = (100.0 + rng.gen::<f64>() * 100.0).max(MIN_PRICE_USD);

    CoinRecord {
        id: CoinId::synthetic(index),
        rank: (rank_offset + index) as u32,
        symbol: format!("CRYPTO{:03}", index),
        name: format!("CryptoCoin{}", index),
        supply: rng.gen::<f64>() * 1_000_000_000.0,
        max_supply: rng.gen::<f64>() * 2_000_000_000.0,
        market_cap_usd: base_price * (rng.gen::<f64>() * 1_000_000.0),
        volume_usd_24h: rng.gen::<f64>() * 10_000_000_000.0,
        price_usd: base_price,
        change_percent_24h: rng.gen::<f64>() * 2.0 - 1.0,
        vwap_24h: base_price * 0.99,
    }
}

/// Named coins followed by `synthetic` generated ones, in rank order.
pub fn initial_coins<R: Rng + ?Sized>(synthetic: usize, rng: &mut R) -> Vec<CoinRecord> {
    let mut coins = named_coins();
    let offset = coins.len();
    coins.extend((1..=synthetic).map(|i| synthetic_coin(i, offset, rng)));
    coins
}
