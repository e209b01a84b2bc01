//! Price simulation step
//!
//! Derives a new randomized snapshot of a coin from its previous one.
//! Pure apart from the RNG it is handed, so a seeded RNG makes every
//! step reproducible.

use rand::Rng;
use types::coin::{CoinRecord, CHANGE_PERCENT_BOUNDS, MIN_PRICE_USD};

/// Multiplicative jitter range applied to most fields (±5%).
const JITTER: (f64, f64) = (0.95, 1.05);

/// Jitter range applied to the 24h change (±10%).
const CHANGE_JITTER: (f64, f64) = (0.9, 1.1);

/// Multiply `value` by a factor drawn uniformly from [0.95, 1.05].
pub fn jitter<R: Rng + ?Sized>(value: f64, rng: &mut R) -> f64 {
    value * rng.gen_range(JITTER.0..=JITTER.1)
}

/// Produce the next snapshot of `coin`.
///
/// Market cap is `new_price × jitter(supply)` using a second, independent
/// supply draw, not the supply stored on the returned record.
pub fn randomize<R: Rng + ?Sized>(coin: &CoinRecord, rng: &mut R) -> CoinRecord {
    let new_price = jitter(coin.price_usd, rng).max(MIN_PRICE_USD);

    let supply = jitter(coin.supply, rng);
    let max_supply = jitter(coin.max_supply, rng);
    let market_cap_usd = new_price * jitter(coin.supply, rng);
    let volume_usd_24h = jitter(coin.volume_usd_24h, rng);
    let change_percent_24h = (coin.change_percent_24h
        * rng.gen_range(CHANGE_JITTER.0..=CHANGE_JITTER.1))
    .clamp(CHANGE_PERCENT_BOUNDS.0, CHANGE_PERCENT_BOUNDS.1);
    let vwap_24h = jitter(new_price, rng);

    CoinRecord {
        supply,
        max_supply,
        market_cap_usd,
        volume_usd_24h,
        price_usd: new_price,
        change_percent_24h,
        vwap_24h,
        ..coin.clone()
    }
}
