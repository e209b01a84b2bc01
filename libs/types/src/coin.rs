//! Coin snapshot and price-history types
//!
//! Field names are part of the public JSON contract and are reproduced
//! exactly (`priceUsd`, `changePercent24Hr`, ...).

use crate::ids::CoinId;
use serde::{Deserialize, Serialize};

/// Lowest price any simulated coin may reach.
pub const MIN_PRICE_USD: f64 = 0.01;

/// Bounds of the 24h percent change.
pub const CHANGE_PERCENT_BOUNDS: (f64, f64) = (-10.0, 10.0);

/// Full market statistics of one simulated coin.
///
/// Price, supply, max supply and volume are logically non-negative.
/// `change_percent_24h` always lies within [`CHANGE_PERCENT_BOUNDS`] once a
/// record has passed through the simulation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinRecord {
    pub id: CoinId,
    pub rank: u32,
    pub symbol: String,
    pub name: String,
    pub supply: f64,
    pub max_supply: f64,
    pub market_cap_usd: f64,
    #[serde(rename = "volumeUsd24Hr")]
    pub volume_usd_24h: f64,
    pub price_usd: f64,
    #[serde(rename = "changePercent24Hr")]
    pub change_percent_24h: f64,
    #[serde(rename = "vwap24Hr")]
    pub vwap_24h: f64,
}

impl CoinRecord {
    /// Whether the search needle (already trimmed and lower-cased) occurs in
    /// the name, symbol or identifier, ignoring case.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.symbol.to_lowercase().contains(needle)
            || self.id.as_str().to_lowercase().contains(needle)
    }
}

/// One point of a synthesized price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub price_usd: f64,
    /// Unix milliseconds
    pub time: i64,
    /// `time` rendered as `YYYY-MM-DD HH:MM:SS` (UTC)
    pub date: String,
}
