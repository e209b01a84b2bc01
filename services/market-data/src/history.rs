//! Daily price history synthesis
//!
//! A fixed-length random walk between two timestamps, starting from a fresh
//! snapshot of the coin's price.

use chrono::{DateTime, Utc};
use rand::Rng;
use types::coin::{HistoryPoint, MIN_PRICE_USD};

/// Points in every generated series.
pub const HISTORY_POINTS: usize = 24;

/// Maximum relative move between two consecutive points (±5%).
const STEP_MOVE: f64 = 0.05;

/// Trailing window used when the caller gives no bounds (7 days, in ms).
pub const DEFAULT_WINDOW_MS: i64 = 7 * 86_400_000;

/// Render Unix milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Walk from `start_price` across `[start, end]` in [`HISTORY_POINTS`]
/// equal steps. Each step moves the running price by a factor drawn from
/// [-5%, +5%], floored at 0.01.
pub fn random_walk<R: Rng + ?Sized>(
    start_price: f64,
    start: i64,
    end: i64,
    rng: &mut R,
) -> Vec<HistoryPoint> {
    let step = end.saturating_sub(start).max(0) / HISTORY_POINTS as i64;
    let mut price = start_price;

    (0..HISTORY_POINTS)
        .map(|i| {
            let time = start.saturating_add(i as i64 * step);
            let change = rng.gen_range(-STEP_MOVE..=STEP_MOVE);
            price = (price * (1.0 + change)).max(MIN_PRICE_USD);

            HistoryPoint {
                price_usd: price,
                time,
                date: format_timestamp(time),
            }
        })
        .collect()
}
