//! Types library for the simulated coin market
//!
//! Shared by the market service and the paging client so the JSON contract
//! is defined in exactly one place.
//!
//! # Modules
//! - `ids`: Coin identifiers
//! - `coin`: Coin snapshots and history points
//! - `query`: Sort keys, orders, intervals and page requests
//! - `envelope`: `{data, info}` response wrapper
//! - `errors`: Error taxonomy

pub mod ids;
pub mod coin;
pub mod query;
pub mod envelope;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";
