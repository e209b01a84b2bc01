//! Simulated Market Data Service
//!
//! Holds the in-memory coin market and everything that reads it:
//! - Coin store with per-shard locked read-modify-write
//! - Price simulation step applied on every read
//! - Daily history synthesis (24-point random walk)
//! - Query engine: search, sort, paginate with bounds validation
//!
//! # Architecture
//!
//! ```text
//!   list / detail / history request
//!        │
//!   ┌────▼─────────┐
//!   │MarketService │
//!   └──┬───────┬───┘
//!      │       │
//! ┌────▼──┐ ┌──▼──────┐
//! │Query  │ │History  │
//! └────┬──┘ └──┬──────┘
//!      │       │
//!   ┌──▼───────▼──┐
//!   │ Simulation  │  ← new snapshot per read
//!   └──────┬──────┘
//!          │ write-back
//!     ┌────▼────┐
//!     │CoinStore│
//!     └─────────┘
//! ```

pub mod history;
pub mod query;
pub mod seed;
pub mod service;
pub mod simulation;
pub mod store;

pub use service::MarketService;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
