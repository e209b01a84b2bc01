//! HTTP API over the simulated coin market
//!
//! Routes:
//! - `GET /`: liveness probe
//! - `GET /assets`: paged, sorted, searchable coin list
//! - `GET /assets/{id}`: single coin snapshot
//! - `GET /assets/{id}/history`: 24-point price history

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
