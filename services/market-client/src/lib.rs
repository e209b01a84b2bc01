//! Client for the simulated coin market
//!
//! - `api`: the [`MarketApi`] seam and its HTTP implementation
//! - `paging`: page loading with previous/next keys and the loaded window
//! - `controller`: the single live paging stream and the screen state
//! - `realtime`: the periodic refresh signal

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod paging;
pub mod realtime;

pub use api::{HttpMarketApi, ListPage, MarketApi};
pub use config::ClientConfig;
pub use controller::{MarketController, MarketFilter, MarketState};
pub use error::ClientError;
pub use realtime::Effect;
