use market_data::MarketService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketService>,
}

impl AppState {
    pub fn new(market: MarketService) -> Self {
        Self {
            market: Arc::new(market),
        }
    }
}
