//! Application State

use std::sync::Arc;

use leverage_advisor::Advisor;
use leverage_advisor::exchange::MarketDataClient;

/// Market data source picked at startup (CoinGecko or mock)
pub type SharedClient = Arc<dyn MarketDataClient>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Recommendation service; the only thing requests share
    pub advisor: Arc<Advisor<SharedClient>>,
}

impl AppState {
    pub fn new(advisor: Advisor<SharedClient>) -> Self {
        Self {
            advisor: Arc::new(advisor),
        }
    }
}
