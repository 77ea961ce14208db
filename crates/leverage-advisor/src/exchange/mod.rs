//! Market Data Integration
//!
//! The scoring core only consumes price histories and snapshots. Fetching
//! them is the job of a `MarketDataClient`.

mod coingecko;
mod mock;

pub use coingecko::CoinGeckoClient;
pub use mock::MockMarketData;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{MarketSnapshot, PriceSeries};

/// Market data source (Strategy pattern)
///
/// Implement this for each data vendor. Ids are the vendor's asset ids
/// (e.g. `bitcoin`), not ticker symbols.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Price history for the last `days` days, oldest first
    async fn price_history(&self, coin_id: &str, days: u32) -> Result<PriceSeries>;

    /// Current snapshots keyed by id; unknown ids are simply absent
    async fn snapshots(&self, coin_ids: &[&str]) -> Result<HashMap<String, MarketSnapshot>>;

    /// Check if the source is reachable
    async fn health_check(&self) -> bool;

    /// Source name
    fn name(&self) -> &str;
}

/// Lets a shared `Arc<dyn MarketDataClient>` drive an `Advisor`
#[async_trait]
impl<T: MarketDataClient + ?Sized> MarketDataClient for Arc<T> {
    async fn price_history(&self, coin_id: &str, days: u32) -> Result<PriceSeries> {
        (**self).price_history(coin_id, days).await
    }

    async fn snapshots(&self, coin_ids: &[&str]) -> Result<HashMap<String, MarketSnapshot>> {
        (**self).snapshots(coin_ids).await
    }

    async fn health_check(&self) -> bool {
        (**self).health_check().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
