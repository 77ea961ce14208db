//! Mock Market Data
//!
//! For tests and offline demos. Serves static snapshots and synthetic hourly
//! histories shaped by each asset's 24h change.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use super::MarketDataClient;
use crate::entropy::{Entropy, RandEntropy};
use crate::error::{AdvisorError, Result};
use crate::model::{MarketSnapshot, PriceSeries};

/// Mock source with static prices
#[derive(Debug, Default)]
pub struct MockMarketData {
    /// Per-point noise applied to histories, percent
    variance_percent: f64,

    /// Ids that answer with an empty history
    starved: Vec<String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with price noise in generated histories
    pub fn with_variance(variance_percent: f64) -> Self {
        Self {
            variance_percent,
            ..Self::default()
        }
    }

    /// Make `coin_id` return no history (exercises fallback paths)
    #[must_use]
    pub fn starve(mut self, coin_id: impl Into<String>) -> Self {
        self.starved.push(coin_id.into());
        self
    }

    /// (price, 24h change %, 24h volume, market cap)
    fn base_snapshot(coin_id: &str) -> Option<(Decimal, f64, Decimal, Decimal)> {
        match coin_id {
            "bitcoin" => Some((dec!(97500), 2.5, dec!(25_000_000_000), dec!(1_930_000_000_000))),
            "ethereum" => Some((dec!(3450), 1.8, dec!(15_000_000_000), dec!(415_000_000_000))),
            "ripple" => Some((dec!(2.35), 0.9, dec!(4_200_000_000), dec!(135_000_000_000))),
            "binancecoin" => Some((dec!(690), -1.1, dec!(1_600_000_000), dec!(99_000_000_000))),
            "solana" => Some((dec!(195), 4.2, dec!(3_000_000_000), dec!(94_000_000_000))),
            "usd-coin" => Some((dec!(1.00), 0.01, dec!(6_500_000_000), dec!(44_000_000_000))),
            "staked-ether" => Some((dec!(3445), 1.7, dec!(40_000_000), dec!(33_000_000_000))),
            "tron" => Some((dec!(0.25), -0.4, dec!(450_000_000), dec!(21_500_000_000))),
            "dogecoin" => Some((dec!(0.38), 12.0, dec!(3_800_000_000), dec!(56_000_000_000))),
            "cardano" => Some((dec!(0.95), -6.5, dec!(900_000_000), dec!(33_500_000_000))),
            "sui" => Some((dec!(4.10), 9.3, dec!(1_200_000_000), dec!(12_000_000_000))),
            "stellar" => Some((dec!(0.42), -2.6, dec!(300_000_000), dec!(12_700_000_000))),
            _ => None,
        }
    }

    /// Hourly series ending at the snapshot price, drifting so that the last
    /// 24 points carry the snapshot's 24h change
    fn synthetic_history(&self, coin_id: &str, price: f64, change_24h: f64, days: u32) -> PriceSeries {
        let points = usize::try_from(days.max(1) * 24).unwrap_or(24);
        let hourly = (1.0 + change_24h / 100.0).powf(1.0 / 23.0);
        let mut noise = RandEntropy::seeded(seed_for(coin_id));

        let mut prices: Vec<f64> = Vec::with_capacity(points);
        let mut p = price;
        for _ in 0..points {
            prices.push(p);
            let wobble = if self.variance_percent > 0.0 {
                1.0 + noise.uniform(-self.variance_percent, self.variance_percent) / 100.0
            } else {
                1.0
            };
            p = (p / hourly * wobble).max(f64::MIN_POSITIVE);
        }
        prices.reverse();

        PriceSeries::from_prices(prices)
    }
}

fn seed_for(coin_id: &str) -> u64 {
    coin_id
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
}

#[async_trait]
impl MarketDataClient for MockMarketData {
    async fn price_history(&self, coin_id: &str, days: u32) -> Result<PriceSeries> {
        if self.starved.iter().any(|s| s == coin_id) {
            return Ok(PriceSeries::default());
        }
        let (price, change, _, _) = Self::base_snapshot(coin_id)
            .ok_or_else(|| AdvisorError::MarketData(format!("unknown coin id: {coin_id}")))?;
        let price = price.to_f64().unwrap_or(1.0);
        Ok(self.synthetic_history(coin_id, price, change, days))
    }

    async fn snapshots(&self, coin_ids: &[&str]) -> Result<HashMap<String, MarketSnapshot>> {
        Ok(coin_ids
            .iter()
            .filter_map(|id| {
                Self::base_snapshot(id).map(|(price, change, volume, cap)| {
                    (
                        (*id).to_string(),
                        MarketSnapshot::new(price, change)
                            .with_volume(volume)
                            .with_market_cap(cap),
                    )
                })
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        true // Mock always healthy
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators;

    #[tokio::test]
    async fn test_mock_snapshots() {
        let source = MockMarketData::new();
        let snaps = source.snapshots(&["bitcoin", "dogecoin", "notreal"]).await.unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps["bitcoin"].price_usd, dec!(97500));
        assert!((snaps["dogecoin"].change_24h - 12.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_history_matches_snapshot() {
        let source = MockMarketData::new();
        let series = source.price_history("cardano", 7).await.unwrap();
        assert_eq!(series.len(), 168);
        assert!(series.validate().is_ok());
        assert!((series.last_price().unwrap() - 0.95).abs() < 1e-9);

        let change = indicators::price_change_24h(&series.prices());
        assert!((change + 6.5).abs() < 1e-6, "got {change}");
    }

    #[tokio::test]
    async fn test_variance_is_deterministic_per_coin() {
        let source = MockMarketData::with_variance(1.5);
        let a = source.price_history("solana", 2).await.unwrap();
        let b = source.price_history("solana", 2).await.unwrap();
        assert_eq!(a.prices(), b.prices());
        assert!(a.validate().is_ok());
    }

    #[tokio::test]
    async fn test_unknown_and_starved() {
        let source = MockMarketData::new().starve("bitcoin");
        assert!(source.price_history("bitcoin", 7).await.unwrap().is_empty());
        assert!(matches!(
            source.price_history("notreal", 7).await,
            Err(AdvisorError::MarketData(_))
        ));
        assert!(source.health_check().await);
    }
}
