//! Domain Models
//!
//! Value types shared by the scoring pipelines.
//! Money amounts in snapshots use `rust_decimal`; indicator math is `f64`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// A single observed price
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Informational only; ordering is what matters
    pub timestamp: DateTime<Utc>,

    /// Price in USD
    pub price: f64,
}

/// Chronologically ordered price history for one asset
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub const fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Build from `(timestamp_ms, price)` pairs as served by chart endpoints
    pub fn from_pairs(pairs: &[(i64, f64)]) -> Self {
        let points = pairs
            .iter()
            .map(|&(ms, price)| PricePoint {
                timestamp: DateTime::from_timestamp_millis(ms).unwrap_or_default(),
                price,
            })
            .collect();
        Self { points }
    }

    /// Build from bare prices, one point per hour starting at the epoch
    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Self {
        let start = DateTime::<Utc>::default();
        let points = prices
            .into_iter()
            .zip(0_i64..)
            .map(|(price, hour)| PricePoint {
                timestamp: start + Duration::hours(hour),
                price,
            })
            .collect();
        Self { points }
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    /// Log-returns are undefined for non-positive prices
    pub fn validate(&self) -> Result<()> {
        match self
            .points
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.price.is_finite() && p.price > 0.0))
        {
            Some((index, p)) => Err(AdvisorError::NonPositivePrice { index, price: p.price }),
            None => Ok(()),
        }
    }
}

/// Point-in-time market data for one asset.
///
/// Every field defaults to zero, which means "unknown" to the scorers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Current price in USD
    pub price_usd: Decimal,

    /// 24-hour price change percentage
    pub change_24h: f64,

    /// 24-hour traded volume in USD
    pub volume_24h: Decimal,

    /// Market capitalization in USD
    pub market_cap: Decimal,
}

impl MarketSnapshot {
    pub fn new(price_usd: Decimal, change_24h: f64) -> Self {
        Self {
            price_usd,
            change_24h,
            ..Default::default()
        }
    }

    pub fn with_volume(mut self, volume_24h: Decimal) -> Self {
        self.volume_24h = volume_24h;
        self
    }

    pub fn with_market_cap(mut self, market_cap: Decimal) -> Self {
        self.market_cap = market_cap;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub const ALL: [Self; 2] = [Self::Long, Self::Short];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Up,
    Down,
    Sideways,
    /// Not enough history to tell
    Unknown,
}

impl Trend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Sideways => "SIDEWAYS",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moving-average trend reading
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: Trend,

    /// Absolute short/long MA spread, percent
    pub strength: f64,

    /// 0-100
    pub confidence: f64,
}

impl TrendAnalysis {
    pub const fn sideways() -> Self {
        Self {
            trend: Trend::Sideways,
            strength: 0.0,
            confidence: 0.0,
        }
    }
}

/// Indicator bundle computed fresh for each evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    /// 0-100
    pub rsi: f64,

    /// Standard deviation of log-returns, percent
    pub volatility: f64,

    pub trend: Trend,
    pub trend_strength: f64,
    pub trend_confidence: f64,

    /// Change over the last 24 points, percent
    pub price_change_24h: f64,

    /// Set when the series was too short to analyze
    pub insufficient_data: bool,
}

impl Indicators {
    /// Neutral readings used when there is no usable history
    pub const fn neutral() -> Self {
        Self {
            rsi: 50.0,
            volatility: 0.0,
            trend: Trend::Unknown,
            trend_strength: 0.0,
            trend_confidence: 0.0,
            price_change_24h: 0.0,
            insufficient_data: true,
        }
    }
}

/// Which pipeline produced a recommendation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Indicator-based scoring of a price history
    Technical,
    /// Snapshot scoring plus top-K selection
    Market,
    /// Data-starved default
    Fallback,
    /// Pure random pick
    Random,
}

/// A leveraged trade suggestion. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Ticker symbol (e.g., "BTC")
    pub symbol: String,

    pub direction: Direction,

    /// Always a member of the configured leverage ladder
    pub leverage: u32,

    /// 0-100 heuristic score, not a probability
    pub confidence: f64,

    /// Human-readable explanation
    pub rationale: String,

    pub source: RecommendationSource,

    /// Indicator readings behind a technical recommendation
    pub indicators: Option<Indicators>,

    /// Market data behind a snapshot recommendation
    pub snapshot: Option<MarketSnapshot>,

    /// True when produced by a data-starved fallback path
    pub insufficient_data: bool,

    pub generated_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn new(
        symbol: impl Into<String>,
        direction: Direction,
        leverage: u32,
        confidence: f64,
        source: RecommendationSource,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
            leverage,
            confidence: confidence.clamp(0.0, 100.0),
            rationale: String::new(),
            source,
            indicators: None,
            snapshot: None,
            insufficient_data: false,
            generated_at: Utc::now(),
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    pub fn with_indicators(mut self, indicators: Indicators) -> Self {
        self.insufficient_data |= indicators.insufficient_data;
        self.indicators = Some(indicators);
        self
    }

    pub fn with_snapshot(mut self, snapshot: MarketSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn insufficient(mut self) -> Self {
        self.insufficient_data = true;
        self
    }

    /// Short form such as `BTC + x10 + LONG`
    pub fn headline(&self) -> String {
        format!("{} + x{} + {}", self.symbol, self.leverage, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_series_from_pairs() {
        let series = PriceSeries::from_pairs(&[(1_700_000_000_000, 100.0), (1_700_003_600_000, 101.0)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.prices(), vec![100.0, 101.0]);
        assert_eq!(series.last_price(), Some(101.0));
        assert!(series.points[0].timestamp < series.points[1].timestamp);
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let series = PriceSeries::from_prices([10.0, 11.0, 0.0, 12.0]);
        match series.validate() {
            Err(AdvisorError::NonPositivePrice { index, .. }) => assert_eq!(index, 2),
            other => panic!("unexpected: {other:?}"),
        }

        assert!(PriceSeries::from_prices([1.0, 2.0]).validate().is_ok());
        assert!(PriceSeries::default().validate().is_ok());
    }

    #[test]
    fn test_recommendation_clamps_confidence() {
        let rec = Recommendation::new("BTC", Direction::Long, 10, 137.5, RecommendationSource::Market);
        assert!((rec.confidence - 100.0).abs() < f64::EPSILON);
        assert_eq!(rec.headline(), "BTC + x10 + LONG");
        assert!(!rec.insufficient_data);
    }

    #[test]
    fn test_neutral_indicators_flag_recommendation() {
        let rec = Recommendation::new("ETH", Direction::Long, 3, 20.0, RecommendationSource::Technical)
            .with_indicators(Indicators::neutral());
        assert!(rec.insufficient_data);
        assert_eq!(rec.indicators.map(|i| i.trend), Some(Trend::Unknown));
    }

    #[test]
    fn test_snapshot_builder() {
        let snap = MarketSnapshot::new(dec!(97500), -3.2)
            .with_volume(dec!(25_000_000_000))
            .with_market_cap(dec!(1_900_000_000_000));
        assert_eq!(snap.volume_24h, dec!(25_000_000_000));
        assert!(MarketSnapshot::default().market_cap.is_zero());
    }

    #[test]
    fn test_direction_serializes_uppercase() {
        let json = serde_json::to_string(&Direction::Short).unwrap();
        assert_eq!(json, "\"SHORT\"");
    }
}
