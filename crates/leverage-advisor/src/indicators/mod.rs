//! Technical Indicators
//!
//! Pure functions over a chronologically ordered price slice. None of them
//! fail on short input: each returns its neutral reading instead.

pub mod rsi;
pub mod trend;
pub mod volatility;

pub use rsi::calculate_rsi;
pub use trend::analyze_trend;
pub use volatility::calculate_volatility;

use crate::model::Indicators;

/// Default RSI lookback
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Below this many points a series is not analyzed at all
pub const MIN_DATA_POINTS: usize = 20;

/// Points per day in hourly data
pub const LOOKBACK_24H: usize = 24;

/// Percent change over the last 24 points, 0 when the series is shorter
pub fn price_change_24h(prices: &[f64]) -> f64 {
    if prices.len() < LOOKBACK_24H {
        return 0.0;
    }
    let then = prices[prices.len() - LOOKBACK_24H];
    let now = prices[prices.len() - 1];
    (now - then) / then * 100.0
}

/// Compute the full indicator bundle for one series
pub fn compute(prices: &[f64]) -> Indicators {
    if prices.len() < MIN_DATA_POINTS {
        return Indicators::neutral();
    }

    let trend = analyze_trend(prices);
    Indicators {
        rsi: calculate_rsi(prices, DEFAULT_RSI_PERIOD),
        volatility: calculate_volatility(prices),
        trend: trend.trend,
        trend_strength: trend.strength,
        trend_confidence: trend.confidence,
        price_change_24h: price_change_24h(prices),
        insufficient_data: false,
    }
}
