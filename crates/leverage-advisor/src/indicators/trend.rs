//! Trend Analysis
//!
//! Compares a 5-point and a 20-point simple moving average.

use crate::model::{Trend, TrendAnalysis};

use super::MIN_DATA_POINTS;

pub const SHORT_MA_WINDOW: usize = 5;
pub const LONG_MA_WINDOW: usize = 20;

/// MA spread (percent) beyond which a trend is called
pub const TREND_THRESHOLD: f64 = 2.0;

fn trailing_mean(prices: &[f64], window: usize) -> f64 {
    let tail = &prices[prices.len() - window..];
    #[allow(clippy::cast_precision_loss)]
    let n = window as f64;
    tail.iter().sum::<f64>() / n
}

/// Classify the current trend.
///
/// Fewer than 20 points reads as sideways with zero strength and confidence.
pub fn analyze_trend(prices: &[f64]) -> TrendAnalysis {
    if prices.len() < MIN_DATA_POINTS {
        return TrendAnalysis::sideways();
    }

    let short_ma = trailing_mean(prices, SHORT_MA_WINDOW);
    let long_ma = trailing_mean(prices, LONG_MA_WINDOW);
    let spread = (short_ma - long_ma) / long_ma * 100.0;
    if !spread.is_finite() {
        return TrendAnalysis::sideways();
    }

    let trend = if spread > TREND_THRESHOLD {
        Trend::Up
    } else if spread < -TREND_THRESHOLD {
        Trend::Down
    } else {
        Trend::Sideways
    };

    TrendAnalysis {
        trend,
        strength: spread.abs(),
        confidence: (spread.abs() * 10.0).min(100.0),
    }
}
