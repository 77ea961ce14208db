//! Report
//!
//! Risk guidance and plain-text rendering for a recommendation.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::model::{Recommendation, RecommendationSource};

/// Inclusive percentage band, e.g. 2-3%
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentRange {
    pub low: u32,
    pub high: u32,
}

impl PercentRange {
    const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }
}

impl std::fmt::Display for PercentRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}%", self.low, self.high)
    }
}

/// Sizing and exit levels suggested alongside a recommendation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingGuidance {
    /// Share of deposit to commit
    pub position_size: PercentRange,
    pub stop_loss: PercentRange,
    pub take_profit: PercentRange,
}

impl TradingGuidance {
    /// Size by confidence, exits by leverage
    pub fn for_recommendation(rec: &Recommendation) -> Self {
        let position_size = if rec.confidence > 70.0 {
            PercentRange::new(3, 5)
        } else if rec.confidence > 50.0 {
            PercentRange::new(2, 3)
        } else {
            PercentRange::new(1, 2)
        };

        let (stop_loss, take_profit) = if rec.leverage >= 20 {
            (PercentRange::new(2, 3), PercentRange::new(5, 10))
        } else if rec.leverage >= 10 {
            (PercentRange::new(4, 6), PercentRange::new(10, 20))
        } else {
            (PercentRange::new(5, 8), PercentRange::new(15, 25))
        };

        Self {
            position_size,
            stop_loss,
            take_profit,
        }
    }
}

pub fn confidence_badge(confidence: f64) -> &'static str {
    if confidence > 70.0 {
        "HIGH"
    } else if confidence > 50.0 {
        "MEDIUM"
    } else {
        "LOW"
    }
}

const fn source_label(source: RecommendationSource) -> &'static str {
    match source {
        RecommendationSource::Technical => "technical analysis",
        RecommendationSource::Market => "market snapshot",
        RecommendationSource::Fallback => "fallback",
        RecommendationSource::Random => "random",
    }
}

/// Multi-line text report
pub fn render(rec: &Recommendation) -> String {
    let guidance = TradingGuidance::for_recommendation(rec);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rec.headline());
    let _ = writeln!(
        out,
        "Confidence: {:.0}/100 [{}]",
        rec.confidence,
        confidence_badge(rec.confidence)
    );
    let _ = writeln!(out, "Source: {}", source_label(rec.source));
    if !rec.rationale.is_empty() {
        let _ = writeln!(out, "Rationale: {}", rec.rationale);
    }

    if let Some(ind) = &rec.indicators {
        if !ind.insufficient_data {
            let _ = writeln!(
                out,
                "Indicators: RSI {:.1}, volatility {:.2}%, trend {} ({:.0}%), 24h {:+.2}%",
                ind.rsi,
                ind.volatility,
                ind.trend.as_str(),
                ind.trend_confidence,
                ind.price_change_24h
            );
        }
    }
    if let Some(snap) = &rec.snapshot {
        let _ = writeln!(
            out,
            "Market: ${} ({:+.2}% 24h), volume ${}, cap ${}",
            snap.price_usd.normalize(),
            snap.change_24h,
            snap.volume_24h.round(),
            snap.market_cap.round()
        );
    }

    let _ = writeln!(out, "Position size: {} of deposit", guidance.position_size);
    let _ = writeln!(out, "Stop-loss: {}", guidance.stop_loss);
    let _ = writeln!(out, "Take-profit: {}", guidance.take_profit);
    if rec.insufficient_data {
        let _ = writeln!(out, "Warning: limited data, treat as low conviction");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, Indicators, MarketSnapshot, Trend};
    use rust_decimal_macros::dec;

    fn rec(confidence: f64, leverage: u32) -> Recommendation {
        Recommendation::new("BTC", Direction::Long, leverage, confidence, RecommendationSource::Market)
    }

    #[test]
    fn test_position_size_by_confidence() {
        assert_eq!(TradingGuidance::for_recommendation(&rec(85.0, 5)).position_size, PercentRange::new(3, 5));
        assert_eq!(TradingGuidance::for_recommendation(&rec(70.0, 5)).position_size, PercentRange::new(2, 3));
        assert_eq!(TradingGuidance::for_recommendation(&rec(50.0, 5)).position_size, PercentRange::new(1, 2));
    }

    #[test]
    fn test_exits_by_leverage() {
        let high = TradingGuidance::for_recommendation(&rec(60.0, 20));
        assert_eq!(high.stop_loss.to_string(), "2-3%");
        assert_eq!(high.take_profit.to_string(), "5-10%");

        let mid = TradingGuidance::for_recommendation(&rec(60.0, 10));
        assert_eq!(mid.stop_loss, PercentRange::new(4, 6));
        assert_eq!(mid.take_profit, PercentRange::new(10, 20));

        let low = TradingGuidance::for_recommendation(&rec(60.0, 5));
        assert_eq!(low.stop_loss, PercentRange::new(5, 8));
        assert_eq!(low.take_profit, PercentRange::new(15, 25));
    }

    #[test]
    fn test_badges() {
        assert_eq!(confidence_badge(71.0), "HIGH");
        assert_eq!(confidence_badge(70.0), "MEDIUM");
        assert_eq!(confidence_badge(50.0), "LOW");
    }

    #[test]
    fn test_render() {
        let r = rec(82.0, 25)
            .with_rationale("drop of -6.3% in 24h - bounce potential")
            .with_snapshot(MarketSnapshot::new(dec!(0.95), -6.3).with_volume(dec!(900000000)));
        let text = render(&r);
        assert!(text.starts_with("BTC + x25 + LONG\n"));
        assert!(text.contains("Confidence: 82/100 [HIGH]"));
        assert!(text.contains("Source: market snapshot"));
        assert!(text.contains("Market: $0.95 (-6.30% 24h)"));
        assert!(text.contains("Stop-loss: 2-3%"));
        assert!(!text.contains("Warning"));

        let starved = render(&rec(40.0, 1).insufficient());
        assert!(starved.contains("[LOW]"));
        assert!(starved.contains("Warning: limited data"));
    }

    #[test]
    fn test_render_full_technical_report() {
        let indicators = Indicators {
            rsi: 27.4,
            volatility: 4.2,
            trend: Trend::Up,
            trend_strength: 4.0,
            trend_confidence: 40.0,
            price_change_24h: -6.5,
            insufficient_data: false,
        };
        let r = Recommendation::new("ADA", Direction::Long, 10, 73.4, RecommendationSource::Technical)
            .with_rationale("RSI (27.4) oversold, uptrend, significant 24h move (-6.5%)")
            .with_indicators(indicators)
            .with_snapshot(
                MarketSnapshot::new(dec!(0.95), -6.5)
                    .with_volume(dec!(900000000))
                    .with_market_cap(dec!(33500000000)),
            );

        let expected = "\
ADA + x10 + LONG
Confidence: 73/100 [HIGH]
Source: technical analysis
Rationale: RSI (27.4) oversold, uptrend, significant 24h move (-6.5%)
Indicators: RSI 27.4, volatility 4.20%, trend UP (40%), 24h -6.50%
Market: $0.95 (-6.50% 24h), volume $900000000, cap $33500000000
Position size: 3-5% of deposit
Stop-loss: 4-6%
Take-profit: 10-20%
";
        assert_eq!(render(&r), expected);
    }
}
