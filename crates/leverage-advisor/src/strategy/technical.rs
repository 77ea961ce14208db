//! Technical Strategy
//!
//! Turns RSI, volatility, trend and 24h momentum into a LONG/SHORT call.
//! Each rule adds points to one or both sides; the larger side wins and
//! its score becomes the confidence.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::{self, MIN_DATA_POINTS};
use crate::leverage::LeverageLadder;
use crate::model::{Direction, Indicators, PriceSeries, Recommendation, RecommendationSource, Trend};

const OVERSOLD_RSI: f64 = 30.0;
const OVERBOUGHT_RSI: f64 = 70.0;
const RSI_EXTREME_POINTS: f64 = 30.0;
const RSI_NEUTRAL_POINTS: f64 = 10.0;
const MOMENTUM_MOVE: f64 = 5.0;
const MOMENTUM_POINTS: f64 = 15.0;
const HIGH_VOLATILITY: f64 = 8.0;
const LOW_VOLATILITY: f64 = 3.0;

/// Accumulated points per side
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalScores {
    pub long: f64,
    pub short: f64,
}

impl SignalScores {
    /// Ties go to SHORT
    pub fn direction(&self) -> Direction {
        if self.long > self.short {
            Direction::Long
        } else {
            Direction::Short
        }
    }

    pub fn confidence(&self) -> f64 {
        self.long.max(self.short).min(100.0)
    }
}

/// Indicator-based scorer
#[derive(Clone, Debug, Default)]
pub struct TechnicalStrategy {
    ladder: LeverageLadder,
}

impl TechnicalStrategy {
    pub const fn new(ladder: LeverageLadder) -> Self {
        Self { ladder }
    }

    pub const fn ladder(&self) -> &LeverageLadder {
        &self.ladder
    }

    /// Score one asset's price history.
    ///
    /// Short histories yield a flagged neutral recommendation. Histories long
    /// enough to analyze must hold strictly positive prices.
    pub fn score(&self, symbol: &str, series: &PriceSeries) -> Result<Recommendation> {
        if series.len() < MIN_DATA_POINTS {
            tracing::debug!(symbol, points = series.len(), "not enough history, using neutral call");
            return Ok(self.neutral(symbol));
        }
        series.validate()?;

        let indicators = indicators::compute(&series.prices());
        let scores = tally(&indicators);
        let direction = scores.direction();
        let confidence = scores.confidence();
        let leverage = self
            .ladder
            .quantize(target_leverage(confidence, indicators.volatility));

        tracing::debug!(
            symbol,
            long = scores.long,
            short = scores.short,
            %direction,
            leverage,
            "technical score"
        );

        Ok(
            Recommendation::new(symbol, direction, leverage, confidence, RecommendationSource::Technical)
                .with_rationale(rationale(&indicators))
                .with_indicators(indicators),
        )
    }

    /// Conservative call for series too short to analyze
    pub fn neutral(&self, symbol: &str) -> Recommendation {
        Recommendation::new(
            symbol,
            Direction::Long,
            self.ladder.quantize(3.0),
            20.0,
            RecommendationSource::Technical,
        )
        .with_rationale("insufficient data for analysis, conservative recommendation")
        .with_indicators(Indicators::neutral())
    }
}

/// Apply the additive scoring rules
pub fn tally(indicators: &Indicators) -> SignalScores {
    let mut scores = SignalScores::default();

    let rsi = indicators.rsi;
    if rsi < OVERSOLD_RSI {
        scores.long += RSI_EXTREME_POINTS;
    } else if rsi > OVERBOUGHT_RSI {
        scores.short += RSI_EXTREME_POINTS;
    } else if rsi > 40.0 && rsi < 60.0 {
        scores.long += RSI_NEUTRAL_POINTS;
        scores.short += RSI_NEUTRAL_POINTS;
    }

    match indicators.trend {
        Trend::Up => scores.long += indicators.trend_confidence * 0.5,
        Trend::Down => scores.short += indicators.trend_confidence * 0.5,
        Trend::Sideways | Trend::Unknown => {}
    }

    let volatility_bonus = (indicators.volatility * 2.0).min(20.0);
    scores.long += volatility_bonus;
    scores.short += volatility_bonus;

    // Mean reversion after a big 24h move
    if indicators.price_change_24h > MOMENTUM_MOVE {
        scores.short += MOMENTUM_POINTS;
    } else if indicators.price_change_24h < -MOMENTUM_MOVE {
        scores.long += MOMENTUM_POINTS;
    }

    scores
}

/// Continuous leverage before snapping to the ladder
pub fn target_leverage(confidence: f64, volatility: f64) -> f64 {
    let base: u32 = if confidence > 80.0 {
        20
    } else if confidence > 60.0 {
        10
    } else if confidence > 40.0 {
        5
    } else {
        3
    };

    if volatility > HIGH_VOLATILITY {
        f64::from((base / 2).max(2))
    } else if volatility < LOW_VOLATILITY {
        (f64::from(base) * 1.5).min(50.0)
    } else {
        f64::from(base)
    }
}

fn rationale(indicators: &Indicators) -> String {
    let mut reasons = Vec::with_capacity(4);

    let rsi = indicators.rsi;
    reasons.push(match indicators::rsi::zone(rsi) {
        "neutral" => format!("RSI ({rsi:.1}) in neutral zone"),
        zone => format!("RSI ({rsi:.1}) {zone}"),
    });

    reasons.push(
        match indicators.trend {
            Trend::Up => "uptrend",
            Trend::Down => "downtrend",
            Trend::Sideways | Trend::Unknown => "sideways movement",
        }
        .to_string(),
    );

    let change = indicators.price_change_24h;
    if change.abs() > MOMENTUM_MOVE {
        reasons.push(format!("significant 24h move ({change:+.1}%)"));
    }

    let volatility = indicators.volatility;
    if volatility > HIGH_VOLATILITY {
        reasons.push(format!("high volatility ({volatility:.1}%)"));
    } else if volatility < LOW_VOLATILITY {
        reasons.push(format!("low volatility ({volatility:.1}%)"));
    }

    reasons.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;

    fn indicators(rsi: f64, volatility: f64, trend: Trend, trend_confidence: f64, change: f64) -> Indicators {
        Indicators {
            rsi,
            volatility,
            trend,
            trend_strength: trend_confidence / 10.0,
            trend_confidence,
            price_change_24h: change,
            insufficient_data: false,
        }
    }

    #[test]
    fn test_short_series_gets_neutral_call() {
        let strategy = TechnicalStrategy::default();
        let rec = strategy
            .score("BTC", &PriceSeries::from_prices([100.0; 19]))
            .unwrap();
        assert_eq!(rec.direction, Direction::Long);
        assert_eq!(rec.leverage, 3);
        assert!((rec.confidence - 20.0).abs() < f64::EPSILON);
        assert!(rec.insufficient_data);
        assert!(rec.rationale.contains("insufficient data"));
        let ind = rec.indicators.unwrap();
        assert_eq!(ind.trend, Trend::Unknown);
        assert!((ind.rsi - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flat_market() {
        let strategy = TechnicalStrategy::default();
        let rec = strategy
            .score("ETH", &PriceSeries::from_prices([3_000.0; 20]))
            .unwrap();

        // Both sides get the neutral-zone 10 points; the tie goes SHORT
        assert_eq!(rec.direction, Direction::Short);
        assert!((rec.confidence - 10.0).abs() < 1e-9);
        // base 3, scaled by 1.5 for low volatility => 4.5 => nearest rung 5
        assert_eq!(rec.leverage, 5);
        assert!(!rec.insufficient_data);
        assert!(rec.rationale.contains("neutral zone"));
        assert!(rec.rationale.contains("sideways"));
        assert!(rec.rationale.contains("low volatility"));
    }

    #[test]
    fn test_steady_rise_goes_long() {
        let strategy = TechnicalStrategy::default();
        let prices: Vec<f64> = (0..20).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let rec = strategy.score("SOL", &PriceSeries::from_prices(prices)).unwrap();

        let ind = rec.indicators.clone().unwrap();
        assert_eq!(ind.trend, Trend::Up);
        assert_eq!(rec.direction, Direction::Long);
        assert!(rec.rationale.contains("uptrend"));
        assert!(strategy.ladder().contains(rec.leverage));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let strategy = TechnicalStrategy::default();
        let mut prices = vec![10.0; 25];
        prices[3] = -1.0;
        let result = strategy.score("DOGE", &PriceSeries::from_prices(prices));
        assert!(matches!(result, Err(AdvisorError::NonPositivePrice { index: 3, .. })));
    }

    #[test]
    fn test_tally_rules() {
        let oversold = tally(&indicators(25.0, 0.0, Trend::Sideways, 0.0, 0.0));
        assert_eq!(oversold, SignalScores { long: 30.0, short: 0.0 });

        let overbought = tally(&indicators(75.0, 0.0, Trend::Sideways, 0.0, 0.0));
        assert_eq!(overbought, SignalScores { long: 0.0, short: 30.0 });

        // 35 sits between the zones and scores nothing
        let dead_band = tally(&indicators(35.0, 0.0, Trend::Sideways, 0.0, 0.0));
        assert_eq!(dead_band, SignalScores::default());

        let down = tally(&indicators(35.0, 0.0, Trend::Down, 80.0, 0.0));
        assert_eq!(down, SignalScores { long: 0.0, short: 40.0 });

        let pumped = tally(&indicators(35.0, 4.0, Trend::Sideways, 0.0, 7.0));
        assert_eq!(pumped, SignalScores { long: 8.0, short: 23.0 });

        let dumped = tally(&indicators(35.0, 50.0, Trend::Sideways, 0.0, -9.0));
        assert_eq!(dumped, SignalScores { long: 35.0, short: 20.0 });
    }

    #[test]
    fn test_confidence_clamped() {
        let scores = tally(&indicators(20.0, 30.0, Trend::Up, 100.0, -12.0));
        // 30 + 50 + 20 + 15
        assert!((scores.long - 115.0).abs() < 1e-9);
        assert!((scores.confidence() - 100.0).abs() < f64::EPSILON);
        assert_eq!(scores.direction(), Direction::Long);
    }

    #[test]
    fn test_target_leverage_bands() {
        assert!((target_leverage(85.0, 5.0) - 20.0).abs() < f64::EPSILON);
        assert!((target_leverage(65.0, 5.0) - 10.0).abs() < f64::EPSILON);
        assert!((target_leverage(45.0, 5.0) - 5.0).abs() < f64::EPSILON);
        assert!((target_leverage(40.0, 5.0) - 3.0).abs() < f64::EPSILON);

        // high volatility halves with integer division, floor 2
        assert!((target_leverage(45.0, 9.0) - 2.0).abs() < f64::EPSILON);
        assert!((target_leverage(20.0, 9.0) - 2.0).abs() < f64::EPSILON);
        assert!((target_leverage(85.0, 9.0) - 10.0).abs() < f64::EPSILON);

        // low volatility scales by 1.5
        assert!((target_leverage(85.0, 1.0) - 30.0).abs() < f64::EPSILON);
        assert!((target_leverage(65.0, 1.0) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rationale_clauses() {
        let text = rationale(&indicators(22.0, 9.5, Trend::Down, 40.0, -6.3));
        assert_eq!(
            text,
            "RSI (22.0) oversold, downtrend, significant 24h move (-6.3%), high volatility (9.5%)"
        );

        let text = rationale(&indicators(72.0, 5.0, Trend::Up, 40.0, 1.0));
        assert_eq!(text, "RSI (72.0) overbought, uptrend");
    }
}
