//! Market Snapshot Strategy
//!
//! Scores an asset from a single snapshot (24h change, volume, market cap).
//! Two random terms are added on purpose so that repeated calls on the same
//! market spread across assets instead of always naming the same one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::entropy::Entropy;
use crate::leverage::LeverageLadder;
use crate::model::{Direction, MarketSnapshot, Recommendation, RecommendationSource};

/// Lowest score a snapshot can receive
pub const MIN_SCORE: f64 = 20.0;

const BASE_RANGE: (f64, f64) = (45.0, 55.0);
const JITTER_RANGE: (f64, f64) = (-10.0, 15.0);
const MAX_CONFIDENCE_LEVERAGE: (u32, u32) = (75, 100);

const DROP_BOUNCE: f64 = -5.0;
const RISE_CORRECTION: f64 = 8.0;

/// Deterministic part of the score: change, volume and market cap points
pub fn snapshot_points(snapshot: &MarketSnapshot) -> f64 {
    let move_size = snapshot.change_24h.abs();
    let change_points = if move_size > 8.0 {
        20.0
    } else if move_size > 4.0 {
        15.0
    } else if move_size > 2.0 {
        10.0
    } else {
        5.0
    };

    let volume_points = volume_points(snapshot.volume_24h);
    let cap_points = market_cap_points(snapshot.market_cap);

    change_points + volume_points + cap_points
}

fn volume_points(volume: Decimal) -> f64 {
    if volume > dec!(1_000_000_000) {
        10.0
    } else if volume > dec!(100_000_000) {
        5.0
    } else {
        0.0
    }
}

fn market_cap_points(cap: Decimal) -> f64 {
    if cap > dec!(50_000_000_000) {
        8.0
    } else if cap > dec!(10_000_000_000) {
        5.0
    } else {
        0.0
    }
}

/// Snapshot-based scorer
#[derive(Clone, Debug, Default)]
pub struct MarketStrategy {
    ladder: LeverageLadder,
}

impl MarketStrategy {
    pub const fn new(ladder: LeverageLadder) -> Self {
        Self { ladder }
    }

    pub const fn ladder(&self) -> &LeverageLadder {
        &self.ladder
    }

    /// Opportunity score: random base in [45, 55], snapshot points, random
    /// jitter in [-10, 15], floored at 20. No upper bound here.
    pub fn score_snapshot<E: Entropy + ?Sized>(&self, snapshot: &MarketSnapshot, entropy: &mut E) -> f64 {
        let base = entropy.uniform(BASE_RANGE.0, BASE_RANGE.1);
        let points = snapshot_points(snapshot);
        let jitter = entropy.uniform(JITTER_RANGE.0, JITTER_RANGE.1);
        (base + points + jitter).max(MIN_SCORE)
    }

    /// Turn a selected snapshot and its score into a recommendation.
    ///
    /// Big drops are played LONG, big rises SHORT; anything in between gets a
    /// random direction.
    pub fn build_recommendation<E: Entropy + ?Sized>(
        &self,
        symbol: &str,
        snapshot: &MarketSnapshot,
        score: f64,
        entropy: &mut E,
    ) -> Recommendation {
        let change = snapshot.change_24h;
        let (direction, rationale) = if change < DROP_BOUNCE {
            (
                Direction::Long,
                format!("drop of {:.1}% in 24h - bounce potential", change.abs()),
            )
        } else if change > RISE_CORRECTION {
            (
                Direction::Short,
                format!("rise of {change:.1}% in 24h - correction likely"),
            )
        } else {
            (
                Direction::ALL[entropy.index(Direction::ALL.len())],
                format!("stable change ({change:+.1}%), technical read"),
            )
        };

        let confidence = score.min(100.0);
        let target = self.target_leverage(confidence, entropy);
        let leverage = self.ladder.quantize(target);

        Recommendation::new(symbol, direction, leverage, confidence, RecommendationSource::Market)
            .with_rationale(rationale)
            .with_snapshot(snapshot.clone())
    }

    /// Continuous leverage for a confidence level; full confidence draws a
    /// random integer in [75, 100]
    pub fn target_leverage<E: Entropy + ?Sized>(&self, confidence: f64, entropy: &mut E) -> f64 {
        if confidence >= 100.0 {
            f64::from(entropy.int_inclusive(MAX_CONFIDENCE_LEVERAGE.0, MAX_CONFIDENCE_LEVERAGE.1))
        } else if confidence >= 90.0 {
            50.0
        } else if confidence >= 80.0 {
            25.0
        } else {
            2.0 + (confidence / 80.0) * (25.0 - 2.0)
        }
    }
}
