//! Selection Policy
//!
//! Picks one asset out of many scored snapshots: rank by score, keep the
//! top K, then choose uniformly among them. Randomized on purpose so the
//! same market does not always produce the same pick.

use serde::{Deserialize, Serialize};

use crate::entropy::Entropy;
use crate::leverage::LeverageLadder;
use crate::model::{Direction, MarketSnapshot, Recommendation, RecommendationSource};

use super::market::MarketStrategy;

pub const DEFAULT_TOP_K: usize = 5;

/// Confidence reported by the data-starved fallback
pub const FALLBACK_CONFIDENCE: f64 = 40.0;

/// Symbol used when even the fallback has no universe to draw from
pub const DEFAULT_SYMBOL: &str = "BTC";

/// An asset with its opportunity score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub symbol: String,
    pub snapshot: MarketSnapshot,
    pub score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionPolicy {
    top_k: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl SelectionPolicy {
    /// `top_k` of zero is treated as one
    pub fn new(top_k: usize) -> Self {
        Self { top_k: top_k.max(1) }
    }

    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Sort descending by score (NaN last, ties keep input order) and keep
    /// the best `top_k`
    pub fn shortlist(&self, mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        let rank = |c: &ScoredCandidate| if c.score.is_nan() { f64::NEG_INFINITY } else { c.score };
        candidates.sort_by(|a, b| rank(b).total_cmp(&rank(a)));
        candidates.truncate(self.top_k);
        candidates
    }

    /// Uniform pick among the shortlist; `None` only for empty input
    pub fn select<E: Entropy + ?Sized>(
        &self,
        candidates: Vec<ScoredCandidate>,
        entropy: &mut E,
    ) -> Option<ScoredCandidate> {
        let mut shortlist = self.shortlist(candidates);
        if shortlist.is_empty() {
            return None;
        }
        let index = entropy.index(shortlist.len());
        Some(shortlist.swap_remove(index))
    }

    /// Full snapshot pipeline: score every snapshot, select, build.
    ///
    /// `universe` is only used by the fallback when there are no snapshots.
    pub fn recommend<E, S>(
        &self,
        market: &MarketStrategy,
        snapshots: Vec<(String, MarketSnapshot)>,
        universe: &[S],
        entropy: &mut E,
    ) -> Recommendation
    where
        E: Entropy + ?Sized,
        S: AsRef<str>,
    {
        let candidates: Vec<ScoredCandidate> = snapshots
            .into_iter()
            .map(|(symbol, snapshot)| {
                let score = market.score_snapshot(&snapshot, &mut *entropy);
                tracing::debug!(%symbol, score, "scored snapshot");
                ScoredCandidate { symbol, snapshot, score }
            })
            .collect();
        let analyzed = candidates.len();

        match self.select(candidates, entropy) {
            Some(pick) => {
                tracing::info!(
                    analyzed,
                    symbol = %pick.symbol,
                    score = pick.score,
                    "selected market opportunity"
                );
                market.build_recommendation(&pick.symbol, &pick.snapshot, pick.score, entropy)
            }
            None => {
                tracing::warn!("no market data to score, using fallback");
                fallback(universe, market.ladder(), entropy)
            }
        }
    }
}

/// Random asset, random rung, random direction, confidence 40
pub fn fallback<E, S>(universe: &[S], ladder: &LeverageLadder, entropy: &mut E) -> Recommendation
where
    E: Entropy + ?Sized,
    S: AsRef<str>,
{
    let symbol = if universe.is_empty() {
        DEFAULT_SYMBOL
    } else {
        universe[entropy.index(universe.len())].as_ref()
    };
    let leverage = ladder.pick(entropy);
    let direction = Direction::ALL[entropy.index(Direction::ALL.len())];

    Recommendation::new(symbol, direction, leverage, FALLBACK_CONFIDENCE, RecommendationSource::Fallback)
        .with_rationale("insufficient market data, conservative recommendation")
        .insufficient()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::RandEntropy;
    use crate::entropy::testing::ScriptedEntropy;
    use rust_decimal_macros::dec;

    fn candidate(symbol: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            symbol: symbol.into(),
            snapshot: MarketSnapshot::default(),
            score,
        }
    }

    fn symbols(list: &[ScoredCandidate]) -> Vec<&str> {
        list.iter().map(|c| c.symbol.as_str()).collect()
    }

    #[test]
    fn test_shortlist_keeps_top_five() {
        let policy = SelectionPolicy::default();
        let list = policy.shortlist(vec![
            candidate("A", 50.0),
            candidate("B", 90.0),
            candidate("C", f64::NAN),
            candidate("D", 70.0),
            candidate("E", 20.0),
            candidate("F", 85.0),
            candidate("G", 70.0),
        ]);
        assert_eq!(symbols(&list), vec!["B", "F", "D", "G", "A"]);
    }

    #[test]
    fn test_shortlist_smaller_than_k() {
        let policy = SelectionPolicy::new(5);
        let list = policy.shortlist(vec![candidate("A", 1.0), candidate("B", 2.0)]);
        assert_eq!(symbols(&list), vec!["B", "A"]);
        assert_eq!(SelectionPolicy::new(0).top_k(), 1);
    }

    #[test]
    fn test_select_uses_entropy_index() {
        let policy = SelectionPolicy::default();
        let candidates = vec![candidate("A", 10.0), candidate("B", 30.0), candidate("C", 20.0)];
        let mut entropy = ScriptedEntropy::new().indices(&[1]);
        let pick = policy.select(candidates, &mut entropy).unwrap();
        assert_eq!(pick.symbol, "C");
    }

    #[test]
    fn test_select_never_leaves_candidate_set() {
        let policy = SelectionPolicy::default();
        let mut entropy = RandEntropy::seeded(99);
        let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
        for _ in 0..200 {
            let candidates = names
                .iter()
                .enumerate()
                .map(|(i, n)| candidate(n, f64::from(u32::try_from(i).unwrap()) * 10.0))
                .collect();
            let pick = policy.select(candidates, &mut entropy).unwrap();
            // Only the five highest (D..H) can be drawn
            assert!(["D", "E", "F", "G", "H"].contains(&pick.symbol.as_str()));
        }
        assert!(policy.select(Vec::new(), &mut entropy).is_none());
    }

    #[test]
    fn test_recommend_without_snapshots_falls_back() {
        let policy = SelectionPolicy::default();
        let market = MarketStrategy::default();
        let universe = ["BTC", "ETH", "SOL"];
        let mut entropy = RandEntropy::seeded(1);

        let rec = policy.recommend(&market, Vec::new(), &universe, &mut entropy);
        assert!((rec.confidence - 40.0).abs() < f64::EPSILON);
        assert_eq!(rec.source, RecommendationSource::Fallback);
        assert!(rec.insufficient_data);
        assert!(universe.contains(&rec.symbol.as_str()));
        assert!(market.ladder().contains(rec.leverage));
    }

    #[test]
    fn test_fallback_with_empty_universe() {
        let universe: [&str; 0] = [];
        let rec = fallback(&universe, &LeverageLadder::default(), &mut ScriptedEntropy::new());
        assert_eq!(rec.symbol, DEFAULT_SYMBOL);
        assert_eq!(rec.leverage, 1);
        assert_eq!(rec.direction, Direction::Long);
    }

    #[test]
    fn test_recommend_picks_from_snapshots() {
        let policy = SelectionPolicy::default();
        let market = MarketStrategy::default();
        let snapshots = vec![
            ("BTC".to_string(), MarketSnapshot::new(dec!(97500), -10.0).with_volume(dec!(2_000_000_000))),
            ("ETH".to_string(), MarketSnapshot::new(dec!(3450), 1.0)),
        ];
        let mut entropy = RandEntropy::seeded(8);
        for _ in 0..20 {
            let rec = policy.recommend(&market, snapshots.clone(), &["XRP"], &mut entropy);
            assert!(rec.symbol == "BTC" || rec.symbol == "ETH");
            assert_eq!(rec.source, RecommendationSource::Market);
            assert!(rec.snapshot.is_some());
            if rec.symbol == "BTC" {
                assert_eq!(rec.direction, Direction::Long);
            }
        }
    }
}
