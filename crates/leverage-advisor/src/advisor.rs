//! Advisor
//!
//! Wires a market-data client to the scoring pipelines. Fetching is async;
//! every scoring step runs synchronously once its data is in hand.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::config::AdvisorConfig;
use crate::entropy::Entropy;
use crate::error::{AdvisorError, Result};
use crate::exchange::MarketDataClient;
use crate::model::{Direction, MarketSnapshot, Recommendation, RecommendationSource};
use crate::strategy::{MarketStrategy, SelectionPolicy, TechnicalStrategy, selection};

/// Symbol, leverage and confidence of the conservative technical fallback
const TECHNICAL_FALLBACK: (&str, u32, f64) = ("BTC", 5, 40.0);

/// Recommendation service over one market-data client
pub struct Advisor<C: MarketDataClient> {
    client: C,
    config: AdvisorConfig,
    technical: TechnicalStrategy,
    market: MarketStrategy,
    selection: SelectionPolicy,
}

impl<C: MarketDataClient> Advisor<C> {
    pub fn new(client: C, config: AdvisorConfig) -> Self {
        Self {
            technical: TechnicalStrategy::new(config.ladder.clone()),
            market: MarketStrategy::new(config.ladder.clone()),
            selection: SelectionPolicy::new(config.top_k),
            client,
            config,
        }
    }

    pub const fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Snapshot pipeline: score every configured ticker, pick among the
    /// top K. Missing or failed data resolves to the random fallback.
    pub async fn market_recommendation<E: Entropy + ?Sized>(&self, entropy: &mut E) -> Recommendation {
        let ids = self.config.tickers.coin_ids();
        let snapshots = match self.client.snapshots(&ids).await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(source = self.client.name(), "snapshot fetch failed: {}", e);
                Default::default()
            }
        };

        // Keep ticker-table order so seeded runs are reproducible
        let mut ordered = Vec::with_capacity(snapshots.len());
        let mut snapshots = snapshots;
        for (symbol, id) in self.config.tickers.iter() {
            if let Some(snapshot) = snapshots.remove(id) {
                ordered.push((symbol.to_string(), snapshot));
            }
        }

        let universe = self.config.tickers.symbols();
        self.selection.recommend(&self.market, ordered, &universe, entropy)
    }

    /// Technical pipeline for one ticker, or for every ticker keeping the
    /// highest confidence (first wins on ties).
    ///
    /// Unknown tickers are an error; unusable history degrades to a
    /// conservative fallback.
    pub async fn technical_recommendation(&self, ticker: Option<&str>) -> Result<Recommendation> {
        let targets: Vec<(String, String)> = match ticker {
            Some(t) => {
                let symbol = self
                    .config
                    .tickers
                    .canonical(t)
                    .ok_or_else(|| AdvisorError::UnknownTicker(t.to_string()))?;
                let id = self.config.tickers.coin_id(symbol).unwrap_or_default();
                vec![(symbol.to_string(), id.to_string())]
            }
            None => self
                .config
                .tickers
                .iter()
                .map(|(s, id)| (s.to_string(), id.to_string()))
                .collect(),
        };

        // (recommendation, coin id, last observed price)
        let mut best: Option<(Recommendation, String, Option<f64>)> = None;
        for (symbol, id) in &targets {
            let series = match self.client.price_history(id, self.config.history_days).await {
                Ok(series) if !series.is_empty() => series,
                Ok(_) => {
                    tracing::warn!(%symbol, "empty price history");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(%symbol, "price history fetch failed: {}", e);
                    continue;
                }
            };

            let rec = match self.technical.score(symbol, &series) {
                Ok(rec) => rec,
                Err(e) => {
                    tracing::warn!(%symbol, "skipping unusable history: {}", e);
                    continue;
                }
            };

            if best.as_ref().is_none_or(|(b, _, _)| rec.confidence > b.confidence) {
                best = Some((rec, id.clone(), series.last_price()));
            }
        }

        let Some((rec, id, last_price)) = best else {
            tracing::warn!("no usable price history, using conservative fallback");
            return Ok(self.technical_fallback());
        };

        let snapshot = self.current_snapshot(&rec, &id, last_price).await;
        tracing::info!(symbol = %rec.symbol, confidence = rec.confidence, "technical pick");
        Ok(match snapshot {
            Some(snapshot) => rec.with_snapshot(snapshot),
            None => rec,
        })
    }

    /// Live snapshot for the picked asset; falls back to the last history
    /// price when the snapshot fetch fails
    async fn current_snapshot(
        &self,
        rec: &Recommendation,
        coin_id: &str,
        last_price: Option<f64>,
    ) -> Option<MarketSnapshot> {
        let reason = match self.client.snapshots(&[coin_id]).await {
            Ok(mut map) => match map.remove(coin_id) {
                Some(snapshot) => return Some(snapshot),
                None => "no snapshot returned".to_string(),
            },
            Err(e) => e.to_string(),
        };

        tracing::warn!(symbol = %rec.symbol, "using last history price: {}", reason);
        let price = last_price.and_then(Decimal::from_f64)?;
        let change = rec.indicators.as_ref().map_or(0.0, |ind| ind.price_change_24h);
        Some(MarketSnapshot::new(price, change))
    }

    /// Ticker, leverage and direction drawn at random; confidence 30-70
    pub fn random_recommendation<E: Entropy + ?Sized>(&self, entropy: &mut E) -> Recommendation {
        let symbols = self.config.tickers.symbols();
        let symbol = if symbols.is_empty() {
            selection::DEFAULT_SYMBOL
        } else {
            symbols[entropy.index(symbols.len())]
        };
        let leverage = self.config.ladder.pick(entropy);
        let direction = Direction::ALL[entropy.index(Direction::ALL.len())];
        let confidence = f64::from(entropy.int_inclusive(30, 70));

        Recommendation::new(symbol, direction, leverage, confidence, RecommendationSource::Random)
            .with_rationale("random recommendation")
    }

    /// `count` independent market recommendations
    pub async fn batch<E: Entropy + ?Sized>(&self, count: usize, entropy: &mut E) -> Vec<Recommendation> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.market_recommendation(entropy).await);
        }
        out
    }

    fn technical_fallback(&self) -> Recommendation {
        let (symbol, leverage, confidence) = TECHNICAL_FALLBACK;
        Recommendation::new(
            symbol,
            Direction::Long,
            self.config.ladder.quantize(f64::from(leverage)),
            confidence,
            RecommendationSource::Fallback,
        )
        .with_rationale("conservative recommendation, market data unavailable")
        .insufficient()
    }
}
