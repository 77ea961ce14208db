//! # leverage-advisor
//!
//! Heuristic trade-suggestion engine for leveraged crypto positions.
//! Every recommendation is a triple of asset, direction and leverage drawn
//! from a fixed ladder, plus a 0-100 confidence score.
//!
//! ## Pipelines
//!
//! - **Technical** - RSI, volatility and moving-average trend over an hourly
//!   price history, tallied into long/short scores
//! - **Market** - 24h change, volume and market cap from a snapshot, with
//!   deliberate jitter, then a random pick among the top K
//! - **Fallback** - conservative defaults whenever data is missing
//!
//! ## Example
//!
//! [`report::render`] output for a technical pick:
//!
//! ```text
//! ADA + x10 + LONG
//! Confidence: 73/100 [HIGH]
//! Source: technical analysis
//! Rationale: RSI (27.4) oversold, uptrend, significant 24h move (-6.5%)
//! Indicators: RSI 27.4, volatility 4.20%, trend UP (40%), 24h -6.50%
//! Market: $0.95 (-6.50% 24h), volume $900000000, cap $33500000000
//! Position size: 3-5% of deposit
//! Stop-loss: 4-6%
//! Take-profit: 10-20%
//! ```
//!
//! Scores are heuristics, not probabilities. Nothing here places orders.

pub mod advisor;
pub mod config;
pub mod entropy;
pub mod error;
pub mod exchange;
pub mod indicators;
pub mod leverage;
pub mod model;
pub mod report;
pub mod strategy;

pub use advisor::Advisor;
pub use config::{AdvisorConfig, CoinGeckoConfig, TickerMap};
pub use entropy::{Entropy, RandEntropy};
pub use error::{AdvisorError, Result};
pub use leverage::{DEFAULT_LEVERAGES, LeverageLadder};
pub use model::{
    Direction, Indicators, MarketSnapshot, PricePoint, PriceSeries, Recommendation, RecommendationSource, Trend,
};
pub use report::TradingGuidance;
pub use strategy::{MarketStrategy, SelectionPolicy, TechnicalStrategy};
