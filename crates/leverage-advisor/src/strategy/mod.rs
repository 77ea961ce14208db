//! Scoring Strategies
//!
//! Two independent pipelines that never share state:
//!
//! - [`TechnicalStrategy`] scores one asset's price history.
//! - [`MarketStrategy`] scores snapshots of many assets, and
//!   [`SelectionPolicy`] picks one of them.

pub mod market;
pub mod selection;
pub mod technical;

pub use market::MarketStrategy;
pub use selection::{ScoredCandidate, SelectionPolicy};
pub use technical::{SignalScores, TechnicalStrategy};
