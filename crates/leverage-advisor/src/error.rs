//! Error Types for the Leverage Advisor
//!
//! Insufficient data is never an error here: indicators and scorers fall
//! back to neutral values instead. These variants cover caller precondition
//! violations and failures of the market-data collaborator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Leverage ladder must contain at least one value")]
    EmptyLadder,

    #[error("Invalid price {price} at index {index}: prices must be positive and finite")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("Ticker not supported: {0}")]
    UnknownTicker(String),

    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdvisorError {
    /// Errors caused by the upstream data source rather than by the caller
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::MarketData(_) | Self::Network(_) | Self::Serialization(_)
        )
    }
}
