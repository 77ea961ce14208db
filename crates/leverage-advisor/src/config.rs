//! Configuration
//!
//! Everything is read from environment variables (the binary loads `.env`
//! first), with defaults that match the public CoinGecko demo tier.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::leverage::LeverageLadder;
use crate::strategy::selection::DEFAULT_TOP_K;

/// Default symbol → CoinGecko id table
pub const DEFAULT_TICKERS: [(&str, &str); 12] = [
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("XRP", "ripple"),
    ("BNB", "binancecoin"),
    ("SOL", "solana"),
    ("USDC", "usd-coin"),
    ("stETH", "staked-ether"),
    ("TRX", "tron"),
    ("DOGE", "dogecoin"),
    ("ADA", "cardano"),
    ("SUI", "sui"),
    ("XLM", "stellar"),
];

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// Ordered symbol ↔ market-data id table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMap {
    entries: Vec<(String, String)>,
}

impl Default for TickerMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TICKERS
                .iter()
                .map(|(s, id)| ((*s).to_string(), (*id).to_string()))
                .collect(),
        }
    }
}

impl TickerMap {
    /// Later duplicates of a symbol are dropped
    pub fn new<S, I>(entries: impl IntoIterator<Item = (S, I)>) -> Self
    where
        S: Into<String>,
        I: Into<String>,
    {
        let mut map = Self { entries: Vec::new() };
        for (symbol, id) in entries {
            let symbol = symbol.into();
            if map.coin_id(&symbol).is_none() {
                map.entries.push((symbol, id.into()));
            }
        }
        map
    }

    /// Parse `SYM:coin-id,SYM:coin-id`
    pub fn parse(spec: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (symbol, id) = item
                .split_once(':')
                .map(|(s, i)| (s.trim(), i.trim()))
                .filter(|(s, i)| !s.is_empty() && !i.is_empty())
                .ok_or_else(|| AdvisorError::Config(format!("bad ticker entry '{item}', expected SYMBOL:coin-id")))?;
            pairs.push((symbol.to_string(), id.to_string()));
        }
        if pairs.is_empty() {
            return Err(AdvisorError::Config("ticker list is empty".into()));
        }
        Ok(Self::new(pairs))
    }

    /// Market-data id for a symbol; case-insensitive
    pub fn coin_id(&self, symbol: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
            .map(|(_, id)| id.as_str())
    }

    /// Canonical symbol spelling, e.g. `steth` → `stETH`
    pub fn canonical(&self, symbol: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
            .map(|(s, _)| s.as_str())
    }

    pub fn symbol_for(&self, coin_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, id)| id == coin_id)
            .map(|(s, _)| s.as_str())
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|(s, _)| s.as_str()).collect()
    }

    pub fn coin_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, id)| id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, id)| (s.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scoring and orchestration settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub tickers: TickerMap,
    pub ladder: LeverageLadder,

    /// Size of the randomized shortlist
    pub top_k: usize,

    /// Days of history fetched for technical scoring
    pub history_days: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            tickers: TickerMap::default(),
            ladder: LeverageLadder::default(),
            top_k: DEFAULT_TOP_K,
            history_days: 7,
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(spec) = env::var("ADVISOR_TICKERS") {
            config.tickers = TickerMap::parse(&spec)?;
        }
        if let Ok(spec) = env::var("ADVISOR_LEVERAGES") {
            config.ladder = parse_ladder(&spec)?;
        }
        if let Some(top_k) = parse_var("ADVISOR_TOP_K")? {
            config.top_k = top_k;
        }
        if let Some(days) = parse_var("ADVISOR_HISTORY_DAYS")? {
            config.history_days = days;
        }

        Ok(config)
    }
}

/// CoinGecko client settings
#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    pub base_url: String,

    /// Demo key, sent as `x-cg-demo-api-key`
    pub api_key: Option<String>,

    pub timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COINGECKO_URL.into(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl CoinGeckoConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("COINGECKO_BASE_URL").unwrap_or_else(|_| DEFAULT_COINGECKO_URL.into());
        let api_key = env::var("COINGECKO_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let timeout_secs = parse_var("COINGECKO_TIMEOUT_SECS")?.unwrap_or(10);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs,
        })
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Spacing between requests: the demo key allows far more calls per
    /// minute than anonymous access
    pub const fn min_request_interval(&self) -> Duration {
        if self.api_key.is_some() {
            Duration::from_millis(200)
        } else {
            Duration::from_millis(1_500)
        }
    }
}

/// Parse `1,2,5,10` into a ladder
pub fn parse_ladder(spec: &str) -> Result<LeverageLadder> {
    let steps = spec
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim_start_matches(['x', 'X'])
                .parse::<u32>()
                .map_err(|e| AdvisorError::Config(format!("bad leverage '{s}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    LeverageLadder::new(steps)
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AdvisorError::Config(format!("{name}: {e}"))),
        Err(_) => Ok(None),
    }
}
