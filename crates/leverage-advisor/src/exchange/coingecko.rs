//! CoinGecko Client
//!
//! Fetches snapshots from `/simple/price` and hourly histories from
//! `/coins/{id}/market_chart`. Requests are spaced out to stay under the
//! public rate limit.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use super::MarketDataClient;
use crate::config::CoinGeckoConfig;
use crate::error::{AdvisorError, Result};
use crate::model::{MarketSnapshot, PriceSeries};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// One entry of a `/simple/price` response
#[derive(Debug, Default, Deserialize)]
struct SimplePrice {
    #[serde(default)]
    usd: Option<f64>,
    #[serde(default)]
    usd_24h_change: Option<f64>,
    #[serde(default)]
    usd_24h_vol: Option<f64>,
    #[serde(default)]
    usd_market_cap: Option<f64>,
}

impl SimplePrice {
    fn into_snapshot(self) -> MarketSnapshot {
        MarketSnapshot {
            price_usd: money(self.usd),
            change_24h: self.usd_24h_change.filter(|c| c.is_finite()).unwrap_or(0.0),
            volume_24h: money(self.usd_24h_vol),
            market_cap: money(self.usd_market_cap),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

fn money(value: Option<f64>) -> Decimal {
    value.and_then(Decimal::from_f64).unwrap_or(Decimal::ZERO)
}

/// Parse a `/simple/price` body; missing fields become zero
pub(crate) fn parse_snapshots(body: &str) -> Result<HashMap<String, MarketSnapshot>> {
    let raw: HashMap<String, SimplePrice> = serde_json::from_str(body)?;
    Ok(raw
        .into_iter()
        .map(|(id, entry)| (id, entry.into_snapshot()))
        .collect())
}

/// Parse a `/market_chart` body into a series
pub(crate) fn parse_history(body: &str) -> Result<PriceSeries> {
    let chart: MarketChart = serde_json::from_str(body)?;
    #[allow(clippy::cast_possible_truncation)]
    let pairs: Vec<(i64, f64)> = chart
        .prices
        .into_iter()
        .map(|(ts, price)| (ts as i64, price))
        .collect();
    Ok(PriceSeries::from_pairs(&pairs))
}

/// CoinGecko REST client
pub struct CoinGeckoClient {
    http: reqwest::Client,
    config: CoinGeckoConfig,
    last_request: Mutex<Option<Instant>>,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| AdvisorError::Config(format!("invalid CoinGecko API key: {e}")))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            config,
            last_request: Mutex::new(None),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(CoinGeckoConfig::from_env()?)
    }

    /// Wait until the minimum spacing since the previous request has passed
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        let interval: Duration = self.config.min_request_interval();
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        self.throttle().await;
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(%url, "market data request");

        let body = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl MarketDataClient for CoinGeckoClient {
    async fn price_history(&self, coin_id: &str, days: u32) -> Result<PriceSeries> {
        let interval = if days <= 30 { "hourly" } else { "daily" };
        let body = self
            .get_text(
                &format!("/coins/{coin_id}/market_chart"),
                &[
                    ("vs_currency", "usd".to_string()),
                    ("days", days.to_string()),
                    ("interval", interval.to_string()),
                ],
            )
            .await?;
        parse_history(&body)
    }

    async fn snapshots(&self, coin_ids: &[&str]) -> Result<HashMap<String, MarketSnapshot>> {
        if coin_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let body = self
            .get_text(
                "/simple/price",
                &[
                    ("ids", coin_ids.join(",")),
                    ("vs_currencies", "usd".to_string()),
                    ("include_24hr_change", "true".to_string()),
                    ("include_24hr_vol", "true".to_string()),
                    ("include_market_cap", "true".to_string()),
                ],
            )
            .await?;
        parse_snapshots(&body)
    }

    async fn health_check(&self) -> bool {
        match self.get_text("/ping", &[]).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("CoinGecko ping failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}
