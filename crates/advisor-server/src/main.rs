//! leverage-advisor HTTP Server
//!
//! Axum-based REST API serving leveraged trade recommendations.
//! Market data comes from CoinGecko, or from the built-in mock when
//! `MARKET_DATA=mock`.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leverage_advisor::exchange::{CoinGeckoClient, MarketDataClient, MockMarketData};
use leverage_advisor::{Advisor, AdvisorConfig};

use crate::handlers::{
    batch_recommendations, health_check, list_tickers, market_recommendation, random_recommendation,
    technical_recommendation,
};
use crate::state::{AppState, SharedClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = AdvisorConfig::from_env()?;
    let client = market_data_from_env()?;

    // Verify market data connection
    if client.health_check().await {
        tracing::info!("✓ Connected to {}", client.name());
    } else {
        tracing::warn!("⚠ {} not reachable - recommendations will fall back", client.name());
    }
    tracing::info!(
        "Tracking {} tickers, leverage ladder {:?}",
        config.tickers.len(),
        config.ladder.steps()
    );

    let state = AppState::new(Advisor::new(client, config));
    let app = router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 leverage-advisor server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                              - Health check");
    tracing::info!("  GET  /api/tickers                         - Supported tickers");
    tracing::info!("  GET  /api/recommendation                  - Market snapshot pick");
    tracing::info!("  GET  /api/recommendation/technical?ticker= - Indicator pick");
    tracing::info!("  GET  /api/recommendation/random           - Random pick");
    tracing::info!("  GET  /api/recommendations?count=          - Batch of market picks");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Per-step price noise of the demo mock, percent
const MOCK_VARIANCE_PERCENT: f64 = 1.5;

/// Pick the market data source from `MARKET_DATA`
fn market_data_from_env() -> anyhow::Result<SharedClient> {
    let source = std::env::var("MARKET_DATA").unwrap_or_else(|_| "coingecko".into());
    market_data(&source)
}

fn market_data(source: &str) -> anyhow::Result<SharedClient> {
    match source.trim().to_ascii_lowercase().as_str() {
        "mock" => Ok(Arc::new(MockMarketData::with_variance(MOCK_VARIANCE_PERCENT))),
        "coingecko" => Ok(Arc::new(CoinGeckoClient::from_env()?)),
        other => anyhow::bail!("unknown MARKET_DATA source '{other}', expected coingecko or mock"),
    }
}

fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/tickers", get(list_tickers))

        // Recommendations
        .route("/api/recommendation", get(market_recommendation))
        .route("/api/recommendation/technical", get(technical_recommendation))
        .route("/api/recommendation/random", get(random_recommendation))
        .route("/api/recommendations", get(batch_recommendations))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
