//! HTTP Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use leverage_advisor::exchange::MarketDataClient;
use leverage_advisor::{AdvisorError, RandEntropy, Recommendation, TradingGuidance, report};

use crate::state::AppState;

/// Upper bound for `/api/recommendations?count=`
pub const MAX_BATCH: usize = 20;
pub const DEFAULT_BATCH: usize = 5;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub market_data: String,
    pub market_data_connected: bool,
}

#[derive(Debug, Serialize)]
pub struct TickerInfo {
    pub symbol: String,
    pub coin_id: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub headline: String,
    pub badge: &'static str,
    pub guidance: TradingGuidance,
    pub report: String,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            headline: recommendation.headline(),
            badge: report::confidence_badge(recommendation.confidence),
            guidance: TradingGuidance::for_recommendation(&recommendation),
            report: report::render(&recommendation),
            recommendation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct TechnicalQuery {
    #[serde(default)]
    pub ticker: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    #[serde(default)]
    pub count: Option<usize>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn advisor_error(err: &AdvisorError) -> ApiError {
    match err {
        AdvisorError::UnknownTicker(_) => api_error(StatusCode::BAD_REQUEST, err.to_string(), "UNKNOWN_TICKER"),
        e if e.is_upstream() => {
            tracing::error!("Market data error: {}", e);
            api_error(StatusCode::BAD_GATEWAY, e.to_string(), "MARKET_DATA_ERROR")
        }
        e => {
            tracing::error!("Advisor error: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), "INTERNAL_ERROR")
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let client = state.advisor.client();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        market_data: client.name().to_string(),
        market_data_connected: client.health_check().await,
    })
}

/// Supported tickers in configured order
pub async fn list_tickers(State(state): State<AppState>) -> Json<Vec<TickerInfo>> {
    Json(
        state
            .advisor
            .config()
            .tickers
            .iter()
            .map(|(symbol, coin_id)| TickerInfo {
                symbol: symbol.to_string(),
                coin_id: coin_id.to_string(),
            })
            .collect(),
    )
}

/// Snapshot-based recommendation across all tickers
pub async fn market_recommendation(State(state): State<AppState>) -> Json<RecommendationResponse> {
    let mut entropy = RandEntropy::fresh();
    let rec = state.advisor.market_recommendation(&mut entropy).await;
    Json(rec.into())
}

/// Indicator-based recommendation, optionally for one ticker
pub async fn technical_recommendation(
    State(state): State<AppState>,
    Query(query): Query<TechnicalQuery>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let ticker = query.ticker.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let rec = state
        .advisor
        .technical_recommendation(ticker)
        .await
        .map_err(|e| advisor_error(&e))?;
    Ok(Json(rec.into()))
}

/// Random recommendation
pub async fn random_recommendation(State(state): State<AppState>) -> Json<RecommendationResponse> {
    let mut entropy = RandEntropy::fresh();
    Json(state.advisor.random_recommendation(&mut entropy).into())
}

/// Several independent market recommendations
pub async fn batch_recommendations(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<Vec<RecommendationResponse>>, ApiError> {
    let count = query.count.unwrap_or(DEFAULT_BATCH);
    if !(1..=MAX_BATCH).contains(&count) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("count must be between 1 and {MAX_BATCH}"),
            "INVALID_COUNT",
        ));
    }

    let mut entropy = RandEntropy::fresh();
    let recs = state.advisor.batch(count, &mut entropy).await;
    Ok(Json(recs.into_iter().map(Into::into).collect()))
}
