use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use screener_core::{AnalysisConfig, AnalysisReport, Mode, PricePoint};
use serde::Deserialize;
use std::sync::Arc;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_series))
        .route("/analyze/{symbol}", get(analyze_symbol))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AnalyzeRequest {
    points: Vec<PricePoint>,
    /// Overrides the server configuration for this request.
    #[serde(default)]
    config: Option<AnalysisConfig>,
}

async fn analyze_series(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let config = req.config.unwrap_or_else(|| state.config.clone());
    let (series, result) = screener_engine::analyze_points(req.points, &config)?;
    Ok(Json(AnalysisReport::new(&series, &result, &config)))
}

#[derive(Deserialize)]
struct SymbolQuery {
    #[serde(default)]
    mode: Mode,
}

async fn analyze_symbol(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<SymbolQuery>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let source = state.source.as_deref().ok_or(ApiError::NoSource)?;
    let (series, result) =
        screener_engine::analyze_symbol(source, &symbol, query.mode, &state.config).await?;
    Ok(Json(
        AnalysisReport::new(&series, &result, &state.config).with_symbol(&symbol, query.mode),
    ))
}
