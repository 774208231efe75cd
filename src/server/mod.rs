//! Public prediction API
//!
//! `GET /sicbo` fetches the latest rounds, runs the ensemble engine and
//! returns the next-round call together with the last finished round.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::client::HistorySource;
use crate::display;
use crate::error::{Result, SicboError};
use crate::ml::{EnsembleEngine, EnsembleResult};
use crate::types::{next_session_id, outcome_label, HistoryEntry};


/// State shared across handlers
pub struct AppState {
    pub engine: EnsembleEngine,
    pub source: Arc<dyn HistorySource>,
}

impl AppState {
    pub fn new(engine: EnsembleEngine, source: Arc<dyn HistorySource>) -> Self {
        Self { engine, source }
    }
}

/// Body of `GET /sicbo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Last finished session
    pub phien: String,
    pub xuc_xac_1: u8,
    pub xuc_xac_2: u8,
    pub xuc_xac_3: u8,
    /// Dice total of the last session
    pub tong: u8,
    /// Outcome label of the last session
    pub ket_qua: String,
    /// Session being predicted
    pub phien_hien_tai: Option<String>,
    pub du_doan: String,
    /// Display-only score range
    pub dudoan_vi: String,
    /// Display-only confidence percentage
    pub do_tin_cay: String,
    /// Engine rationale
    pub ly_do: String,
    /// Engine confidence (0-1)
    pub engine_confidence: f64,
    pub generated_at: DateTime<Utc>,
}

impl PredictionResponse {
    pub fn build(last: &HistoryEntry, result: EnsembleResult) -> Self {
        let mut rng = rand::rng();
        Self {
            phien: last.session.clone(),
            xuc_xac_1: last.dice[0],
            xuc_xac_2: last.dice[1],
            xuc_xac_3: last.dice[2],
            tong: last.score,
            ket_qua: outcome_label(last.category).to_string(),
            phien_hien_tai: next_session_id(&last.session),
            du_doan: result.category.label().to_string(),
            dudoan_vi: display::score_range(result.category, &mut rng),
            do_tin_cay: display::confidence_percent(&mut rng),
            ly_do: result.rationale,
            engine_confidence: result.confidence,
            generated_at: Utc::now(),
        }
    }
}

/// Engine bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub source: String,
    pub recorded_votes: usize,
}

/// Error surfaced to API clients
#[derive(Debug)]
pub struct ApiError(SicboError);

impl From<SicboError> for ApiError {
    fn from(err: SicboError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SicboError::DataUnavailable(_)
            | SicboError::Http(_)
            | SicboError::Api(_)
            | SicboError::Json(_) => StatusCode::SERVICE_UNAVAILABLE,
            SicboError::Config(_) | SicboError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ============ HTTP API Handlers ============

/// Predict the next round
async fn get_prediction(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<PredictionResponse>, ApiError> {
    let history = state.source.fetch_history().await.map_err(|e| {
        tracing::warn!("History source {} failed: {}", state.source.name(), e);
        e.into_unavailable()
    })?;

    let last = history
        .last()
        .ok_or_else(|| SicboError::DataUnavailable("no rounds returned".into()))?;

    let result = state.engine.predict(&history);
    tracing::info!(
        session = %last.session,
        prediction = %result.category,
        confidence = result.confidence,
        "Prediction served"
    );

    Ok(Json(PredictionResponse::build(last, result)))
}

/// Engine stats
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<EngineStats> {
    Json(EngineStats {
        source: state.source.name().to_string(),
        recorded_votes: state.engine.recorded_votes(),
    })
}

/// Health check
async fn health_check() -> &'static str {
    "OK"
}

/// Create API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/sicbo", get(get_prediction))
        .route("/stats", get(get_stats))
        .with_state(state)
}

/// Start API server
pub async fn start_server(state: Arc<AppState>, addr: &str) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Prediction API listening on http://{}", listener.local_addr()?);
    tracing::info!("Endpoint: http://{}/sicbo", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
