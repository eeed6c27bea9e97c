//! Request handlers for all API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use super::models::*;
use super::AppState;
use crate::address::detect;
use crate::analysis::service::ScoreSummary;
use crate::error::ReputexError;
use crate::models::{AddressInfo, AssessmentRecord, Network};
use crate::scoring::SignalMap;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, details: Option<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
}

/// Input problems are 400s, everything else is a 500.
fn map_error(context: &str, e: anyhow::Error) -> ApiError {
    match e.downcast_ref::<ReputexError>() {
        Some(
            ReputexError::InvalidAddress(_)
            | ReputexError::NetworkMismatch(_)
            | ReputexError::UnknownNetwork(_),
        ) => {
            warn!("{}: {}", context, e);
            api_error(StatusCode::BAD_REQUEST, context, Some(e.to_string()))
        }
        _ => {
            error!("{}: {:?}", context, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, context, Some(e.to_string()))
        }
    }
}

fn parse_network(network: &str) -> Result<Network, ApiError> {
    network
        .parse::<Network>()
        .map_err(|e| map_error("Unknown network", e.into()))
}

// ============================================================================
// Health Check
// ============================================================================

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

// ============================================================================
// Classification
// ============================================================================

pub async fn detect_address(Json(req): Json<DetectRequest>) -> Json<AddressInfo> {
    Json(detect(&req.address))
}

// ============================================================================
// Reputation
// ============================================================================

pub async fn analyze_address(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let network = req.network.as_deref().map(parse_network).transpose()?;

    let outcome = state
        .service
        .assess(&req.address, network, req.force_refresh)
        .await
        .map_err(|e| map_error("Failed to analyze address", e))?;

    info!(
        "Analyzed {} on {} (cached: {})",
        outcome.record.address, outcome.record.network, outcome.cached
    );

    let explorer_url = outcome.record.network.explorer_address_url(&outcome.record.address);
    let fraud_safety = outcome.record.scores.fraud_safety();
    Ok(Json(AnalyzeResponse {
        record: outcome.record,
        cached: outcome.cached,
        persisted: outcome.persisted,
        fraud_safety,
        explorer_url,
    }))
}

pub async fn score_bundle(State(state): State<AppState>, Json(raw): Json<SignalMap>) -> Json<ScoreSummary> {
    Json(state.service.score(&raw))
}

pub async fn get_token_score(
    State(state): State<AppState>,
    Path((network, address)): Path<(String, String)>,
) -> Result<Json<AssessmentRecord>, ApiError> {
    let network = parse_network(&network)?;

    match state.service.lookup(&address, network).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            "No assessment stored for this address",
            None,
        )),
        Err(e) => Err(map_error("Failed to load assessment", e)),
    }
}

pub async fn get_history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
    let history = state
        .service
        .history()
        .await
        .map_err(|e| map_error("Failed to load history", e))?;

    let total = history.len();
    Ok(Json(HistoryResponse { history, total }))
}
