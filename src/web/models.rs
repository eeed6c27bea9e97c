//! Request and Response DTOs for the Web API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AssessmentRecord, HistoryEntry};

// ============================================================================
// Health & Errors
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// ============================================================================
// Detection
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub address: String,
}

// ============================================================================
// Reputation
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub address: String,
    pub network: Option<String>, // Network id, e.g. "polygon"
    #[serde(default, alias = "force_refresh")]
    pub force_refresh: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Carries `addressType` as well
    #[serde(flatten)]
    pub record: AssessmentRecord,
    pub cached: bool,
    pub persisted: bool,
    /// `100 - fraudRisk`, the view shown to users.
    pub fraud_safety: Option<u8>,
    pub explorer_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
    pub total: usize,
}
