use crate::db::models::{ActiveValue, HistoryEntry};
use crate::error::NumgenError;
use crate::router::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

const DEFAULT_HISTORY_LIMIT: u32 = 50;
const MAX_HISTORY_LIMIT: u32 = 500;

/// GET /api/test -> liveness probe.
pub async fn test() -> Json<Value> {
    Json(json!({
        "message": "Backend is up",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/active -> the current value, `null` until an admin sets one.
pub async fn get_active(State(state): State<AppState>) -> Result<Json<ActiveValue>, NumgenError> {
    let active = state.storage.active().await?;
    Ok(Json(active))
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub value: i64,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

/// POST /api/generate -> snapshot the active value into history as a
/// user-attributed entry. 400 when no value has been set yet.
pub async fn generate(
    State(state): State<AppState>,
) -> Result<Json<GenerateResponse>, NumgenError> {
    let (value, generated_at) = state.storage.record_generation().await?;
    info!(value, "generation recorded");
    Ok(Json(GenerateResponse {
        value,
        generated_at,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

/// GET /api/history?limit=N -> newest entries first, default 50, capped.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, NumgenError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    let entries = state.storage.list_history(limit).await?;
    Ok(Json(entries))
}
