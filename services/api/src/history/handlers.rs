use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::session::AuthedSession;
use crate::error::ApiError;
use crate::history::responses::{EstimateDetailResponse, HistoryResponse};
use crate::AppState;
use haulsight_common::error::HaulsightError;

pub const DEFAULT_HISTORY_LIMIT: i64 = 100;
pub const MAX_HISTORY_LIMIT: i64 = 300;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

pub async fn list_history(
    State(state): State<AppState>,
    _auth: AuthedSession,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let rows = state.estimates.list(limit).await?;
    Ok(Json(HistoryResponse { ok: true, rows }))
}

pub async fn get_estimate(
    State(state): State<AppState>,
    _auth: AuthedSession,
    Path(id): Path<i64>,
) -> Result<Json<EstimateDetailResponse>, ApiError> {
    let row = state
        .estimates
        .get(id)
        .await?
        .ok_or_else(|| HaulsightError::NotFound(format!("estimate not found: {id}")))?;

    Ok(Json(EstimateDetailResponse { ok: true, row }))
}
