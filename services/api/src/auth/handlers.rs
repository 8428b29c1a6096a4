use axum::extract::State;
use axum::Json;
use tower_sessions::Session;

use crate::auth::requests::LoginRequest;
use crate::auth::session::{verify_pin, AUTH_FLAG_KEY};
use crate::error::ApiError;
use crate::AppState;
use haulsight_common::error::HaulsightError;

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !verify_pin(&body.pin, &state.pin) {
        tracing::warn!("login attempt rejected");
        return Err(ApiError(HaulsightError::Unauthorized(
            "Invalid PIN".to_string(),
        )));
    }

    session
        .insert(AUTH_FLAG_KEY, true)
        .await
        .map_err(|e| ApiError(HaulsightError::Internal(e.to_string())))?;

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Always succeeds. Flushing drops the whole session record, not just the
/// auth flag, so nothing else keyed to the session survives either.
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError(HaulsightError::Internal(e.to_string())))?;

    Ok(Json(serde_json::json!({ "ok": true })))
}
