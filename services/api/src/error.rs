use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use haulsight_common::error::HaulsightError;

pub struct ApiError(pub HaulsightError);

impl From<HaulsightError> for ApiError {
    fn from(err: HaulsightError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HaulsightError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            HaulsightError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            HaulsightError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            // Storage failure on a read path: there is no computed value to
            // fall back to, so it surfaces as unavailable.
            HaulsightError::Database(_) => (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string()),
            HaulsightError::Inference(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
