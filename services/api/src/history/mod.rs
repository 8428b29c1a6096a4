pub mod handlers;
pub mod responses;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/history", get(handlers::list_history))
        .route("/api/estimate/{id}", get(handlers::get_estimate))
}
