pub mod handlers;
pub mod intake;
pub mod responses;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/estimate", post(handlers::post_estimate))
}
