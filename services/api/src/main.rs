mod auth;
mod error;
mod estimate;
mod history;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use haulsight_common::types::ServiceInfo;
use haulsight_config::{init_tracing, AppConfig};
use haulsight_db::estimates::pg_repository::PgEstimateRepository;
use haulsight_db::estimates::repositories::EstimateRepository;
use haulsight_vision::client::{VisionClient, VisionClientConfig};
use haulsight_vision::pipeline::EstimationPipeline;

use estimate::intake::{MAX_FILES_PER_FIELD, MAX_FILE_BYTES};

/// Generous enough for a full photo + overlay upload; per-file limits are
/// enforced in intake.
const MAX_REQUEST_BYTES: usize = 2 * MAX_FILES_PER_FIELD * MAX_FILE_BYTES + 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: EstimationPipeline,
    pub estimates: Arc<dyn EstimateRepository>,
    pub pin: String,
}

async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("haulsight-api"))
}

async fn metrics() -> impl IntoResponse {
    let body = "\
# HELP haulsight_up Service up indicator\n\
# TYPE haulsight_up gauge\n\
haulsight_up 1\n\
# HELP haulsight_info Service info\n\
# TYPE haulsight_info gauge\n\
haulsight_info{service=\"haulsight-api\",version=\"0.1.0\"} 1\n";

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(12)));

    Router::new()
        .route("/api/ping", get(ping))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(auth::router())
        .merge(estimate::router())
        .merge(history::router())
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = AppConfig::from_env().expect("failed to load config");
    tracing::info!(service = "haulsight-api", "starting");

    let pool = haulsight_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let vision_config = VisionClientConfig::from_env().expect("failed to load vision config");
    let policy = vision_config.policy_profile;
    let model_name = vision_config.model.clone();
    tracing::info!(model = %model_name, policy = policy.name(), "vision provider configured");

    let client = VisionClient::new(vision_config).expect("failed to build vision client");
    let estimates: Arc<dyn EstimateRepository> = Arc::new(PgEstimateRepository::new(pool));
    let pipeline = EstimationPipeline::new(Arc::new(client), estimates.clone(), policy, model_name);

    let state = AppState {
        pipeline,
        estimates,
        pin: config.app_pin.clone(),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
