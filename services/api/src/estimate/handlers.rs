use axum::extract::{Multipart, State};
use axum::Json;

use haulsight_vision::pipeline::SaveOutcome;

use crate::auth::session::AuthedSession;
use crate::error::ApiError;
use crate::estimate::intake;
use crate::estimate::responses::EstimateResponse;
use crate::AppState;

pub async fn post_estimate(
    State(state): State<AppState>,
    _auth: AuthedSession,
    multipart: Multipart,
) -> Result<Json<EstimateResponse>, ApiError> {
    let submission = intake::parse_submission(multipart).await?;
    tracing::info!(
        photos = submission.pairs.len(),
        job_type = %submission.metadata.job_type,
        "running estimation"
    );

    let outcome = state.pipeline.run(submission).await?;

    let (id, created_at) = match outcome.saved {
        SaveOutcome::Saved(saved) => (Some(saved.id), Some(saved.created_at)),
        SaveOutcome::Unsaved => (None, None),
    };

    Ok(Json(EstimateResponse {
        ok: true,
        id,
        created_at,
        result: outcome.result_text,
    }))
}
