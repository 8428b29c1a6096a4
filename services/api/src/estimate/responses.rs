use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub ok: bool,
    /// Null when the estimate was computed but the store was unavailable.
    pub id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub result: String,
}
