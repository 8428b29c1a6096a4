use chrono::{DateTime, Utc};
use haulsight_common::types::{Confidence, JobType};
use serde::{Deserialize, Serialize};

/// A completed estimation, as stored. Append-only: records are never
/// mutated or deleted by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub agent_label: Option<String>,
    pub job_type: JobType,
    pub dumpster_size: Option<f64>,
    pub notes: Option<String>,
    pub photo_count: i32,
    pub model_name: String,
    pub result_text: String,
    pub confidence: Option<Confidence>,
}

/// Listing row: everything the history table shows, with the result text
/// truncated to a preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub agent_label: Option<String>,
    pub job_type: JobType,
    pub dumpster_size: Option<f64>,
    pub photo_count: i32,
    pub confidence: Option<Confidence>,
    pub result_preview: String,
}

/// Fields of a record before the store assigns identity and timestamp.
#[derive(Debug, Clone)]
pub struct NewEstimate {
    pub agent_label: Option<String>,
    pub job_type: JobType,
    pub dumpster_size: Option<f64>,
    pub notes: Option<String>,
    pub photo_count: i32,
    pub model_name: String,
    pub result_text: String,
    pub confidence: Option<Confidence>,
}

/// Store-assigned identity of a freshly appended record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavedEstimate {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}
