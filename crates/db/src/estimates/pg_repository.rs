use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::estimates::models::{EstimateRecord, EstimateSummary, NewEstimate, SavedEstimate};
use crate::estimates::repositories::EstimateRepository;
use haulsight_common::error::{HaulsightError, HaulsightResult};
use haulsight_common::types::{Confidence, JobType};

#[derive(Clone)]
pub struct PgEstimateRepository {
    pool: PgPool,
}

impl PgEstimateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn job_type_column(raw: String) -> HaulsightResult<JobType> {
    raw.parse()
        .map_err(|_| HaulsightError::Database(format!("unrecognized job_type in store: {raw}")))
}

fn confidence_column(raw: Option<String>) -> Option<Confidence> {
    raw.as_deref().and_then(Confidence::parse)
}

fn map_record(row: &sqlx::postgres::PgRow) -> HaulsightResult<EstimateRecord> {
    Ok(EstimateRecord {
        id: row.get("id"),
        created_at: row.get("created_at"),
        agent_label: row.get("agent_label"),
        job_type: job_type_column(row.get("job_type"))?,
        dumpster_size: row.get("dumpster_size"),
        notes: row.get("notes"),
        photo_count: row.get("photo_count"),
        model_name: row.get("model_name"),
        result_text: row.get("result_text"),
        confidence: confidence_column(row.get("confidence")),
    })
}

fn map_summary(row: &sqlx::postgres::PgRow) -> HaulsightResult<EstimateSummary> {
    Ok(EstimateSummary {
        id: row.get("id"),
        created_at: row.get("created_at"),
        agent_label: row.get("agent_label"),
        job_type: job_type_column(row.get("job_type"))?,
        dumpster_size: row.get("dumpster_size"),
        photo_count: row.get("photo_count"),
        confidence: confidence_column(row.get("confidence")),
        result_preview: row.get("result_preview"),
    })
}

#[async_trait]
impl EstimateRepository for PgEstimateRepository {
    async fn insert(&self, estimate: NewEstimate) -> HaulsightResult<SavedEstimate> {
        let row = sqlx::query(
            "insert into estimates
             (agent_label, job_type, dumpster_size, notes, photo_count,
              model_name, result_text, confidence)
             values ($1, $2, $3, $4, $5, $6, $7, $8)
             returning id, created_at",
        )
        .bind(&estimate.agent_label)
        .bind(estimate.job_type.as_str())
        .bind(estimate.dumpster_size)
        .bind(&estimate.notes)
        .bind(estimate.photo_count)
        .bind(&estimate.model_name)
        .bind(&estimate.result_text)
        .bind(estimate.confidence.map(|c| c.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| HaulsightError::Database(e.to_string()))?;

        Ok(SavedEstimate {
            id: row.get("id"),
            created_at: row.get("created_at"),
        })
    }

    async fn list(&self, limit: i64) -> HaulsightResult<Vec<EstimateSummary>> {
        let rows = sqlx::query(
            "select id, created_at, agent_label, job_type, dumpster_size,
                    photo_count, confidence, left(result_text, 180) as result_preview
             from estimates
             order by created_at desc, id desc
             limit $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HaulsightError::Database(e.to_string()))?;

        rows.iter().map(map_summary).collect()
    }

    async fn get(&self, id: i64) -> HaulsightResult<Option<EstimateRecord>> {
        let row = sqlx::query(
            "select id, created_at, agent_label, job_type, dumpster_size, notes,
                    photo_count, model_name, result_text, confidence
             from estimates
             where id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HaulsightError::Database(e.to_string()))?;

        row.as_ref().map(map_record).transpose()
    }
}
