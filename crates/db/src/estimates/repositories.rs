use async_trait::async_trait;

use crate::estimates::models::{EstimateRecord, EstimateSummary, NewEstimate, SavedEstimate};
use haulsight_common::error::HaulsightResult;

#[async_trait]
pub trait EstimateRepository: Send + Sync {
    /// Append a record. The store assigns id and created_at.
    async fn insert(&self, estimate: NewEstimate) -> HaulsightResult<SavedEstimate>;

    /// Newest first; ties on created_at break toward the higher id so the
    /// most recently appended record always lists first.
    async fn list(&self, limit: i64) -> HaulsightResult<Vec<EstimateSummary>>;

    async fn get(&self, id: i64) -> HaulsightResult<Option<EstimateRecord>>;
}
