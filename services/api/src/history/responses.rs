use haulsight_db::estimates::models::{EstimateRecord, EstimateSummary};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub ok: bool,
    pub rows: Vec<EstimateSummary>,
}

#[derive(Debug, Serialize)]
pub struct EstimateDetailResponse {
    pub ok: bool,
    pub row: EstimateRecord,
}
