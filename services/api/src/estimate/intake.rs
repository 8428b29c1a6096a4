//! Multipart upload intake.
//!
//! Parses the estimate form into a validated `EstimationSubmission`.
//! Photos and overlays are paired positionally here, once, so the rest of
//! the pipeline never sees two independently indexed lists.

use axum::extract::Multipart;

use haulsight_common::error::{HaulsightError, HaulsightResult};
use haulsight_common::types::JobType;
use haulsight_vision::pipeline::EstimationSubmission;
use haulsight_vision::prompt::{ImageBlob, JobMetadata, PhotoPair};

pub const MAX_FILES_PER_FIELD: usize = 12;
pub const MAX_FILE_BYTES: usize = 15 * 1024 * 1024;
pub const MAX_AGENT_LABEL_CHARS: usize = 80;
pub const MAX_NOTES_CHARS: usize = 4000;

pub async fn parse_submission(mut multipart: Multipart) -> HaulsightResult<EstimationSubmission> {
    let mut job_type_raw: Option<String> = None;
    let mut dumpster_size_raw: Option<String> = None;
    let mut agent_label_raw: Option<String> = None;
    let mut notes_raw: Option<String> = None;
    let mut photos: Vec<ImageBlob> = Vec::new();
    let mut overlays: Vec<ImageBlob> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HaulsightError::Validation(format!("malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_type" => job_type_raw = Some(read_text(field).await?),
            "dumpster_size" => dumpster_size_raw = Some(read_text(field).await?),
            "agent_label" => agent_label_raw = Some(read_text(field).await?),
            "notes" => notes_raw = Some(read_text(field).await?),
            "photos" | "overlays" => {
                let media_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| HaulsightError::Validation(format!("malformed upload: {e}")))?;

                if data.len() > MAX_FILE_BYTES {
                    return Err(HaulsightError::Validation(format!(
                        "each uploaded file is limited to 15 MiB; a {name} file exceeded it"
                    )));
                }

                let dest = if name == "photos" {
                    &mut photos
                } else {
                    &mut overlays
                };
                if dest.len() >= MAX_FILES_PER_FIELD {
                    return Err(HaulsightError::Validation(format!(
                        "at most {MAX_FILES_PER_FIELD} {name} files are accepted"
                    )));
                }
                dest.push(ImageBlob::new(&media_type, data));
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    if photos.is_empty() {
        return Err(HaulsightError::Validation(
            "Please upload at least 1 photo.".to_string(),
        ));
    }
    if overlays.len() > photos.len() {
        return Err(HaulsightError::Validation(format!(
            "received {} overlays for {} photos; overlays pair positionally with photos",
            overlays.len(),
            photos.len()
        )));
    }

    let metadata = JobMetadata {
        job_type: parse_job_type(job_type_raw.as_deref())?,
        dumpster_size: parse_dumpster_size(dumpster_size_raw.as_deref())?,
        agent_label: bounded_text(agent_label_raw, MAX_AGENT_LABEL_CHARS),
        notes: bounded_text(notes_raw, MAX_NOTES_CHARS),
    };

    let mut overlay_iter = overlays.into_iter();
    let pairs = photos
        .into_iter()
        .map(|photo| PhotoPair {
            photo,
            overlay: overlay_iter.next(),
        })
        .collect();

    Ok(EstimationSubmission { metadata, pairs })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> HaulsightResult<String> {
    field
        .text()
        .await
        .map_err(|e| HaulsightError::Validation(format!("malformed upload: {e}")))
}

/// Absent or blank means STANDARD; anything else must be in the closed set.
fn parse_job_type(raw: Option<&str>) -> HaulsightResult<JobType> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse(),
        None => Ok(JobType::Standard),
    }
}

/// Blank or "UNKNOWN" (any case) means unknown; anything else must parse as
/// a positive number.
fn parse_dumpster_size(raw: Option<&str>) -> HaulsightResult<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("unknown") {
        return Ok(None);
    }

    let size: f64 = raw.parse().map_err(|_| {
        HaulsightError::Validation(format!("dumpster_size must be a number or UNKNOWN: {raw}"))
    })?;
    if !size.is_finite() || size <= 0.0 {
        return Err(HaulsightError::Validation(
            "dumpster_size must be a positive number".to_string(),
        ));
    }
    Ok(Some(size))
}

/// Trim, cap at `max_chars`, and collapse empty to None.
fn bounded_text(raw: Option<String>, max_chars: usize) -> Option<String> {
    let trimmed = raw?.trim().chars().take(max_chars).collect::<String>();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_defaults_to_standard() {
        assert_eq!(parse_job_type(None).unwrap(), JobType::Standard);
        assert_eq!(parse_job_type(Some("  ")).unwrap(), JobType::Standard);
    }

    #[test]
    fn job_type_accepts_lowercase() {
        assert_eq!(
            parse_job_type(Some("dumpster_overflow")).unwrap(),
            JobType::DumpsterOverflow
        );
    }

    #[test]
    fn job_type_rejects_unknown_values() {
        assert!(parse_job_type(Some("HOT_TUB_REMOVAL")).is_err());
    }

    #[test]
    fn dumpster_size_blank_or_unknown_is_none() {
        assert_eq!(parse_dumpster_size(None).unwrap(), None);
        assert_eq!(parse_dumpster_size(Some("")).unwrap(), None);
        assert_eq!(parse_dumpster_size(Some("UNKNOWN")).unwrap(), None);
        assert_eq!(parse_dumpster_size(Some("unknown")).unwrap(), None);
    }

    #[test]
    fn dumpster_size_parses_numbers() {
        assert_eq!(parse_dumpster_size(Some("20")).unwrap(), Some(20.0));
        assert_eq!(parse_dumpster_size(Some(" 12.5 ")).unwrap(), Some(12.5));
    }

    #[test]
    fn dumpster_size_rejects_garbage_and_nonpositive() {
        assert!(parse_dumpster_size(Some("big")).is_err());
        assert!(parse_dumpster_size(Some("-20")).is_err());
        assert!(parse_dumpster_size(Some("0")).is_err());
        assert!(parse_dumpster_size(Some("NaN")).is_err());
        assert!(parse_dumpster_size(Some("inf")).is_err());
    }

    #[test]
    fn bounded_text_trims_caps_and_drops_empty() {
        assert_eq!(bounded_text(None, 80), None);
        assert_eq!(bounded_text(Some("  ".to_string()), 80), None);
        assert_eq!(
            bounded_text(Some("  Dana  ".to_string()), 80),
            Some("Dana".to_string())
        );
        let long = "x".repeat(100);
        assert_eq!(bounded_text(Some(long), 80).unwrap().chars().count(), 80);
    }

    #[test]
    fn bounded_text_caps_on_char_boundaries() {
        let emoji = "🗑".repeat(90);
        let bounded = bounded_text(Some(emoji), 80).unwrap();
        assert_eq!(bounded.chars().count(), 80);
    }
}
