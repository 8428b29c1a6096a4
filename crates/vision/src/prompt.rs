//! Multimodal prompt assembly.
//!
//! The provider has no key tying an overlay to its photo; the only link is
//! sequence order. `assemble` therefore guarantees index-preserving
//! iteration: a missing overlay never shifts the photos that follow it.

use bytes::Bytes;
use haulsight_common::types::JobType;

const SUPPORTED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Fallback when the upload declared something we do not recognize.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub media_type: String,
    pub data: Bytes,
}

impl ImageBlob {
    /// Normalizes the declared media type to the supported set.
    pub fn new(declared_media_type: &str, data: Bytes) -> Self {
        let declared = declared_media_type.trim().to_ascii_lowercase();
        let media_type = if SUPPORTED_MEDIA_TYPES.contains(&declared.as_str()) {
            declared
        } else {
            DEFAULT_MEDIA_TYPE.to_string()
        };
        Self { media_type, data }
    }
}

/// A photo and the overlay that annotates it, if one was drawn.
#[derive(Debug, Clone)]
pub struct PhotoPair {
    pub photo: ImageBlob,
    pub overlay: Option<ImageBlob>,
}

#[derive(Debug, Clone)]
pub enum PromptSegment {
    Text(String),
    Image(ImageBlob),
}

#[derive(Debug, Clone)]
pub struct PromptDocument {
    pub segments: Vec<PromptSegment>,
}

/// Job details carried only as prompt text; the assembler never branches on
/// job type.
#[derive(Debug, Clone)]
pub struct JobMetadata {
    pub job_type: JobType,
    pub dumpster_size: Option<f64>,
    pub agent_label: Option<String>,
    pub notes: Option<String>,
}

fn metadata_segment(meta: &JobMetadata) -> String {
    let dumpster_size = meta
        .dumpster_size
        .map(|s| format!("{s} yard"))
        .unwrap_or_else(|| "UNKNOWN".to_string());

    format!(
        "Job type: {job_type}\n\
         Dumpster size: {dumpster_size}\n\
         Agent label: {agent_label}\n\
         Notes: {notes}\n\n\
         Overlay rules (if provided after a photo):\n\
         - Green marks = INCLUDE in estimate (count/remove)\n\
         - Red marks = EXCLUDE from estimate (stays/ignore)\n\
         - If a photo has no green marks, assume everything is in-scope EXCEPT red-marked areas.\n\
         - The dumpster container itself should NEVER be counted as junk volume.\n",
        job_type = meta.job_type,
        agent_label = meta.agent_label.as_deref().unwrap_or("None"),
        notes = meta.notes.as_deref().unwrap_or("None"),
    )
}

/// Build the ordered prompt document: metadata text, then for each photo in
/// submission order its label and image, with the overlay label and image
/// directly after when present.
pub fn assemble(meta: &JobMetadata, pairs: &[PhotoPair]) -> PromptDocument {
    let mut segments = Vec::with_capacity(1 + pairs.len() * 4);
    segments.push(PromptSegment::Text(metadata_segment(meta)));

    for (i, pair) in pairs.iter().enumerate() {
        let n = i + 1;
        segments.push(PromptSegment::Text(format!("Photo {n} (original)")));
        segments.push(PromptSegment::Image(pair.photo.clone()));

        if let Some(overlay) = &pair.overlay {
            segments.push(PromptSegment::Text(format!(
                "Photo {n} overlay: Green = include/count. Red = exclude/ignore."
            )));
            segments.push(PromptSegment::Image(overlay.clone()));
        }
    }

    PromptDocument { segments }
}
