//! Model-output interpretation.
//!
//! Format compliance is a best-effort instruction to the model, not a
//! contract: the only hard requirement is non-empty text. The confidence
//! token is extracted when present and silently absent otherwise.

use haulsight_common::error::{HaulsightError, HaulsightResult};
use haulsight_common::types::Confidence;

#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub text: String,
    pub confidence: Option<Confidence>,
}

/// Validate and interpret raw model output. Whitespace-only output is the
/// one failure mode; everything else passes through unchanged.
pub fn interpret(raw: &str) -> HaulsightResult<Interpretation> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(HaulsightError::Inference(
            "Empty response from model".to_string(),
        ));
    }

    Ok(Interpretation {
        text: text.to_string(),
        confidence: extract_confidence(text),
    })
}

/// Case-insensitive scan for `Confidence: <Low|Medium|High>` anywhere in the
/// text. Returns `None` when the model deviated from the format.
pub fn extract_confidence(text: &str) -> Option<Confidence> {
    let lower = text.to_lowercase();
    let mut remaining = lower.as_str();

    while let Some(pos) = remaining.find("confidence") {
        let after = remaining[pos + "confidence".len()..].trim_start();
        if let Some(after_colon) = after.strip_prefix(':') {
            let token: String = after_colon
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_alphabetic())
                .collect();
            if let Some(confidence) = Confidence::parse(&token) {
                return Some(confidence);
            }
        }
        remaining = &remaining[pos + "confidence".len()..];
    }

    None
}
