use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::ApiError;
use haulsight_common::error::HaulsightError;

pub const AUTH_FLAG_KEY: &str = "authenticated";

/// Exact match after trimming both sides. The PIN is the application's
/// single shared secret; there is no per-user identity behind it.
pub fn verify_pin(candidate: &str, expected: &str) -> bool {
    candidate.trim() == expected.trim()
}

fn not_authorized() -> ApiError {
    ApiError(HaulsightError::Unauthorized("Not authorized".to_string()))
}

/// Extractor gating every protected route. The rejection is the same 401
/// whether the session is absent, expired, or never authenticated.
pub struct AuthedSession(pub Session);

impl<S: Send + Sync> FromRequestParts<S> for AuthedSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| not_authorized())?;

        let authenticated = session
            .get::<bool>(AUTH_FLAG_KEY)
            .await
            .map_err(|_| not_authorized())?
            .unwrap_or(false);

        if !authenticated {
            return Err(not_authorized());
        }

        Ok(Self(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_pin_matches_after_trimming() {
        assert!(verify_pin("1234", "1234"));
        assert!(verify_pin(" 1234 ", "1234"));
        assert!(verify_pin("1234", "  1234\n"));
    }

    #[test]
    fn verify_pin_rejects_mismatch() {
        assert!(!verify_pin("1234", "4321"));
        assert!(!verify_pin("", "1234"));
        assert!(!verify_pin("12 34", "1234"));
    }
}
