use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared practitioner secret.
pub const PRACTITIONER_PIN_HEADER: &str = "x-practitioner-pin";

/// Practitioner gate: a single shared secret compared against a header.
/// Deliberately low-security (no hashing, no lockout); acceptable for the
/// intended small private deployment.
pub async fn practitioner_gate_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = headers
        .get(PRACTITIONER_PIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing X-Practitioner-Pin header"))?;

    if !pin_matches(provided, &state.config.security.practitioner_pin) {
        return Err(ApiError::unauthorized("Invalid practitioner PIN"));
    }

    Ok(next.run(request).await)
}

/// Exact equality after trimming surrounding whitespace from both sides.
fn pin_matches(provided: &str, expected: &str) -> bool {
    provided.trim() == expected.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_after_trimming_both_sides() {
        assert!(pin_matches(" 1234 ", "1234"));
        assert!(pin_matches("1234", " 1234\n"));
    }

    #[test]
    fn rejects_different_pin() {
        assert!(!pin_matches("1235", "1234"));
    }

    #[test]
    fn comparison_is_exact_after_trim() {
        assert!(!pin_matches("12 34", "1234"));
        assert!(!pin_matches("", "1234"));
    }
}
