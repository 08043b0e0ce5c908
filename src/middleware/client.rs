use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::ClientIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the opaque session token issued at login.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Client authentication middleware: validates the session token against the
/// in-memory registry and injects the client identity into the request.
/// Pure registry lookup, no database access.
pub async fn client_session_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers)?;

    let identity = state
        .sessions
        .validate(&token)
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired session token"))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(SESSION_TOKEN_HEADER)
        .ok_or_else(|| ApiError::unauthorized("Missing X-Session-Token header"))?;

    let token = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid X-Session-Token header"))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized("Empty session token"));
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_and_trims_token() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_TOKEN_HEADER, HeaderValue::from_static(" abc123 "));
        assert_eq!(extract_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let headers = HeaderMap::new();
        let err = extract_token(&headers).unwrap_err();
        assert_eq!(err.error_code(), "UNAUTHORIZED");
    }

    #[test]
    fn empty_token_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_TOKEN_HEADER, HeaderValue::from_static("   "));
        assert!(extract_token(&headers).is_err());
    }
}
