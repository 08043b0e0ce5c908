use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Version header required by the Anthropic Messages API.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// POST /api/messages
///
/// Relays the request body verbatim to the Anthropic Messages API with the
/// server-held key injected, and passes the upstream status and JSON body
/// back unmodified. Without a configured key this reports a configuration
/// error before any outbound call.
pub async fn relay_messages(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Response, ApiError> {
    let api_key = state
        .config
        .upstream
        .api_key
        .as_deref()
        .ok_or_else(|| ApiError::config_error("ANTHROPIC_API_KEY is not configured"))?;

    let upstream = state
        .http
        .post(&state.config.upstream.messages_url)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&payload)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("upstream request failed: {}", e);
            ApiError::bad_gateway(format!("upstream request failed: {}", e))
        })?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    let body: Value = upstream
        .json()
        .await
        .map_err(|e| ApiError::bad_gateway(format!("upstream returned invalid JSON: {}", e)))?;

    Ok((status, Json(body)).into_response())
}
