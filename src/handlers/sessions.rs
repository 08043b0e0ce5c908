use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::ClientIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /sessions/start
///
/// Session numbers are sequential per client. The number is computed inside
/// the INSERT so numbering is a single store-level statement; concurrent
/// starts for the same client are not serialized beyond that (a client has at
/// most one active session in practice).
pub async fn start(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
) -> Result<Json<Value>, ApiError> {
    let session_id = Uuid::new_v4();

    let (session_number,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO sessions (id, client_id, session_number)
        SELECT $1, $2, (COUNT(*) + 1)::int FROM sessions WHERE client_id = $2
        RETURNING session_number
        "#,
    )
    .bind(session_id)
    .bind(client.client_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(json!({
        "sessionId": session_id,
        "sessionNumber": session_number,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionRequest {
    pub duration: Option<i32>,
    pub word_count: Option<i32>,
}

/// POST /sessions/:id/end
///
/// Scoped by both session id and the authenticated client so one client
/// cannot close another's session. Silently succeeds when no row matches.
pub async fn end(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<EndSessionRequest>,
) -> Result<Json<Value>, ApiError> {
    sqlx::query(
        r#"
        UPDATE sessions
        SET ended_at = now(), duration_secs = $1, word_count = $2
        WHERE id = $3 AND client_id = $4
        "#,
    )
    .bind(payload.duration)
    .bind(payload.word_count)
    .bind(session_id)
    .bind(client.client_id)
    .execute(&state.pool)
    .await?;

    Ok(Json(json!({ "ok": true })))
}
