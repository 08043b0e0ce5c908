use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Placeholder credential stored for clients in this PIN-less variant.
const PLACEHOLDER_PIN: &str = "none";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
}

/// POST /auth/login-or-register
///
/// Identity resolution by display name: a known name (case-insensitive) logs
/// in and touches last-seen; an unknown name registers a new client. Either
/// way a session token is issued.
pub async fn login_or_register(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    let existing: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, name FROM clients WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&state.pool)
            .await?;

    let (client_id, stored_name, is_new) = match existing {
        Some((id, stored_name)) => {
            sqlx::query("UPDATE clients SET last_seen_at = now() WHERE id = $1")
                .bind(id)
                .execute(&state.pool)
                .await?;
            (id, stored_name, false)
        }
        None => {
            let id = Uuid::new_v4();
            sqlx::query("INSERT INTO clients (id, name, pin) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(name)
                .bind(PLACEHOLDER_PIN)
                .execute(&state.pool)
                .await?;
            tracing::info!(client = name, "registered new client");
            (id, name.to_string(), true)
        }
    };

    let token = state.sessions.issue(client_id, &stored_name);

    Ok(Json(json!({
        "token": token,
        "clientId": client_id,
        "name": stored_name,
        "isNew": is_new,
    })))
}
