use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{
    AffectMeasurement, Assignment, Client, ClientSummary, Conversation, EcosystemEntry, NeedScore,
    Session, StoryArc,
};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /practitioner/clients
///
/// One row per client with rollup columns. The aggregation lives in the
/// query (correlated subqueries) rather than in handler code.
pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientSummary>>, ApiError> {
    let summaries: Vec<ClientSummary> = sqlx::query_as(
        r#"
        SELECT c.id, c.name, c.email, c.created_at, c.last_seen_at,
            (SELECT COUNT(*) FROM sessions s WHERE s.client_id = c.id) AS session_count,
            (SELECT MAX(s.started_at) FROM sessions s WHERE s.client_id = c.id) AS last_session_at,
            (SELECT n.volition_index FROM need_scores n
                WHERE n.client_id = c.id ORDER BY n.created_at DESC LIMIT 1) AS latest_volition_index,
            (SELECT a.assignment FROM assignments a
                WHERE a.client_id = c.id ORDER BY a.created_at DESC LIMIT 1) AS latest_assignment
        FROM clients c
        ORDER BY c.last_seen_at DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(summaries))
}

/// GET /practitioner/client/:id - full detail dump of one client
pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let client: Client = sqlx::query_as(
        "SELECT id, name, email, created_at, last_seen_at FROM clients WHERE id = $1",
    )
    .bind(client_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found(format!("client {} not found", client_id)))?;

    let sessions: Vec<Session> = sqlx::query_as(
        "SELECT id, session_number, started_at, ended_at, duration_secs, word_count \
         FROM sessions WHERE client_id = $1 ORDER BY started_at",
    )
    .bind(client_id)
    .fetch_all(&state.pool)
    .await?;

    let story_arcs: Vec<StoryArc> = sqlx::query_as(
        "SELECT id, session_id, point_a, point_b, obstacle, attempts, resources, meaning_made, updated_at \
         FROM story_arcs WHERE client_id = $1 ORDER BY updated_at",
    )
    .bind(client_id)
    .fetch_all(&state.pool)
    .await?;

    let need_scores: Vec<NeedScore> = sqlx::query_as(
        "SELECT id, session_id, autonomy, competence, relatedness, purpose, volition_index, created_at \
         FROM need_scores WHERE client_id = $1 ORDER BY created_at",
    )
    .bind(client_id)
    .fetch_all(&state.pool)
    .await?;

    let affect: Vec<AffectMeasurement> = sqlx::query_as(
        "SELECT id, session_id, phase, q1, q2, q3, q4, q5, total, recorded_at \
         FROM affect_measurements WHERE client_id = $1 ORDER BY recorded_at",
    )
    .bind(client_id)
    .fetch_all(&state.pool)
    .await?;

    let assignments: Vec<Assignment> = sqlx::query_as(
        "SELECT id, session_id, assignment, excavation_query, commitment_person, commitment_time, created_at \
         FROM assignments WHERE client_id = $1 ORDER BY created_at DESC",
    )
    .bind(client_id)
    .fetch_all(&state.pool)
    .await?;

    let ecosystem: Vec<EcosystemEntry> = sqlx::query_as(
        "SELECT id, person_name, entry_type, needs_provided, created_at \
         FROM ecosystem_entries WHERE client_id = $1 ORDER BY created_at",
    )
    .bind(client_id)
    .fetch_all(&state.pool)
    .await?;

    let conversation: Vec<Conversation> = sqlx::query_as(
        "SELECT id, session_id, role, content, recorded_at \
         FROM conversations WHERE client_id = $1 ORDER BY recorded_at",
    )
    .bind(client_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(json!({
        "client": client,
        "sessions": sessions,
        "storyArcs": story_arcs,
        "needScores": need_scores,
        "affect": affect,
        "assignments": assignments,
        "ecosystem": ecosystem,
        "conversation": conversation,
    })))
}
