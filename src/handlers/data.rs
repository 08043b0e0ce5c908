use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::ClientIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Append-only save endpoints, one insert per call, scoped to the
/// authenticated client. Field values pass through uninterpreted; the only
/// server-side computation is the affect total.

fn ok() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStoryRequest {
    pub session_id: Option<Uuid>,
    pub point_a: Option<String>,
    pub point_b: Option<String>,
    pub obstacle: Option<String>,
    pub attempts: Option<String>,
    pub resources: Option<String>,
    pub meaning_made: Option<String>,
}

/// POST /data/story
pub async fn save_story(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Json(payload): Json<SaveStoryRequest>,
) -> Result<Json<Value>, ApiError> {
    sqlx::query(
        r#"
        INSERT INTO story_arcs
            (id, client_id, session_id, point_a, point_b, obstacle, attempts, resources, meaning_made)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client.client_id)
    .bind(payload.session_id)
    .bind(payload.point_a)
    .bind(payload.point_b)
    .bind(payload.obstacle)
    .bind(payload.attempts)
    .bind(payload.resources)
    .bind(payload.meaning_made)
    .execute(&state.pool)
    .await?;

    Ok(ok())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNeedsRequest {
    pub session_id: Option<Uuid>,
    pub autonomy: i32,
    pub competence: i32,
    pub relatedness: i32,
    pub purpose: i32,
    /// Derived client-side; stored as supplied since the derivation formula
    /// lives in the app.
    pub volition_index: i32,
}

/// POST /data/needs
pub async fn save_needs(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Json(payload): Json<SaveNeedsRequest>,
) -> Result<Json<Value>, ApiError> {
    sqlx::query(
        r#"
        INSERT INTO need_scores
            (id, client_id, session_id, autonomy, competence, relatedness, purpose, volition_index)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client.client_id)
    .bind(payload.session_id)
    .bind(payload.autonomy)
    .bind(payload.competence)
    .bind(payload.relatedness)
    .bind(payload.purpose)
    .bind(payload.volition_index)
    .execute(&state.pool)
    .await?;

    Ok(ok())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAffectRequest {
    pub session_id: Option<Uuid>,
    pub phase: String,
    pub q1: i32,
    pub q2: i32,
    pub q3: i32,
    pub q4: i32,
    pub q5: i32,
    /// Accepted for wire compatibility but ignored; the total is recomputed
    /// server-side.
    pub total: Option<i32>,
}

impl SaveAffectRequest {
    /// Sub-scores arrive unvalidated, so the sum saturates rather than
    /// wrapping on hostile input.
    fn computed_total(&self) -> i32 {
        self.q1
            .saturating_add(self.q2)
            .saturating_add(self.q3)
            .saturating_add(self.q4)
            .saturating_add(self.q5)
    }
}

/// POST /data/affect
pub async fn save_affect(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Json(payload): Json<SaveAffectRequest>,
) -> Result<Json<Value>, ApiError> {
    sqlx::query(
        r#"
        INSERT INTO affect_measurements
            (id, client_id, session_id, phase, q1, q2, q3, q4, q5, total)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client.client_id)
    .bind(payload.session_id)
    .bind(&payload.phase)
    .bind(payload.q1)
    .bind(payload.q2)
    .bind(payload.q3)
    .bind(payload.q4)
    .bind(payload.q5)
    .bind(payload.computed_total())
    .execute(&state.pool)
    .await?;

    Ok(ok())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConversationRequest {
    pub session_id: Option<Uuid>,
    pub role: String,
    pub content: String,
}

/// POST /data/conversation - append one turn to the transcript log
pub async fn save_conversation(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Json(payload): Json<SaveConversationRequest>,
) -> Result<Json<Value>, ApiError> {
    sqlx::query(
        r#"
        INSERT INTO conversations (id, client_id, session_id, role, content)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client.client_id)
    .bind(payload.session_id)
    .bind(&payload.role)
    .bind(&payload.content)
    .execute(&state.pool)
    .await?;

    Ok(ok())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAssignmentRequest {
    pub session_id: Option<Uuid>,
    pub assignment: Option<String>,
    pub excavation_query: Option<String>,
    pub commitment_person: Option<String>,
    pub commitment_time: Option<String>,
}

/// POST /data/assignment
pub async fn save_assignment(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Json(payload): Json<SaveAssignmentRequest>,
) -> Result<Json<Value>, ApiError> {
    sqlx::query(
        r#"
        INSERT INTO assignments
            (id, client_id, session_id, assignment, excavation_query, commitment_person, commitment_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client.client_id)
    .bind(payload.session_id)
    .bind(payload.assignment)
    .bind(payload.excavation_query)
    .bind(payload.commitment_person)
    .bind(payload.commitment_time)
    .execute(&state.pool)
    .await?;

    Ok(ok())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcosystemPerson {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub needs_provided: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveEcosystemRequest {
    pub people: Vec<EcosystemPerson>,
}

/// POST /data/ecosystem
///
/// Full replacement of the client's ecosystem set. Delete and reinsert run in
/// one transaction so a mid-loop failure rolls back instead of leaving a
/// partial set.
pub async fn save_ecosystem(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    Json(payload): Json<SaveEcosystemRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut tx = state.pool.begin().await?;

    sqlx::query("DELETE FROM ecosystem_entries WHERE client_id = $1")
        .bind(client.client_id)
        .execute(&mut *tx)
        .await?;

    for person in &payload.people {
        sqlx::query(
            r#"
            INSERT INTO ecosystem_entries (id, client_id, person_name, entry_type, needs_provided)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(client.client_id)
        .bind(&person.name)
        .bind(&person.entry_type)
        .bind(&person.needs_provided)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affect_total_is_recomputed_from_subscores() {
        let payload: SaveAffectRequest = serde_json::from_value(serde_json::json!({
            "phase": "pre",
            "q1": 1, "q2": 2, "q3": 3, "q4": 4, "q5": 5,
            "total": 999
        }))
        .unwrap();

        assert_eq!(payload.computed_total(), 15);
    }

    #[test]
    fn affect_total_saturates_on_extreme_subscores() {
        let payload: SaveAffectRequest = serde_json::from_value(serde_json::json!({
            "phase": "pre",
            "q1": i32::MAX, "q2": i32::MAX, "q3": 1, "q4": 1, "q5": 1
        }))
        .unwrap();

        assert_eq!(payload.computed_total(), i32::MAX);

        let payload: SaveAffectRequest = serde_json::from_value(serde_json::json!({
            "phase": "pre",
            "q1": i32::MIN, "q2": -1, "q3": -1, "q4": 0, "q5": 0
        }))
        .unwrap();

        assert_eq!(payload.computed_total(), i32::MIN);
    }

    #[test]
    fn ecosystem_person_accepts_wire_field_names() {
        let person: EcosystemPerson = serde_json::from_value(serde_json::json!({
            "name": "Maria",
            "type": "family",
            "needsProvided": ["belonging", "safety"]
        }))
        .unwrap();

        assert_eq!(person.entry_type.as_deref(), Some("family"));
        assert_eq!(person.needs_provided, vec!["belonging", "safety"]);
    }
}
