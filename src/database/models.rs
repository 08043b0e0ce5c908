use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Row models for the seven record types. Columns map by snake_case field
/// name; the wire format is camelCase.

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub session_number: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_secs: Option<i32>,
    pub word_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoryArc {
    pub id: Uuid,
    pub session_id: Option<Uuid>,
    pub point_a: Option<String>,
    pub point_b: Option<String>,
    pub obstacle: Option<String>,
    pub attempts: Option<String>,
    pub resources: Option<String>,
    pub meaning_made: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NeedScore {
    pub id: Uuid,
    pub session_id: Option<Uuid>,
    pub autonomy: i32,
    pub competence: i32,
    pub relatedness: i32,
    pub purpose: i32,
    pub volition_index: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AffectMeasurement {
    pub id: Uuid,
    pub session_id: Option<Uuid>,
    pub phase: String,
    pub q1: i32,
    pub q2: i32,
    pub q3: i32,
    pub q4: i32,
    pub q5: i32,
    pub total: i32,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub session_id: Option<Uuid>,
    pub role: String,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub session_id: Option<Uuid>,
    pub assignment: Option<String>,
    pub excavation_query: Option<String>,
    pub commitment_person: Option<String>,
    pub commitment_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EcosystemEntry {
    pub id: Uuid,
    #[serde(rename = "name")]
    pub person_name: String,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub needs_provided: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One row per client on the practitioner dashboard, aggregated in a single
/// query with correlated subqueries.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub session_count: i64,
    pub last_session_at: Option<DateTime<Utc>>,
    pub latest_volition_index: Option<i32>,
    pub latest_assignment: Option<String>,
}
