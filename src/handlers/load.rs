use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Datelike, Days, Local, LocalResult, TimeZone, Utc};
use serde_json::{json, Value};

use crate::auth::ClientIdentity;
use crate::database::models::{AffectMeasurement, Assignment, EcosystemEntry, NeedScore, StoryArc};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /data/load
///
/// Most-recent-record snapshot for the authenticated client, assembled from
/// six independent read-only queries. No cross-query consistency: a write
/// landing between queries can show in some sections and not others, which is
/// acceptable at journaling contention levels.
pub async fn load(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
) -> Result<Json<Value>, ApiError> {
    let story: Option<StoryArc> = sqlx::query_as(
        "SELECT id, session_id, point_a, point_b, obstacle, attempts, resources, meaning_made, updated_at \
         FROM story_arcs WHERE client_id = $1 ORDER BY updated_at DESC LIMIT 1",
    )
    .bind(client.client_id)
    .fetch_optional(&state.pool)
    .await?;

    let needs: Option<NeedScore> = sqlx::query_as(
        "SELECT id, session_id, autonomy, competence, relatedness, purpose, volition_index, created_at \
         FROM need_scores WHERE client_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(client.client_id)
    .fetch_optional(&state.pool)
    .await?;

    let assignment: Option<Assignment> = sqlx::query_as(
        "SELECT id, session_id, assignment, excavation_query, commitment_person, commitment_time, created_at \
         FROM assignments WHERE client_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(client.client_id)
    .fetch_optional(&state.pool)
    .await?;

    let affect: Vec<AffectMeasurement> = sqlx::query_as(
        "SELECT id, session_id, phase, q1, q2, q3, q4, q5, total, recorded_at \
         FROM affect_measurements WHERE client_id = $1 ORDER BY recorded_at DESC LIMIT 10",
    )
    .bind(client.client_id)
    .fetch_all(&state.pool)
    .await?;

    let ecosystem: Vec<EcosystemEntry> = sqlx::query_as(
        "SELECT id, person_name, entry_type, needs_provided, created_at \
         FROM ecosystem_entries WHERE client_id = $1 ORDER BY created_at",
    )
    .bind(client.client_id)
    .fetch_all(&state.pool)
    .await?;

    let last_session_at: Option<DateTime<Utc>> = sqlx::query_scalar(
        "SELECT started_at FROM sessions WHERE client_id = $1 ORDER BY started_at DESC LIMIT 1",
    )
    .bind(client.client_id)
    .fetch_optional(&state.pool)
    .await?;

    let sessions_this_week: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sessions WHERE client_id = $1 AND started_at >= $2",
    )
    .bind(client.client_id)
    .bind(week_start(Local::now()))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(json!({
        "story": story,
        "needs": needs,
        "assignment": assignment,
        "affect": affect,
        "ecosystem": ecosystem,
        "lastSessionAt": last_session_at,
        "sessionsThisWeek": sessions_this_week,
    })))
}

/// Most recent Monday 00:00 in local time, as a UTC instant.
fn week_start(now: DateTime<Local>) -> DateTime<Utc> {
    let days_from_monday = u64::from(now.weekday().num_days_from_monday());
    let monday = now.date_naive() - Days::new(days_from_monday);
    let midnight = monday.and_hms_opt(0, 0, 0).expect("midnight is a valid time");

    match midnight.and_local_timezone(Local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // DST gap at midnight: fall back to treating the naive time as UTC
        LocalResult::None => Utc.from_utc_datetime(&midnight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn week_start_is_a_monday_at_local_midnight() {
        let start = week_start(Local::now());
        let local = start.with_timezone(&Local);

        assert_eq!(local.weekday(), Weekday::Mon);
        assert_eq!(local.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn week_start_is_at_most_seven_days_back() {
        let now = Local::now();
        let start = week_start(now);

        let elapsed = now.with_timezone(&Utc) - start;
        assert!(elapsed >= chrono::Duration::zero());
        assert!(elapsed < chrono::Duration::days(7) + chrono::Duration::hours(1));
    }
}
