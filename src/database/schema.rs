use sqlx::PgPool;
use tracing::info;

/// Idempotent schema bootstrap, run once at startup. Failure is logged by the
/// caller and is not fatal; store-backed endpoints then fail per-request.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS clients (
        id            UUID PRIMARY KEY,
        name          TEXT NOT NULL,
        pin           TEXT NOT NULL,
        email         TEXT,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        last_seen_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    // Client names are unique case-insensitively
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS clients_name_lower_idx
        ON clients (LOWER(name))
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id              UUID PRIMARY KEY,
        client_id       UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        session_number  INTEGER NOT NULL,
        started_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        ended_at        TIMESTAMPTZ,
        duration_secs   INTEGER,
        word_count      INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS story_arcs (
        id            UUID PRIMARY KEY,
        client_id     UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        session_id    UUID,
        point_a       TEXT,
        point_b       TEXT,
        obstacle      TEXT,
        attempts      TEXT,
        resources     TEXT,
        meaning_made  TEXT,
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS need_scores (
        id             UUID PRIMARY KEY,
        client_id      UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        session_id     UUID,
        autonomy       INTEGER NOT NULL,
        competence     INTEGER NOT NULL,
        relatedness    INTEGER NOT NULL,
        purpose        INTEGER NOT NULL,
        volition_index INTEGER NOT NULL,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS affect_measurements (
        id          UUID PRIMARY KEY,
        client_id   UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        session_id  UUID,
        phase       TEXT NOT NULL,
        q1          INTEGER NOT NULL,
        q2          INTEGER NOT NULL,
        q3          INTEGER NOT NULL,
        q4          INTEGER NOT NULL,
        q5          INTEGER NOT NULL,
        total       INTEGER NOT NULL,
        recorded_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS conversations (
        id          UUID PRIMARY KEY,
        client_id   UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        session_id  UUID,
        role        TEXT NOT NULL,
        content     TEXT NOT NULL,
        recorded_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS assignments (
        id                UUID PRIMARY KEY,
        client_id         UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        session_id        UUID,
        assignment        TEXT,
        excavation_query  TEXT,
        commitment_person TEXT,
        commitment_time   TEXT,
        created_at        TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ecosystem_entries (
        id             UUID PRIMARY KEY,
        client_id      UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        person_name    TEXT NOT NULL,
        entry_type     TEXT,
        needs_provided TEXT[] NOT NULL DEFAULT '{}',
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("database schema ensured ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(())
}
