use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::match_record::{MatchRecord, MatchRequest};
use crate::stats::EventSet;

const MATCH_COLUMNS: &str = r#"
    id, home_team, away_team, home_score, away_score, match_type, played_at,
    events, needs_stat_repair, created_at, updated_at
"#;

pub async fn list_matches(pool: &PgPool) -> Result<Vec<MatchRecord>, sqlx::Error> {
    sqlx::query_as::<_, MatchRecord>(&format!(
        "SELECT {} FROM matches ORDER BY played_at DESC",
        MATCH_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_match(pool: &PgPool, match_id: Uuid) -> Result<Option<MatchRecord>, sqlx::Error> {
    sqlx::query_as::<_, MatchRecord>(&format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS))
        .bind(match_id)
        .fetch_optional(pool)
        .await
}

/// Load a match and hold its row lock until the surrounding transaction ends,
/// so two mutations of the same match never reconcile the same stored events.
pub async fn lock_match(conn: &mut PgConnection, match_id: Uuid) -> Result<Option<MatchRecord>, sqlx::Error> {
    sqlx::query_as::<_, MatchRecord>(&format!(
        "SELECT {} FROM matches WHERE id = $1 FOR UPDATE",
        MATCH_COLUMNS
    ))
    .bind(match_id)
    .fetch_optional(conn)
    .await
}

pub async fn insert_match(
    conn: &mut PgConnection,
    match_id: Uuid,
    request: &MatchRequest,
    events: &EventSet,
) -> Result<MatchRecord, sqlx::Error> {
    sqlx::query_as::<_, MatchRecord>(&format!(
        r#"
        INSERT INTO matches (id, home_team, away_team, home_score, away_score, match_type, played_at, events)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        MATCH_COLUMNS
    ))
    .bind(match_id)
    .bind(request.home_team.trim())
    .bind(request.away_team.trim())
    .bind(request.home_score)
    .bind(request.away_score)
    .bind(request.match_type)
    .bind(request.played_at.unwrap_or_else(Utc::now))
    .bind(Json(events))
    .fetch_one(conn)
    .await
}

/// Replace every field of a match. Clears the repair flag, since the stats
/// now reflect `events`.
pub async fn replace_match(
    conn: &mut PgConnection,
    match_id: Uuid,
    request: &MatchRequest,
    events: &EventSet,
) -> Result<MatchRecord, sqlx::Error> {
    sqlx::query_as::<_, MatchRecord>(&format!(
        r#"
        UPDATE matches
        SET home_team = $2,
            away_team = $3,
            home_score = $4,
            away_score = $5,
            match_type = $6,
            played_at = COALESCE($7, played_at),
            events = $8,
            needs_stat_repair = FALSE,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        MATCH_COLUMNS
    ))
    .bind(match_id)
    .bind(request.home_team.trim())
    .bind(request.away_team.trim())
    .bind(request.home_score)
    .bind(request.away_score)
    .bind(request.match_type)
    .bind(request.played_at)
    .bind(Json(events))
    .fetch_one(conn)
    .await
}

/// Store a new event-set without touching the other fields.
pub async fn replace_match_events(
    conn: &mut PgConnection,
    match_id: Uuid,
    events: &EventSet,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE matches
        SET events = $2, needs_stat_repair = FALSE, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(match_id)
    .bind(Json(events))
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn delete_match(conn: &mut PgConnection, match_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(match_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Flag a match whose last change failed and was rolled back. Runs outside the
/// failed transaction; cleared again by the next successful edit.
pub async fn flag_for_stat_repair(pool: &PgPool, match_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE matches SET needs_stat_repair = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(match_id)
        .execute(pool)
        .await?;

    Ok(())
}
