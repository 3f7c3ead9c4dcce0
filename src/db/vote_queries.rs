use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::player::Player;
use crate::models::vote::VoteStatus;

#[derive(Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    AlreadyVoted,
    UnknownPlayer,
}

/// Count one vote. The tally and the voter flag change in one transaction, and
/// the conditional flag update makes a second concurrent vote lose.
pub async fn cast_vote(pool: &PgPool, user_id: Uuid, player_id: Uuid) -> Result<VoteOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let counted = sqlx::query("UPDATE players SET votes = votes + 1 WHERE id = $1")
        .bind(player_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if counted == 0 {
        tx.rollback().await?;
        return Ok(VoteOutcome::UnknownPlayer);
    }

    let claimed = sqlx::query(
        r#"
        UPDATE users
        SET has_voted = TRUE, voted_for = $2, updated_at = NOW()
        WHERE id = $1 AND has_voted = FALSE
        "#,
    )
    .bind(user_id)
    .bind(player_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed == 0 {
        tx.rollback().await?;
        return Ok(VoteOutcome::AlreadyVoted);
    }

    tx.commit().await?;
    Ok(VoteOutcome::Recorded)
}

pub async fn vote_status(pool: &PgPool, user_id: Uuid) -> Result<Option<VoteStatus>, sqlx::Error> {
    let row = sqlx::query("SELECT has_voted, voted_for FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| VoteStatus {
        has_voted: row.get("has_voted"),
        voted_for: row.get("voted_for"),
    }))
}

/// Players sharing the highest non-zero tally, with the total of all votes cast.
pub async fn round_leaders(pool: &PgPool) -> Result<(Vec<Player>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(votes), 0)::BIGINT FROM players")
        .fetch_one(pool)
        .await?;

    let leaders = sqlx::query_as::<_, Player>(
        r#"
        SELECT id, first_name, last_name, shirt_number, position, votes,
               goals, assists, yellow_cards, red_cards, motm_wins, parent_motm_wins,
               created_at, updated_at
        FROM players
        WHERE votes > 0 AND votes = (SELECT MAX(votes) FROM players)
        ORDER BY last_name, first_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok((leaders, total))
}

/// Zero every tally and let every user vote again.
pub async fn reset_round(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE players SET votes = 0 WHERE votes <> 0")
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE users SET has_voted = FALSE, voted_for = NULL WHERE has_voted OR voted_for IS NOT NULL")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
