use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};
use tokio::sync::Mutex;
use uuid::Uuid;
use tracing::{debug, info};

use crate::models::player::{CreatePlayerRequest, Player, PlayerStatsEdit};
use crate::stats::{
    normalize_full_name, CounterDelta, PlayerCounters, PlayerLookup, PlayerRef, PlayerStatStore,
    StoreError,
};

const PLAYER_COLUMNS: &str = r#"
    id, first_name, last_name, shirt_number, position, votes,
    goals, assists, yellow_cards, red_cards, motm_wins, parent_motm_wins,
    created_at, updated_at
"#;

/// Stats columns a leaderboard may be ordered by.
#[derive(Debug, Clone, Copy)]
pub enum StatColumn {
    Goals,
    Assists,
    MotmWins,
    ParentMotmWins,
    YellowCards,
    RedCards,
    Votes,
}

impl StatColumn {
    fn as_sql(&self) -> &'static str {
        match self {
            StatColumn::Goals => "goals",
            StatColumn::Assists => "assists",
            StatColumn::MotmWins => "motm_wins",
            StatColumn::ParentMotmWins => "parent_motm_wins",
            StatColumn::YellowCards => "yellow_cards",
            StatColumn::RedCards => "red_cards",
            StatColumn::Votes => "votes",
        }
    }
}

/// Postgres-backed player store used by the reconciliation engine.
///
/// It borrows the connection of the transaction that writes the match row, so
/// counter increments commit or roll back together with that row.
#[derive(Debug)]
pub struct PgPlayerStore<'c> {
    conn: Mutex<&'c mut PgConnection>,
}

impl<'c> PgPlayerStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl<'c> PlayerStatStore for PgPlayerStore<'c> {
    async fn find_player_by_full_name(&self, name: &str) -> Result<PlayerLookup, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name || ' ' || last_name AS full_name
            FROM players
            WHERE LOWER(first_name || ' ' || last_name) = LOWER($1)
            LIMIT 2
            "#,
        )
        .bind(normalize_full_name(name))
        .fetch_all(&mut **self.conn.lock().await)
        .await?;

        Ok(match rows.as_slice() {
            [] => PlayerLookup::NotFound,
            [row] => PlayerLookup::Found(PlayerRef {
                player_id: row.get("id"),
                name: row.get("full_name"),
            }),
            rows => PlayerLookup::Ambiguous(rows.len()),
        })
    }

    async fn find_player_by_id(&self, player_id: Uuid) -> Result<Option<PlayerRef>, StoreError> {
        let row = sqlx::query(
            "SELECT id, first_name || ' ' || last_name AS full_name FROM players WHERE id = $1",
        )
        .bind(player_id)
        .fetch_optional(&mut **self.conn.lock().await)
        .await?;

        Ok(row.map(|row| PlayerRef {
            player_id: row.get("id"),
            name: row.get("full_name"),
        }))
    }

    async fn increment_player_counters(
        &self,
        player_id: Uuid,
        delta: &CounterDelta,
    ) -> Result<Option<PlayerCounters>, StoreError> {
        debug!("Incrementing counters of player {}: {:?}", player_id, delta);

        // Single statement: the row lock serializes concurrent reconciliations
        let mut conn = self.conn.lock().await;
        let row = sqlx::query(
            r#"
            UPDATE players
            SET goals = GREATEST(0, goals + $2),
                assists = GREATEST(0, assists + $3),
                yellow_cards = GREATEST(0, yellow_cards + $4),
                red_cards = GREATEST(0, red_cards + $5),
                motm_wins = GREATEST(0, motm_wins + $6),
                parent_motm_wins = GREATEST(0, parent_motm_wins + $7),
                updated_at = NOW()
            WHERE id = $1
            RETURNING goals, assists, yellow_cards, red_cards, motm_wins, parent_motm_wins
            "#,
        )
        .bind(player_id)
        .bind(delta.goals)
        .bind(delta.assists)
        .bind(delta.yellow_cards)
        .bind(delta.red_cards)
        .bind(delta.motm_wins)
        .bind(delta.parent_motm_wins)
        .fetch_optional(&mut **conn)
        .await?;

        Ok(row.map(|row| PlayerCounters {
            goals: row.get("goals"),
            assists: row.get("assists"),
            yellow_cards: row.get("yellow_cards"),
            red_cards: row.get("red_cards"),
            motm_wins: row.get("motm_wins"),
            parent_motm_wins: row.get("parent_motm_wins"),
        }))
    }
}

pub async fn list_players(pool: &PgPool) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(&format!(
        "SELECT {} FROM players ORDER BY shirt_number, last_name",
        PLAYER_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

/// All players ordered by one statistic, highest first.
pub async fn players_ranked_by(pool: &PgPool, column: StatColumn) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(&format!(
        "SELECT {} FROM players ORDER BY {} DESC, last_name, first_name",
        PLAYER_COLUMNS,
        column.as_sql()
    ))
    .fetch_all(pool)
    .await
}

/// Players that can still take another linked account.
pub async fn players_with_open_accounts(pool: &PgPool, max_accounts: i64) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(&format!(
        r#"
        SELECT {} FROM players p
        WHERE (SELECT COUNT(*) FROM users u WHERE u.linked_player_id = p.id) < $1
        ORDER BY shirt_number, last_name
        "#,
        PLAYER_COLUMNS
    ))
    .bind(max_accounts)
    .fetch_all(pool)
    .await
}

/// Insert a roster entry. Duplicate full names violate `players_full_name_key`.
pub async fn insert_player(pool: &PgPool, request: &CreatePlayerRequest) -> Result<Player, sqlx::Error> {
    let player = sqlx::query_as::<_, Player>(&format!(
        r#"
        INSERT INTO players (id, first_name, last_name, shirt_number, position)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        PLAYER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(normalize_full_name(&request.first_name))
    .bind(normalize_full_name(&request.last_name))
    .bind(request.shirt_number)
    .bind(request.position)
    .fetch_one(pool)
    .await?;

    info!("Added player {} ({})", player.full_name(), player.id);
    Ok(player)
}

/// Remove a player and every account linked to it.
/// Returns `None` if the player did not exist, otherwise the number of removed accounts.
pub async fn delete_player(pool: &PgPool, player_id: Uuid) -> Result<Option<u64>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed_accounts = sqlx::query("DELETE FROM users WHERE linked_player_id = $1")
        .bind(player_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let removed = sqlx::query("DELETE FROM players WHERE id = $1")
        .bind(player_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    info!("Removed player {} and {} linked account(s)", player_id, removed_accounts);
    Ok(Some(removed_accounts))
}

/// Overwrite counters with admin-supplied values. Returns how many players were found.
pub async fn set_player_stats(pool: &PgPool, edits: &[PlayerStatsEdit]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut updated = 0;

    for edit in edits {
        updated += sqlx::query(
            r#"
            UPDATE players
            SET goals = COALESCE($2, goals),
                assists = COALESCE($3, assists),
                yellow_cards = COALESCE($4, yellow_cards),
                red_cards = COALESCE($5, red_cards),
                motm_wins = COALESCE($6, motm_wins),
                parent_motm_wins = COALESCE($7, parent_motm_wins),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(edit.player_id)
        .bind(edit.goals)
        .bind(edit.assists)
        .bind(edit.yellow_cards)
        .bind(edit.red_cards)
        .bind(edit.motm_wins)
        .bind(edit.parent_motm_wins)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    Ok(updated)
}

pub async fn reset_all_stats(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE players
        SET goals = 0, assists = 0, yellow_cards = 0, red_cards = 0,
            motm_wins = 0, parent_motm_wins = 0, updated_at = NOW()
        "#,
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
