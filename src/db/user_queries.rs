use chrono::Utc;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::user::{RegistrationRequest, UserRole, UserSummary};

/// Columns needed to authenticate a login attempt
#[derive(Debug, FromRow)]
pub struct Credentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

pub async fn find_credentials(pool: &PgPool, email: &str) -> Result<Option<Credentials>, sqlx::Error> {
    sqlx::query_as::<_, Credentials>(
        "SELECT id, email, password_hash, role FROM users WHERE LOWER(email) = LOWER($1)",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await
}

pub async fn find_user_id_by_email(pool: &PgPool, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email.trim())
        .fetch_optional(pool)
        .await
}

/// Outcome of creating an account linked to a roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkedAccount {
    Created(Uuid),
    UnknownPlayer,
    /// The player already has the maximum number of linked accounts.
    LimitReached { player_name: String },
}

/// Insert a user unless its player already has `max_accounts` linked accounts.
///
/// The player row stays locked from the count to the commit, so concurrent
/// registrations for one player are counted one after another.
pub async fn insert_linked_user(
    pool: &PgPool,
    request: &RegistrationRequest,
    password_hash: &str,
    max_accounts: i64,
) -> Result<LinkedAccount, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let player_name = sqlx::query_scalar::<_, String>(
        "SELECT first_name || ' ' || last_name FROM players WHERE id = $1 FOR UPDATE",
    )
    .bind(request.linked_player_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(player_name) = player_name else {
        return Ok(LinkedAccount::UnknownPlayer);
    };

    let linked = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE linked_player_id = $1")
        .bind(request.linked_player_id)
        .fetch_one(&mut *tx)
        .await?;
    if linked >= max_accounts {
        tracing::info!("Player {} already has {} linked accounts", request.linked_player_id, linked);
        return Ok(LinkedAccount::LimitReached { player_name });
    }

    let user_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (
            id, email, password_hash, first_name, last_name, role,
            is_player, is_parent, mobile_number, linked_player_id, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        "#,
    )
    .bind(user_id)
    .bind(request.email.trim())
    .bind(password_hash)
    .bind(request.first_name.trim())
    .bind(request.last_name.trim())
    .bind(UserRole::User)
    .bind(request.is_player)
    .bind(request.is_parent)
    .bind(request.mobile_number.as_deref().map(str::trim))
    .bind(request.linked_player_id)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute user insert query: {:?}", e);
        e
    })?;

    tx.commit().await?;
    Ok(LinkedAccount::Created(user_id))
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT
            u.id, u.email, u.first_name, u.last_name, u.role,
            u.is_player, u.is_parent, u.mobile_number,
            u.linked_player_id,
            p.first_name || ' ' || p.last_name AS linked_player_name,
            u.has_voted, u.created_at
        FROM users u
        JOIN players p ON p.id = u.linked_player_id
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}
