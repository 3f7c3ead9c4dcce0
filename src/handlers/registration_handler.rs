use actix_web::{web, HttpResponse};
use actix_web::http::StatusCode;
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::PgPool;

use crate::db::helpers::{ensure_not_exists, is_unique_violation};
use crate::db::player_queries::players_with_open_accounts;
use crate::db::user_queries::{find_user_id_by_email, insert_linked_user, LinkedAccount};
use crate::models::common::ApiResponse;
use crate::models::user::{RegistrationRequest, MAX_ACCOUNTS_PER_PLAYER};
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool),
    fields(
        email = %user_form
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
) -> HttpResponse {
    if let Err(message) = user_form.validate() {
        return ApiResponse::fail(StatusCode::BAD_REQUEST, message);
    }

    if let Err(response) = ensure_not_exists(
        find_user_id_by_email(&pool, &user_form.email).await,
        "An account with this email already exists",
    ) {
        return response;
    }

    let password_hash = match hash_password(user_form.password.expose_secret()) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {:?}", e);
            return ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create account");
        }
    };

    match insert_linked_user(&pool, &user_form, &password_hash, MAX_ACCOUNTS_PER_PLAYER).await {
        Ok(LinkedAccount::Created(user_id)) => ApiResponse::created(
            "Account created",
            json!({ "user_id": user_id, "linked_player_id": user_form.linked_player_id }),
        ),
        Ok(LinkedAccount::UnknownPlayer) => {
            ApiResponse::fail(StatusCode::NOT_FOUND, "Player not found")
        }
        Ok(LinkedAccount::LimitReached { player_name }) => ApiResponse::fail(
            StatusCode::CONFLICT,
            format!(
                "{} already has the maximum of {} linked accounts",
                player_name, MAX_ACCOUNTS_PER_PLAYER
            ),
        ),
        // Lost a race with a concurrent registration for the same email
        Err(e) if is_unique_violation(&e) => {
            ApiResponse::fail(StatusCode::CONFLICT, "An account with this email already exists")
        }
        Err(_) => ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create account"),
    }
}

/// Players a new account may still link to.
pub async fn get_available_players(pool: web::Data<PgPool>) -> HttpResponse {
    match players_with_open_accounts(&pool, MAX_ACCOUNTS_PER_PLAYER).await {
        Ok(players) => ApiResponse::ok("Available players", players),
        Err(e) => {
            tracing::error!("Failed to list available players: {:?}", e);
            ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}
