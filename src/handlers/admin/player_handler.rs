use actix_web::{web, HttpResponse, Result};
use actix_web::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::{db_result, is_unique_violation};
use crate::db::player_queries::{delete_player, insert_player, reset_all_stats, set_player_stats};
use crate::models::common::ApiResponse;
use crate::models::player::{CreatePlayerRequest, PlayerRemovalResponse, UpdatePlayerStatsRequest};
use crate::ok_or_return;

// POST /admin/players
#[tracing::instrument(
    name = "Admin adding player",
    skip(request, pool),
    fields(first_name = %request.first_name, last_name = %request.last_name)
)]
pub async fn create_player(
    request: web::Json<CreatePlayerRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    if let Err(message) = request.validate() {
        return Ok(ApiResponse::fail(StatusCode::BAD_REQUEST, message));
    }

    match insert_player(&pool, &request).await {
        Ok(player) => Ok(ApiResponse::created("Player added", player)),
        Err(e) if is_unique_violation(&e) => Ok(ApiResponse::fail(
            StatusCode::CONFLICT,
            "A player with this name is already on the roster",
        )),
        Err(e) => {
            tracing::error!("Failed to add player: {}", e);
            Ok(ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Database error"))
        }
    }
}

// DELETE /admin/players/{id}
#[tracing::instrument(name = "Admin removing player", skip(pool))]
pub async fn remove_player(
    player_id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let player_id = player_id.into_inner();

    match ok_or_return!(db_result(delete_player(&pool, player_id).await)) {
        Some(removed_accounts) => Ok(ApiResponse::ok(
            "Player removed",
            PlayerRemovalResponse {
                player_id,
                removed_accounts,
            },
        )),
        None => Ok(ApiResponse::fail(StatusCode::NOT_FOUND, "Player not found")),
    }
}

// PUT /admin/players/stats
#[tracing::instrument(name = "Admin editing player stats", skip(request, pool))]
pub async fn update_player_stats(
    request: web::Json<UpdatePlayerStatsRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    if request.players.is_empty() {
        return Ok(ApiResponse::fail(StatusCode::BAD_REQUEST, "No player stats supplied"));
    }

    for edit in &request.players {
        if let Err(message) = edit.validate() {
            return Ok(ApiResponse::fail(StatusCode::BAD_REQUEST, message));
        }
    }

    let updated = ok_or_return!(db_result(set_player_stats(&pool, &request.players).await));
    tracing::info!("Stats overwritten for {} of {} player(s)", updated, request.players.len());

    Ok(ApiResponse::ok(
        "Player stats updated",
        json!({ "updated": updated }),
    ))
}

// POST /admin/players/stats/reset
#[tracing::instrument(name = "Admin resetting all player stats", skip(pool))]
pub async fn reset_player_stats(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let updated = ok_or_return!(db_result(reset_all_stats(&pool).await));
    tracing::warn!("Season stats reset for {} player(s)", updated);

    Ok(ApiResponse::ok(
        "Player stats reset",
        json!({ "updated": updated }),
    ))
}
