use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::player_queries::{list_players, players_ranked_by, StatColumn};
use crate::models::common::ApiResponse;
use crate::models::player::StatLeaders;
use crate::ok_or_return;

pub async fn get_players(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let players = ok_or_return!(db_result(list_players(&pool).await));
    Ok(ApiResponse::ok("Players", players))
}

/// Public vote leaderboard, highest tally first.
pub async fn get_leaderboard(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let players = ok_or_return!(db_result(players_ranked_by(&pool, StatColumn::Votes).await));
    Ok(ApiResponse::ok("Leaderboard", players))
}

#[tracing::instrument(name = "Loading stat leaders", skip(pool))]
pub async fn get_stat_leaders(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let leaders = StatLeaders {
        goals: ok_or_return!(db_result(players_ranked_by(&pool, StatColumn::Goals).await)),
        assists: ok_or_return!(db_result(players_ranked_by(&pool, StatColumn::Assists).await)),
        motm_wins: ok_or_return!(db_result(players_ranked_by(&pool, StatColumn::MotmWins).await)),
        parent_motm_wins: ok_or_return!(db_result(players_ranked_by(&pool, StatColumn::ParentMotmWins).await)),
        yellow_cards: ok_or_return!(db_result(players_ranked_by(&pool, StatColumn::YellowCards).await)),
        red_cards: ok_or_return!(db_result(players_ranked_by(&pool, StatColumn::RedCards).await)),
    };

    Ok(ApiResponse::ok("Stat leaders", leaders))
}
