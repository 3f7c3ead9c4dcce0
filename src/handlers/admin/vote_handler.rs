use actix_web::{web, HttpResponse, Result};
use actix_web::http::StatusCode;
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::vote_queries::{reset_round, round_leaders};
use crate::handlers::admin::match_service_error_response;
use crate::models::common::ApiResponse;
use crate::models::vote::{FinalizeRoundRequest, RoundResult};
use crate::ok_or_return;
use crate::services::MatchService;
use crate::stats::PlayerRef;

// POST /admin/votes/finalize
#[tracing::instrument(name = "Admin finalizing vote round", skip(request, pool, match_service))]
pub async fn finalize_round(
    request: Option<web::Json<FinalizeRoundRequest>>,
    pool: web::Data<PgPool>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let (winners, total_votes) = ok_or_return!(db_result(round_leaders(&pool).await));
    let winning_votes = winners.first().map(|player| player.votes).unwrap_or(0);

    if let Some(match_id) = request.match_id {
        let [winner] = winners.as_slice() else {
            return Ok(ApiResponse::fail(
                StatusCode::CONFLICT,
                format!(
                    "Parent vote has {} leading players; a single winner is needed to record a Man of the Match",
                    winners.len()
                ),
            ));
        };

        let winner_ref = PlayerRef {
            player_id: winner.id,
            name: winner.full_name(),
        };
        if let Err(e) = match_service.record_parent_motm(match_id, winner_ref).await {
            return Ok(match_service_error_response(e));
        }
    }

    ok_or_return!(db_result(reset_round(&pool).await));
    tracing::info!("Vote round finalized: {} winner(s), {} vote(s)", winners.len(), total_votes);

    Ok(ApiResponse::ok(
        "Vote round finalized",
        RoundResult {
            winners,
            winning_votes,
            total_votes,
            recorded_on_match: request.match_id,
        },
    ))
}

// POST /admin/votes/reset
#[tracing::instrument(name = "Admin resetting vote round", skip(pool))]
pub async fn reset_votes(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    ok_or_return!(db_result(reset_round(&pool).await));
    Ok(ApiResponse::done(StatusCode::OK, "Votes reset"))
}
