use actix_web::{web, HttpResponse, Result};
use actix_web::http::StatusCode;
use sqlx::PgPool;

use crate::auth::Claims;
use crate::db::helpers::{db_result, require_record};
use crate::db::vote_queries::{cast_vote, vote_status, VoteOutcome};
use crate::models::common::ApiResponse;
use crate::models::vote::CastVoteRequest;
use crate::ok_or_return;

#[tracing::instrument(
    name = "Casting vote",
    skip(request, pool, claims),
    fields(user = %claims.sub, player_id = %request.player_id)
)]
pub async fn submit_vote(
    request: web::Json<CastVoteRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let outcome = ok_or_return!(db_result(cast_vote(&pool, claims.user_id(), request.player_id).await));

    let response = match outcome {
        VoteOutcome::Recorded => {
            tracing::info!("Vote recorded");
            ApiResponse::done(StatusCode::CREATED, "Vote recorded")
        }
        VoteOutcome::AlreadyVoted => {
            ApiResponse::fail(StatusCode::CONFLICT, "You have already voted this round")
        }
        VoteOutcome::UnknownPlayer => ApiResponse::fail(StatusCode::NOT_FOUND, "Player not found"),
    };

    Ok(response)
}

pub async fn get_vote_status(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let status = ok_or_return!(require_record(vote_status(&pool, claims.user_id()).await, "User not found"));
    Ok(ApiResponse::ok("Vote status", status))
}
