use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::{db_result, require_record};
use crate::db::match_queries::{find_match, list_matches};
use crate::models::common::ApiResponse;
use crate::ok_or_return;

pub async fn get_matches(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let matches = ok_or_return!(db_result(list_matches(&pool).await));
    Ok(ApiResponse::ok("Matches", matches))
}

pub async fn get_match(pool: web::Data<PgPool>, match_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let record = ok_or_return!(require_record(
        find_match(&pool, match_id.into_inner()).await,
        "Match not found"
    ));
    Ok(ApiResponse::ok("Match", record))
}
