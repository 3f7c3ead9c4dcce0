use actix_web::{web, HttpResponse, Result};
use actix_web::http::StatusCode;
use uuid::Uuid;

use crate::handlers::admin::match_service_error_response;
use crate::models::common::ApiResponse;
use crate::models::match_record::{MatchMutationResponse, MatchRequest};
use crate::services::MatchService;

// POST /admin/matches
#[tracing::instrument(name = "Admin creating match", skip(request, match_service))]
pub async fn create_match(
    request: web::Json<MatchRequest>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    if let Err(message) = request.validate() {
        return Ok(ApiResponse::fail(StatusCode::BAD_REQUEST, message));
    }

    let mutation = match match_service.create_match(&request).await {
        Ok(mutation) => mutation,
        Err(e) => return Ok(match_service_error_response(e)),
    };

    let Some(record) = mutation.record else {
        return Ok(ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Match was not stored"));
    };

    if !mutation.unresolved.is_empty() {
        tracing::warn!("Match {} recorded with unresolved names: {:?}", record.id, mutation.unresolved);
    }

    Ok(ApiResponse::created(
        "Match recorded",
        MatchMutationResponse {
            match_id: record.id,
            unresolved: mutation.unresolved,
            report: mutation.report,
        },
    ))
}

// PUT /admin/matches/{id}
#[tracing::instrument(name = "Admin editing match", skip(request, match_service))]
pub async fn update_match(
    match_id: web::Path<Uuid>,
    request: web::Json<MatchRequest>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    if let Err(message) = request.validate() {
        return Ok(ApiResponse::fail(StatusCode::BAD_REQUEST, message));
    }

    let match_id = match_id.into_inner();
    match match_service.update_match(match_id, &request).await {
        Ok(mutation) => Ok(ApiResponse::ok(
            "Match updated",
            MatchMutationResponse {
                match_id,
                unresolved: mutation.unresolved,
                report: mutation.report,
            },
        )),
        Err(e) => Ok(match_service_error_response(e)),
    }
}

// DELETE /admin/matches/{id}
#[tracing::instrument(name = "Admin deleting match", skip(match_service))]
pub async fn delete_match(
    match_id: web::Path<Uuid>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let match_id = match_id.into_inner();
    match match_service.delete_match(match_id).await {
        Ok(mutation) => Ok(ApiResponse::ok(
            "Match deleted",
            MatchMutationResponse {
                match_id,
                unresolved: mutation.unresolved,
                report: mutation.report,
            },
        )),
        Err(e) => Ok(match_service_error_response(e)),
    }
}
