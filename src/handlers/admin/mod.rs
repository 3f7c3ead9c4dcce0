pub mod match_handler;
pub mod player_handler;
pub mod user_handler;
pub mod vote_handler;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::models::common::ApiResponse;
use crate::services::MatchServiceError;

/// Map a failed match mutation onto a response. Every failure was rolled back,
/// so the stored match and the counters still agree.
pub(crate) fn match_service_error_response(e: MatchServiceError) -> HttpResponse {
    match e {
        MatchServiceError::NotFound(match_id) => {
            ApiResponse::fail(StatusCode::NOT_FOUND, format!("Match {} not found", match_id))
        }
        MatchServiceError::Reconcile(e) => {
            ApiResponse::fail_with_detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Player stats could not be updated; the match change was rolled back",
                e.to_string(),
            )
        }
        MatchServiceError::Database(e) => {
            tracing::error!("Database error during match mutation: {}", e);
            ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
        MatchServiceError::Store(e) => {
            tracing::error!("Player lookup failed during match mutation: {}", e);
            ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Player lookup failed")
        }
    }
}
