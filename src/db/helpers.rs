//! Database query helper functions to reduce boilerplate error handling.
//!
//! These helpers simplify common patterns like:
//! - Fetching a required record (NotFound if missing)
//! - Ensuring a record doesn't exist (Conflict if it does)
//!
//! # Usage
//!
//! For handlers returning `Result<HttpResponse>`:
//! ```ignore
//! let record = ok_or_return!(require_record(query.fetch_optional(pool).await, "Match not found"));
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::models::common::ApiResponse;

/// Macro for handlers returning `Result<HttpResponse>`.
/// Converts a `DbResult<T>` to return `Ok(error_response)` on error.
///
/// # Example
/// ```ignore
/// let record = ok_or_return!(require_record(
///     find_match(pool, match_id).await,
///     "Match not found"
/// ));
/// ```
#[macro_export]
macro_rules! ok_or_return {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(response) => return Ok(response),
        }
    };
}

/// Result type for database operations that return an HttpResponse on error
pub type DbResult<T> = Result<T, HttpResponse>;

fn database_error(e: &sqlx::Error) -> HttpResponse {
    tracing::error!("Database error: {}", e);
    ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

/// Unwrap an optional database result, returning NotFound if None.
pub fn require_record<T>(
    result: Result<Option<T>, sqlx::Error>,
    not_found_message: &str,
) -> DbResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(ApiResponse::fail(StatusCode::NOT_FOUND, not_found_message)),
        Err(e) => Err(database_error(&e)),
    }
}

/// Ensure a record does NOT exist, returning Conflict if it does.
pub fn ensure_not_exists<T>(
    result: Result<Option<T>, sqlx::Error>,
    conflict_message: &str,
) -> DbResult<()> {
    match result {
        Ok(Some(_)) => Err(ApiResponse::fail(StatusCode::CONFLICT, conflict_message)),
        Ok(None) => Ok(()),
        Err(e) => Err(database_error(&e)),
    }
}

/// Unwrap a database result, returning InternalServerError on error.
/// Use this when you just need to handle the Err case.
pub fn db_result<T>(result: Result<T, sqlx::Error>) -> DbResult<T> {
    result.map_err(|e| database_error(&e))
}

/// Postgres reports unique constraint violations with SQLSTATE 23505.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}
