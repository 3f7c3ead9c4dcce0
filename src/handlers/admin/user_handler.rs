use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::user_queries::list_users;
use crate::models::common::ApiResponse;
use crate::ok_or_return;

// GET /admin/users
pub async fn get_users(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let users = ok_or_return!(db_result(list_users(&pool).await));
    Ok(ApiResponse::ok("Users", users))
}
