// src/handlers/auth_handler.rs
use actix_web::{web, HttpResponse};
use actix_web::http::StatusCode;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::auth::jwt::{generate_token, Claims};
use crate::config::jwt::JwtSettings;
use crate::db::user_queries::find_credentials;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::common::ApiResponse;
use crate::utils::password::verify_password;

#[tracing::instrument(
    name = "Login user attempt",
    skip(login_form, pool, jwt_settings),
    fields(
        email = %login_form.email
    )
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    let credentials = match find_credentials(pool.get_ref(), &login_form.email).await {
        Ok(Some(credentials)) => credentials,
        Ok(None) => {
            tracing::info!("User not found or invalid credentials");
            return ApiResponse::fail(StatusCode::UNAUTHORIZED, "Invalid email or password");
        }
        Err(e) => {
            tracing::error!("Database error occurred: {:?}", e);
            return ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
        }
    };

    if !verify_password(login_form.password.expose_secret(), &credentials.password_hash) {
        tracing::info!("Invalid password");
        return ApiResponse::fail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    let claims = Claims::new(credentials.id, &credentials.email, credentials.role, &jwt_settings);
    let token = match generate_token(&claims, &jwt_settings) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            return ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token");
        }
    };

    HttpResponse::Ok().json(LoginResponse { token })
}
