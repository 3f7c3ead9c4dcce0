use actix_web::{get, post, web, HttpResponse};
use sqlx::PgPool;

use crate::handlers::registration_handler::{get_available_players, register_user};
use crate::models::user::RegistrationRequest;

#[post("/register_user")]
async fn register(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
) -> HttpResponse {
    register_user(user_form, pool).await
}

#[get("/register/available_players")]
async fn available_players(pool: web::Data<PgPool>) -> HttpResponse {
    get_available_players(pool).await
}
