use actix_web::web;

use crate::handlers::match_handler;
use crate::middleware::auth::RequireAuth;

pub fn init_match_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/matches")
            .wrap(RequireAuth::user())
            .service(
                web::resource("")
                    .route(web::get().to(match_handler::get_matches))
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(match_handler::get_match))
            )
    );
}
