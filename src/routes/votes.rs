use actix_web::web;

use crate::handlers::vote_handler;
use crate::middleware::auth::RequireAuth;

pub fn init_vote_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/votes")
            .wrap(RequireAuth::user())
            .service(
                web::resource("")
                    .route(web::post().to(vote_handler::submit_vote))
            )
            .service(
                web::resource("/status")
                    .route(web::get().to(vote_handler::get_vote_status))
            )
    );
}
