use actix_web::web;

use crate::handlers::player_handler;
use crate::middleware::auth::RequireAuth;

pub fn init_player_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/leaderboard")
            .route(web::get().to(player_handler::get_leaderboard))
    );
    cfg.service(
        web::scope("/players")
            .wrap(RequireAuth::user())
            .service(
                web::resource("")
                    .route(web::get().to(player_handler::get_players))
            )
            .service(
                web::resource("/stats")
                    .route(web::get().to(player_handler::get_stat_leaders))
            )
    );
}
