use actix_web::web;

use crate::handlers::admin::{match_handler, player_handler, user_handler, vote_handler};
use crate::middleware::auth::RequireAuth;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(RequireAuth::admin())
            // Match management; every change reconciles player stats
            .service(
                web::resource("/matches")
                    .route(web::post().to(match_handler::create_match))
            )
            .service(
                web::resource("/matches/{id}")
                    .route(web::put().to(match_handler::update_match))
                    .route(web::delete().to(match_handler::delete_match))
            )

            // Roster and stats
            .service(
                web::resource("/players")
                    .route(web::post().to(player_handler::create_player))
            )
            .service(
                web::resource("/players/stats")
                    .route(web::put().to(player_handler::update_player_stats))
            )
            .service(
                web::resource("/players/stats/reset")
                    .route(web::post().to(player_handler::reset_player_stats))
            )
            .service(
                web::resource("/players/{id}")
                    .route(web::delete().to(player_handler::remove_player))
            )

            // Voting rounds
            .service(
                web::resource("/votes/finalize")
                    .route(web::post().to(vote_handler::finalize_round))
            )
            .service(
                web::resource("/votes/reset")
                    .route(web::post().to(vote_handler::reset_votes))
            )

            .service(
                web::resource("/users")
                    .route(web::get().to(user_handler::get_users))
            )
    );
}
