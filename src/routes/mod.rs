use actix_web::web;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod matches;
pub mod players;
pub mod registration;
pub mod votes;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(registration::available_players)
        .service(backend_health::backend_health)
        .service(auth::login);

    players::init_player_routes(cfg);
    matches::init_match_routes(cfg);
    votes::init_vote_routes(cfg);
    admin::init_admin_routes(cfg);
}
