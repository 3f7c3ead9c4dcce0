pub mod helpers;
pub mod match_queries;
pub mod player_queries;
pub mod user_queries;
pub mod vote_queries;
