pub mod auth;
pub mod common;
pub mod match_record;
pub mod player;
pub mod user;
pub mod vote;
