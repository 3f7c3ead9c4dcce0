pub mod match_service;

pub use match_service::{MatchMutation, MatchService, MatchServiceError};
