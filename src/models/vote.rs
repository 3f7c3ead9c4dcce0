// src/models/vote.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::player::Player;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CastVoteRequest {
    pub player_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VoteStatus {
    pub has_voted: bool,
    pub voted_for: Option<Uuid>,
}

/// Publishing a round. With `match_id` set and a single winner, the winner is
/// recorded as that match's parent Man of the Match.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct FinalizeRoundRequest {
    pub match_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoundResult {
    /// Every player sharing the top tally; empty when nobody voted.
    pub winners: Vec<Player>,
    pub winning_votes: i32,
    pub total_votes: i64,
    pub recorded_on_match: Option<Uuid>,
}
