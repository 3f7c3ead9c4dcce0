// src/models/player.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Gk,
    Def,
    Mid,
    St,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Player {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub shirt_number: i32,
    pub position: Position,
    pub votes: i32,
    pub goals: i32,
    pub assists: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub motm_wins: i32,
    pub parent_motm_wins: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Request to add a player to the roster
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePlayerRequest {
    pub first_name: String,
    pub last_name: String,
    pub shirt_number: i32,
    pub position: Position,
}

impl CreatePlayerRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("First and last name are required".to_string());
        }

        if self.first_name.len() > 50 || self.last_name.len() > 50 {
            return Err("Names cannot exceed 50 characters".to_string());
        }

        if !(1..=99).contains(&self.shirt_number) {
            return Err("Shirt number must be between 1 and 99".to_string());
        }

        Ok(())
    }
}

/// Explicit admin override of one player's counters. Absent fields stay unchanged.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerStatsEdit {
    pub player_id: Uuid,
    pub goals: Option<i32>,
    pub assists: Option<i32>,
    pub yellow_cards: Option<i32>,
    pub red_cards: Option<i32>,
    pub motm_wins: Option<i32>,
    pub parent_motm_wins: Option<i32>,
}

impl PlayerStatsEdit {
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            self.goals,
            self.assists,
            self.yellow_cards,
            self.red_cards,
            self.motm_wins,
            self.parent_motm_wins,
        ];
        if values.iter().flatten().any(|value| *value < 0) {
            return Err(format!("Stats for player {} cannot be negative", self.player_id));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdatePlayerStatsRequest {
    pub players: Vec<PlayerStatsEdit>,
}

/// Players ranked by each tracked statistic
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatLeaders {
    pub goals: Vec<Player>,
    pub assists: Vec<Player>,
    pub motm_wins: Vec<Player>,
    pub parent_motm_wins: Vec<Player>,
    pub yellow_cards: Vec<Player>,
    pub red_cards: Vec<Player>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerRemovalResponse {
    pub player_id: Uuid,
    pub removed_accounts: u64,
}
