// src/models/match_record.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::stats::{EventSet, EventSetInput, ReconcileReport};

/// Most goals a single scorer entry may record.
pub const MAX_GOALS_PER_ENTRY: u32 = 99;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    League,
    Cup,
    Friendly,
}

/// A recorded fixture together with the events that feed player stats
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct MatchRecord {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    pub match_type: MatchType,
    pub played_at: DateTime<Utc>,
    pub events: Json<EventSet>,
    pub needs_stat_repair: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of both the create and the edit request. An edit replaces every field.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchRequest {
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    pub match_type: MatchType,
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: EventSetInput,
}

impl MatchRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.home_team.trim().is_empty() || self.away_team.trim().is_empty() {
            return Err("Both team names are required".to_string());
        }

        if self.home_score < 0 || self.away_score < 0 {
            return Err("Scores cannot be negative".to_string());
        }

        let scorer_entries = self
            .events
            .first_half_scorers
            .iter()
            .chain(self.events.second_half_scorers.iter());
        for entry in scorer_entries {
            match entry.goals {
                Some(0) => return Err(format!("Scorer entry for {} records no goals", entry.name)),
                Some(goals) if goals > MAX_GOALS_PER_ENTRY => {
                    return Err(format!(
                        "Scorer entry for {} records {} goals, at most {} are allowed",
                        entry.name, goals, MAX_GOALS_PER_ENTRY
                    ))
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchMutationResponse {
    pub match_id: Uuid,
    /// Names that matched no roster entry; their events were not recorded.
    pub unresolved: Vec<String>,
    pub report: ReconcileReport,
}
