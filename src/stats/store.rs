use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::delta::CounterDelta;
use crate::stats::event_set::PlayerRef;

/// Outcome of looking a player up by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerLookup {
    Found(PlayerRef),
    NotFound,
    /// More than one roster entry carries the name.
    Ambiguous(usize),
}

/// The reconciled counters of one player, as stored after an increment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCounters {
    pub goals: i32,
    pub assists: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub motm_wins: i32,
    pub parent_motm_wins: i32,
}

impl PlayerCounters {
    /// Add a signed delta, flooring every counter at zero.
    pub fn apply(&self, delta: &CounterDelta) -> Self {
        fn clamp(current: i32, change: i32) -> i32 {
            current.saturating_add(change).max(0)
        }

        Self {
            goals: clamp(self.goals, delta.goals),
            assists: clamp(self.assists, delta.assists),
            yellow_cards: clamp(self.yellow_cards, delta.yellow_cards),
            red_cards: clamp(self.red_cards, delta.red_cards),
            motm_wins: clamp(self.motm_wins, delta.motm_wins),
            parent_motm_wins: clamp(self.parent_motm_wins, delta.parent_motm_wins),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Player store unavailable: {0}")]
    Unavailable(String),
}

/// Data-access capability the reconciliation engine needs from the player store.
///
/// `increment_player_counters` must be a single atomic read-modify-write on the
/// backing store so that concurrent reconciliations touching the same player do
/// not lose updates. Counters are clamped at zero by the store.
#[async_trait]
pub trait PlayerStatStore: Send + Sync {
    /// Case-insensitive match on `first_name + " " + last_name`.
    async fn find_player_by_full_name(&self, name: &str) -> Result<PlayerLookup, StoreError>;

    async fn find_player_by_id(&self, player_id: Uuid) -> Result<Option<PlayerRef>, StoreError>;

    /// Returns `None` when the player no longer exists.
    async fn increment_player_counters(
        &self,
        player_id: Uuid,
        delta: &CounterDelta,
    ) -> Result<Option<PlayerCounters>, StoreError>;
}
