use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::stats::delta::CounterDelta;
use crate::stats::event_set::{normalize_full_name, PlayerRef};
use crate::stats::store::{PlayerCounters, PlayerLookup, PlayerStatStore, StoreError};

#[derive(Debug, Clone)]
struct StoredPlayer {
    first_name: String,
    last_name: String,
    counters: PlayerCounters,
}

impl StoredPlayer {
    fn full_name(&self) -> String {
        normalize_full_name(&format!("{} {}", self.first_name, self.last_name))
    }
}

#[derive(Debug, Default)]
struct Inner {
    players: BTreeMap<Uuid, StoredPlayer>,
    unavailable: HashSet<Uuid>,
}

/// Player store held in process memory.
///
/// Each increment runs under a single lock, so it is atomic in the same sense as
/// the Postgres store. Updates for a player can be made to fail on demand to
/// exercise partial reconciliation.
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    inner: Mutex<Inner>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_player(&self, first_name: &str, last_name: &str) -> Uuid {
        let player_id = Uuid::new_v4();
        self.lock().players.insert(
            player_id,
            StoredPlayer {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                counters: PlayerCounters::default(),
            },
        );
        player_id
    }

    pub fn remove_player(&self, player_id: Uuid) -> bool {
        self.lock().players.remove(&player_id).is_some()
    }

    pub fn counters(&self, player_id: Uuid) -> Option<PlayerCounters> {
        self.lock().players.get(&player_id).map(|player| player.counters)
    }

    /// Make every later update of `player_id` fail as if the store were unreachable.
    pub fn make_unavailable(&self, player_id: Uuid) {
        self.lock().unavailable.insert(player_id);
    }

    pub fn make_available(&self, player_id: Uuid) {
        self.lock().unavailable.remove(&player_id);
    }
}

#[async_trait]
impl PlayerStatStore for InMemoryPlayerStore {
    async fn find_player_by_full_name(&self, name: &str) -> Result<PlayerLookup, StoreError> {
        let wanted = normalize_full_name(name).to_lowercase();
        let inner = self.lock();
        let matches: Vec<PlayerRef> = inner
            .players
            .iter()
            .filter(|(_, player)| player.full_name().to_lowercase() == wanted)
            .map(|(player_id, player)| PlayerRef {
                player_id: *player_id,
                name: player.full_name(),
            })
            .collect();

        Ok(match matches.len() {
            0 => PlayerLookup::NotFound,
            1 => PlayerLookup::Found(matches[0].clone()),
            count => PlayerLookup::Ambiguous(count),
        })
    }

    async fn find_player_by_id(&self, player_id: Uuid) -> Result<Option<PlayerRef>, StoreError> {
        Ok(self.lock().players.get(&player_id).map(|player| PlayerRef {
            player_id,
            name: player.full_name(),
        }))
    }

    async fn increment_player_counters(
        &self,
        player_id: Uuid,
        delta: &CounterDelta,
    ) -> Result<Option<PlayerCounters>, StoreError> {
        let mut inner = self.lock();
        if inner.unavailable.contains(&player_id) {
            return Err(StoreError::Unavailable(format!(
                "update of player {} rejected",
                player_id
            )));
        }

        Ok(inner.players.get_mut(&player_id).map(|player| {
            player.counters = player.counters.apply(delta);
            player.counters
        }))
    }
}
