use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::store::{PlayerLookup, PlayerStatStore, StoreError};

/// How an incoming event names a player: a stable id or the free-text full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerSelector {
    Id { player_id: Uuid },
    Name(String),
}

impl PlayerSelector {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn id(player_id: Uuid) -> Self {
        Self::Id { player_id }
    }

    /// Free-text forms leave blank fields behind; those name nobody.
    fn is_blank(&self) -> bool {
        matches!(self, Self::Name(name) if name.trim().is_empty())
    }
}

impl fmt::Display for PlayerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id { player_id } => write!(f, "{}", player_id),
            Self::Name(name) => write!(f, "{}", name.trim()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerInput {
    pub name: PlayerSelector,
    /// Defaults to one goal when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assist: Option<PlayerSelector>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardInput {
    pub name: PlayerSelector,
}

/// Match events as submitted by an admin, before players are resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSetInput {
    pub first_half_scorers: Vec<ScorerInput>,
    pub second_half_scorers: Vec<ScorerInput>,
    pub yellow_cards: Vec<CardInput>,
    pub red_cards: Vec<CardInput>,
    pub opposition_motm: Option<PlayerSelector>,
    pub parent_motm: Option<PlayerSelector>,
}

/// A player reference captured at entry time. The name is kept for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub player_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorer {
    pub scorer: Option<PlayerRef>,
    pub goals: u32,
    pub assist: Option<PlayerRef>,
}

/// The resolved events of one match, as stored with the match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSet {
    pub first_half_scorers: Vec<Scorer>,
    pub second_half_scorers: Vec<Scorer>,
    pub yellow_cards: Vec<PlayerRef>,
    pub red_cards: Vec<PlayerRef>,
    pub opposition_motm: Option<PlayerRef>,
    pub parent_motm: Option<PlayerRef>,
}

impl EventSet {
    pub fn scorers(&self) -> impl Iterator<Item = &Scorer> {
        self.first_half_scorers
            .iter()
            .chain(self.second_half_scorers.iter())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub events: EventSet,
    /// Selectors that named no player, or more than one.
    pub unresolved: Vec<String>,
}

/// Collapse inner whitespace and trim, the form both stores compare against.
pub fn normalize_full_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve every selector in `input` to a player id.
///
/// Unknown or ambiguous names are dropped from the resulting event-set and
/// listed in [`Resolution::unresolved`]; only store failures are errors.
#[tracing::instrument(name = "Resolving match events", skip_all)]
pub async fn resolve_event_set<S>(store: &S, input: &EventSetInput) -> Result<Resolution, StoreError>
where
    S: PlayerStatStore + ?Sized,
{
    let mut resolver = Resolver::new(store);
    let mut events = EventSet::default();

    events.first_half_scorers = resolver.resolve_scorers(&input.first_half_scorers).await?;
    events.second_half_scorers = resolver.resolve_scorers(&input.second_half_scorers).await?;
    events.yellow_cards = resolver.resolve_cards(&input.yellow_cards).await?;
    events.red_cards = resolver.resolve_cards(&input.red_cards).await?;
    events.opposition_motm = resolver.resolve_optional(input.opposition_motm.as_ref()).await?;
    events.parent_motm = resolver.resolve_optional(input.parent_motm.as_ref()).await?;

    Ok(Resolution {
        events,
        unresolved: resolver.unresolved,
    })
}

struct Resolver<'a, S: ?Sized> {
    store: &'a S,
    cache: HashMap<PlayerSelector, Option<PlayerRef>>,
    unresolved: Vec<String>,
}

impl<'a, S> Resolver<'a, S>
where
    S: PlayerStatStore + ?Sized,
{
    fn new(store: &'a S) -> Self {
        Self {
            store,
            cache: HashMap::new(),
            unresolved: Vec::new(),
        }
    }

    async fn resolve_scorers(&mut self, entries: &[ScorerInput]) -> Result<Vec<Scorer>, StoreError> {
        let mut scorers = Vec::with_capacity(entries.len());
        for entry in entries {
            let scorer = self.resolve(&entry.name).await?;
            let assist = self.resolve_optional(entry.assist.as_ref()).await?;
            if scorer.is_none() && assist.is_none() {
                continue;
            }
            scorers.push(Scorer {
                scorer,
                goals: entry.goals.unwrap_or(1),
                assist,
            });
        }
        Ok(scorers)
    }

    async fn resolve_cards(&mut self, entries: &[CardInput]) -> Result<Vec<PlayerRef>, StoreError> {
        let mut cards = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(player) = self.resolve(&entry.name).await? {
                cards.push(player);
            }
        }
        Ok(cards)
    }

    async fn resolve_optional(
        &mut self,
        selector: Option<&PlayerSelector>,
    ) -> Result<Option<PlayerRef>, StoreError> {
        match selector {
            Some(selector) => self.resolve(selector).await,
            None => Ok(None),
        }
    }

    async fn resolve(&mut self, selector: &PlayerSelector) -> Result<Option<PlayerRef>, StoreError> {
        if selector.is_blank() {
            return Ok(None);
        }

        let key = match selector {
            PlayerSelector::Name(name) => PlayerSelector::Name(normalize_full_name(name).to_lowercase()),
            id => id.clone(),
        };
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let resolved = match selector {
            PlayerSelector::Id { player_id } => {
                let found = self.store.find_player_by_id(*player_id).await?;
                if found.is_none() {
                    tracing::warn!("No player with id {}, skipping its events", player_id);
                }
                found
            }
            PlayerSelector::Name(name) => {
                let name = normalize_full_name(name);
                match self.store.find_player_by_full_name(&name).await? {
                    PlayerLookup::Found(player) => Some(player),
                    PlayerLookup::NotFound => {
                        tracing::warn!("No player named '{}', skipping its events", name);
                        None
                    }
                    PlayerLookup::Ambiguous(count) => {
                        tracing::warn!("{} players are named '{}', skipping its events", count, name);
                        None
                    }
                }
            }
        };

        if resolved.is_none() {
            let label = selector.to_string();
            if !self.unresolved.contains(&label) {
                self.unresolved.push(label);
            }
        }
        self.cache.insert(key, resolved.clone());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_accepts_name_or_id() {
        let id = Uuid::new_v4();
        let by_name: PlayerSelector = serde_json::from_value(serde_json::json!("Alex Love")).unwrap();
        let by_id: PlayerSelector =
            serde_json::from_value(serde_json::json!({ "player_id": id.to_string() })).unwrap();

        assert_eq!(by_name, PlayerSelector::name("Alex Love"));
        assert_eq!(by_id, PlayerSelector::id(id));
    }

    #[test]
    fn test_event_set_input_fields_are_optional() {
        let input: EventSetInput = serde_json::from_value(serde_json::json!({
            "first_half_scorers": [{ "name": "Alex Love" }]
        }))
        .unwrap();

        assert_eq!(input.first_half_scorers.len(), 1);
        assert!(input.first_half_scorers[0].goals.is_none());
        assert!(input.yellow_cards.is_empty());
        assert!(input.parent_motm.is_none());
    }

    #[test]
    fn test_normalize_full_name() {
        assert_eq!(normalize_full_name("  Alex   Love "), "Alex Love");
        assert_eq!(normalize_full_name(""), "");
    }
}
