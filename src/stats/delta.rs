use std::collections::BTreeMap;
use std::ops::{AddAssign, Neg};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::event_set::EventSet;

/// Signed change to each aggregate counter of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterDelta {
    pub goals: i32,
    pub assists: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub motm_wins: i32,
    pub parent_motm_wins: i32,
}

impl CounterDelta {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for CounterDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.goals = self.goals.saturating_add(rhs.goals);
        self.assists = self.assists.saturating_add(rhs.assists);
        self.yellow_cards = self.yellow_cards.saturating_add(rhs.yellow_cards);
        self.red_cards = self.red_cards.saturating_add(rhs.red_cards);
        self.motm_wins = self.motm_wins.saturating_add(rhs.motm_wins);
        self.parent_motm_wins = self.parent_motm_wins.saturating_add(rhs.parent_motm_wins);
    }
}

impl Neg for CounterDelta {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            goals: self.goals.saturating_neg(),
            assists: self.assists.saturating_neg(),
            yellow_cards: self.yellow_cards.saturating_neg(),
            red_cards: self.red_cards.saturating_neg(),
            motm_wins: self.motm_wins.saturating_neg(),
            parent_motm_wins: self.parent_motm_wins.saturating_neg(),
        }
    }
}

/// Per-player contribution of one match event-set.
///
/// Players are kept in id order so updates are always issued in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatDelta {
    per_player: BTreeMap<Uuid, CounterDelta>,
}

impl StatDelta {
    pub fn from_events(events: &EventSet) -> Self {
        let mut delta = Self::default();

        for entry in events.scorers() {
            if let Some(scorer) = &entry.scorer {
                // Anything past i32::MAX saturates instead of wrapping
                let goals = i32::try_from(entry.goals).unwrap_or(i32::MAX);
                delta.add(scorer.player_id, CounterDelta { goals, ..Default::default() });
            }
            if let Some(assist) = &entry.assist {
                delta.add(assist.player_id, CounterDelta { assists: 1, ..Default::default() });
            }
        }

        for card in &events.yellow_cards {
            delta.add(card.player_id, CounterDelta { yellow_cards: 1, ..Default::default() });
        }
        for card in &events.red_cards {
            delta.add(card.player_id, CounterDelta { red_cards: 1, ..Default::default() });
        }

        if let Some(honoree) = &events.opposition_motm {
            delta.add(honoree.player_id, CounterDelta { motm_wins: 1, ..Default::default() });
        }
        if let Some(honoree) = &events.parent_motm {
            delta.add(honoree.player_id, CounterDelta { parent_motm_wins: 1, ..Default::default() });
        }

        delta.per_player.retain(|_, counters| !counters.is_zero());
        delta
    }

    pub fn negated(&self) -> Self {
        Self {
            per_player: self
                .per_player
                .iter()
                .map(|(player_id, counters)| (*player_id, -*counters))
                .collect(),
        }
    }

    pub fn get(&self, player_id: &Uuid) -> Option<&CounterDelta> {
        self.per_player.get(player_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &CounterDelta)> {
        self.per_player.iter()
    }

    pub fn len(&self) -> usize {
        self.per_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_player.is_empty()
    }

    fn add(&mut self, player_id: Uuid, change: CounterDelta) {
        *self.per_player.entry(player_id).or_default() += change;
    }
}
