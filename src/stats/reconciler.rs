use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::delta::StatDelta;
use crate::stats::event_set::EventSet;
use crate::stats::store::{PlayerStatStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Subtracting the stored contribution of a match.
    Reverse,
    /// Adding the contribution of the new event-set.
    Apply,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Reverse => write!(f, "reverse"),
            Phase::Apply => write!(f, "apply"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Some player updates failed. Updates listed in `applied` stay in place.
    #[error("Stat reconciliation failed in {phase} phase: {} player(s) failed, {} already updated", .failed.len(), .applied.len())]
    PartialReconciliation {
        phase: Phase,
        applied: Vec<Uuid>,
        failed: Vec<Uuid>,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub reversed: Vec<Uuid>,
    pub applied: Vec<Uuid>,
    /// Players that vanished from the roster before their update.
    pub skipped: Vec<Uuid>,
}

/// Keeps player counters in step with match mutations.
///
/// `previous` is the stored event-set of the match (absent on create) and `new`
/// is the event-set being saved (absent on delete). An edit always reverses the
/// stored contribution before applying the new one, because the store clamps
/// each counter at zero and a net delta would not reproduce that.
pub struct StatReconciler<'a, S: PlayerStatStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PlayerStatStore + ?Sized> StatReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    #[tracing::instrument(
        name = "Reconciling match stats",
        skip_all,
        fields(
            has_previous = previous.is_some(),
            has_new = new.is_some()
        )
    )]
    pub async fn reconcile(
        &self,
        previous: Option<&EventSet>,
        new: Option<&EventSet>,
    ) -> Result<ReconcileReport, ReconcileError> {
        let mut report = ReconcileReport::default();

        if let Some(previous) = previous {
            let delta = StatDelta::from_events(previous).negated();
            report.reversed = self
                .apply_phase(Phase::Reverse, &delta, &mut report.skipped, &[])
                .await?;
        }

        if let Some(new) = new {
            let delta = StatDelta::from_events(new);
            report.applied = self
                .apply_phase(Phase::Apply, &delta, &mut report.skipped, &report.reversed)
                .await?;
        }

        tracing::info!(
            "Reconciled stats: {} reversed, {} applied, {} skipped",
            report.reversed.len(),
            report.applied.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Issue one atomic increment per player. A failing player does not stop
    /// the rest of the phase, but a phase with failures ends the reconciliation.
    async fn apply_phase(
        &self,
        phase: Phase,
        delta: &StatDelta,
        skipped: &mut Vec<Uuid>,
        already_applied: &[Uuid],
    ) -> Result<Vec<Uuid>, ReconcileError> {
        let mut updated = Vec::with_capacity(delta.len());
        let mut failed = Vec::new();
        let mut first_error = None;

        for (player_id, counters) in delta.iter() {
            match self.store.increment_player_counters(*player_id, counters).await {
                Ok(Some(totals)) => {
                    tracing::debug!("{} phase updated player {}: {:?}", phase, player_id, totals);
                    updated.push(*player_id);
                }
                Ok(None) => {
                    tracing::warn!("Player {} no longer exists, skipping {} phase update", player_id, phase);
                    if !skipped.contains(player_id) {
                        skipped.push(*player_id);
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to update player {} in {} phase: {}", player_id, phase, e);
                    failed.push(*player_id);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(source) => {
                let mut applied = already_applied.to_vec();
                applied.extend(updated);
                Err(ReconcileError::PartialReconciliation {
                    phase,
                    applied,
                    failed,
                    source,
                })
            }
            None => Ok(updated),
        }
    }
}
