use sqlx::PgPool;
use uuid::Uuid;
use tracing::{error, info};

use crate::db::match_queries;
use crate::db::player_queries::PgPlayerStore;
use crate::models::match_record::{MatchRecord, MatchRequest};
use crate::stats::{
    resolve_event_set, EventSet, PlayerRef, ReconcileError, ReconcileReport, StatReconciler,
    StoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error("Match not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Player store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

#[derive(Debug)]
pub struct MatchMutation {
    pub record: Option<MatchRecord>,
    pub unresolved: Vec<String>,
    pub report: ReconcileReport,
}

/// Every change to a recorded match goes through here, so player stats are
/// reconciled by the same routine for create, edit, delete and vote results.
///
/// Each mutation runs on a single transaction: the counter increments and the
/// match row commit together, and any failure rolls both back.
#[derive(Debug, Clone)]
pub struct MatchService {
    pool: PgPool,
}

impl MatchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Creating match", skip(self, request), fields(home = %request.home_team, away = %request.away_team))]
    pub async fn create_match(&self, request: &MatchRequest) -> Result<MatchMutation, MatchServiceError> {
        let match_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let (resolution, report) = {
            let store = PgPlayerStore::new(&mut *tx);
            let resolution = resolve_event_set(&store, &request.events).await?;
            let report = StatReconciler::new(&store)
                .reconcile(None, Some(&resolution.events))
                .await
                .inspect_err(|e| log_reconcile_failure(match_id, e))?;
            (resolution, report)
        };

        let record = match_queries::insert_match(&mut *tx, match_id, request, &resolution.events).await?;
        tx.commit().await?;
        info!("Recorded match {}", match_id);

        Ok(MatchMutation {
            record: Some(record),
            unresolved: resolution.unresolved,
            report,
        })
    }

    #[tracing::instrument(name = "Editing match", skip(self, request))]
    pub async fn update_match(
        &self,
        match_id: Uuid,
        request: &MatchRequest,
    ) -> Result<MatchMutation, MatchServiceError> {
        let result = self.replace_and_reconcile(match_id, request).await;
        if let Err(e) = &result {
            self.flag_failed_mutation(match_id, e).await;
        }
        result
    }

    #[tracing::instrument(name = "Deleting match", skip(self))]
    pub async fn delete_match(&self, match_id: Uuid) -> Result<MatchMutation, MatchServiceError> {
        let result = self.remove_and_reverse(match_id).await;
        if let Err(e) = &result {
            self.flag_failed_mutation(match_id, e).await;
        }
        result
    }

    /// Record the winner of a parent vote as the match's parent Man of the Match,
    /// replacing any earlier parent selection.
    #[tracing::instrument(name = "Recording parent MOTM", skip(self, winner), fields(player_id = %winner.player_id))]
    pub async fn record_parent_motm(
        &self,
        match_id: Uuid,
        winner: PlayerRef,
    ) -> Result<ReconcileReport, MatchServiceError> {
        let result = self.swap_parent_motm(match_id, winner).await;
        if let Err(e) = &result {
            self.flag_failed_mutation(match_id, e).await;
        }
        result
    }

    async fn replace_and_reconcile(
        &self,
        match_id: Uuid,
        request: &MatchRequest,
    ) -> Result<MatchMutation, MatchServiceError> {
        let mut tx = self.pool.begin().await?;
        let existing = match_queries::lock_match(&mut *tx, match_id)
            .await?
            .ok_or(MatchServiceError::NotFound(match_id))?;

        let (resolution, report) = {
            let store = PgPlayerStore::new(&mut *tx);
            let resolution = resolve_event_set(&store, &request.events).await?;
            let report = StatReconciler::new(&store)
                .reconcile(Some(&existing.events.0), Some(&resolution.events))
                .await
                .inspect_err(|e| log_reconcile_failure(match_id, e))?;
            (resolution, report)
        };

        let record = match_queries::replace_match(&mut *tx, match_id, request, &resolution.events).await?;
        tx.commit().await?;
        info!("Updated match {}", match_id);

        Ok(MatchMutation {
            record: Some(record),
            unresolved: resolution.unresolved,
            report,
        })
    }

    async fn remove_and_reverse(&self, match_id: Uuid) -> Result<MatchMutation, MatchServiceError> {
        let mut tx = self.pool.begin().await?;
        let existing = match_queries::lock_match(&mut *tx, match_id)
            .await?
            .ok_or(MatchServiceError::NotFound(match_id))?;

        let report = StatReconciler::new(&PgPlayerStore::new(&mut *tx))
            .reconcile(Some(&existing.events.0), None)
            .await
            .inspect_err(|e| log_reconcile_failure(match_id, e))?;

        match_queries::delete_match(&mut *tx, match_id).await?;
        tx.commit().await?;
        info!("Deleted match {}", match_id);

        Ok(MatchMutation {
            record: None,
            unresolved: Vec::new(),
            report,
        })
    }

    async fn swap_parent_motm(&self, match_id: Uuid, winner: PlayerRef) -> Result<ReconcileReport, MatchServiceError> {
        let mut tx = self.pool.begin().await?;
        let existing = match_queries::lock_match(&mut *tx, match_id)
            .await?
            .ok_or(MatchServiceError::NotFound(match_id))?;

        let previous = &existing.events.0;
        let updated = EventSet {
            parent_motm: Some(winner),
            ..previous.clone()
        };

        let report = StatReconciler::new(&PgPlayerStore::new(&mut *tx))
            .reconcile(Some(previous), Some(&updated))
            .await
            .inspect_err(|e| log_reconcile_failure(match_id, e))?;

        match_queries::replace_match_events(&mut *tx, match_id, &updated).await?;
        tx.commit().await?;

        Ok(report)
    }

    /// The transaction is gone by now, so counters still match the stored events.
    /// The flag tells an admin the requested change never landed.
    async fn flag_failed_mutation(&self, match_id: Uuid, e: &MatchServiceError) {
        if let MatchServiceError::NotFound(_) = e {
            return;
        }

        error!(%match_id, "Match change rolled back: {}", e);
        if let Err(flag_error) = match_queries::flag_for_stat_repair(&self.pool, match_id).await {
            error!(%match_id, "Failed to flag match for stat repair: {}", flag_error);
        }
    }
}

fn log_reconcile_failure(match_id: Uuid, e: &ReconcileError) {
    match e {
        ReconcileError::PartialReconciliation { phase, applied, failed, source } => {
            error!(
                %match_id,
                %phase,
                ?applied,
                ?failed,
                "Stat reconciliation failed, rolling back the match change: {}",
                source
            );
        }
    }
}
