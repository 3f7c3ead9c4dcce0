//! Player aggregate statistics kept consistent with the recorded matches.
//!
//! Match events are resolved to stable player ids once, when they are entered
//! ([`resolve_event_set`]). Every later create, edit or delete of a match goes
//! through [`StatReconciler::reconcile`], which reverses the stored contribution
//! of the match before applying the new one.

pub mod delta;
pub mod event_set;
pub mod memory_store;
pub mod reconciler;
pub mod store;

pub use delta::{CounterDelta, StatDelta};
pub use event_set::{
    normalize_full_name, resolve_event_set, CardInput, EventSet, EventSetInput, PlayerRef,
    PlayerSelector, Resolution, Scorer, ScorerInput,
};
pub use memory_store::InMemoryPlayerStore;
pub use reconciler::{Phase, ReconcileError, ReconcileReport, StatReconciler};
pub use store::{PlayerCounters, PlayerLookup, PlayerStatStore, StoreError};
