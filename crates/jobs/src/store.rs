//! Timetable persistence.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;
use types::{ScheduleOutcome, Timetable, TimetableId, TimetableStatus};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("timetable {0} not found")]
    NotFound(TimetableId),
    #[error("timetable {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: TimetableId,
        from: TimetableStatus,
        to: TimetableStatus,
    },
}

pub trait TimetableStore: Send + Sync + 'static {
    /// Persists a finished run as a draft and assigns its durable id.
    fn save(&self, outcome: &ScheduleOutcome) -> Timetable;
    fn get(&self, id: &TimetableId) -> Option<Timetable>;
    /// Draft -> approved -> published; anything else is rejected.
    fn transition(&self, id: &TimetableId, to: TimetableStatus) -> Result<Timetable, StoreError>;
}

#[derive(Default)]
pub struct InMemStore {
    inner: RwLock<HashMap<TimetableId, Timetable>>,
}

impl InMemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn allowed(from: TimetableStatus, to: TimetableStatus) -> bool {
    matches!(
        (from, to),
        (TimetableStatus::Draft, TimetableStatus::Approved)
            | (TimetableStatus::Approved, TimetableStatus::Published)
    )
}

impl TimetableStore for InMemStore {
    fn save(&self, outcome: &ScheduleOutcome) -> Timetable {
        let id = TimetableId(Uuid::new_v4().to_string());
        let tt = Timetable::from_outcome(id.clone(), outcome, Utc::now());
        self.inner.write().insert(id, tt.clone());
        tt
    }

    fn get(&self, id: &TimetableId) -> Option<Timetable> {
        self.inner.read().get(id).cloned()
    }

    fn transition(&self, id: &TimetableId, to: TimetableStatus) -> Result<Timetable, StoreError> {
        let mut w = self.inner.write();
        let tt = w.get_mut(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if !allowed(tt.status, to) {
            return Err(StoreError::InvalidTransition {
                id: id.clone(),
                from: tt.status,
                to,
            });
        }
        tt.status = to;
        Ok(tt.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Metrics, RunStats, TerminationState};

    fn outcome() -> ScheduleOutcome {
        ScheduleOutcome {
            department: "CS".into(),
            semester: 1,
            program: None,
            placements: vec![],
            violations: vec![],
            metrics: Metrics::default(),
            fitness: 0.5,
            generations: 3,
            termination: TerminationState::Exhausted,
            stats: RunStats::default(),
        }
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        let store = InMemStore::new();
        let tt = store.save(&outcome());
        assert_eq!(tt.status, TimetableStatus::Draft);

        let err = store.transition(&tt.id, TimetableStatus::Published).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));

        store.transition(&tt.id, TimetableStatus::Approved).unwrap();
        let published = store.transition(&tt.id, TimetableStatus::Published).unwrap();
        assert_eq!(published.status, TimetableStatus::Published);
        assert_eq!(store.get(&tt.id).unwrap().status, TimetableStatus::Published);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = InMemStore::new();
        let id = TimetableId::from("nope");
        assert_eq!(
            store.transition(&id, TimetableStatus::Approved).unwrap_err(),
            StoreError::NotFound(id)
        );
    }
}
