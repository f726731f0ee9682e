pub mod notify;
pub mod store;

use parking_lot::RwLock;
use sched_core::{GenerateRequest, Solver};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use types::{Timetable, TimetableId, TimetableStatus};
use utoipa::ToSchema;
use uuid::Uuid;

use notify::{dispatch, Event, Notifier};
use store::{StoreError, TimetableStore};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status")]
pub enum JobStatus {
    Queued,
    Running,
    Solved { result: Timetable },
    Failed { message: String },
}

/// Runs generation requests in the background, persists each finished
/// timetable and announces it.
#[derive(Clone)]
pub struct InMemJobs<S: Solver> {
    inner: Arc<RwLock<HashMap<String, JobStatus>>>,
    solver: Arc<S>,
    store: Arc<dyn TimetableStore>,
    notifier: Arc<dyn Notifier>,
}

impl<S: Solver> InMemJobs<S> {
    pub fn new(solver: S, store: Arc<dyn TimetableStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Default::default(),
            solver: Arc::new(solver),
            store,
            notifier,
        }
    }

    pub fn enqueue(&self, req: GenerateRequest) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().insert(id.clone(), JobStatus::Queued);

        let map = self.inner.clone();
        let solver = self.solver.clone();
        let store = self.store.clone();
        let notifier = self.notifier.clone();
        let id_for_task = id.clone();

        tokio::spawn(async move {
            {
                let mut w = map.write();
                w.insert(id_for_task.clone(), JobStatus::Running);
            }
            match solver.solve(req).await {
                Ok(outcome) => {
                    let tt = store.save(&outcome);
                    info!(job = %id_for_task, timetable = %tt.id, fitness = tt.fitness, "job solved");
                    let event = Event::Generated {
                        timetable_id: tt.id.clone(),
                    };
                    map.write()
                        .insert(id_for_task, JobStatus::Solved { result: tt });
                    dispatch(notifier, event);
                }
                Err(e) => {
                    error!(?e, "job failed");
                    map.write().insert(
                        id_for_task,
                        JobStatus::Failed {
                            message: e.to_string(),
                        },
                    );
                }
            }
        });

        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.inner.read().get(id).cloned()
    }

    pub fn timetable(&self, id: &TimetableId) -> Option<Timetable> {
        self.store.get(id)
    }

    pub fn approve(&self, id: &TimetableId) -> Result<Timetable, StoreError> {
        let tt = self.store.transition(id, TimetableStatus::Approved)?;
        dispatch(
            self.notifier.clone(),
            Event::Approved {
                timetable_id: tt.id.clone(),
            },
        );
        Ok(tt)
    }

    pub fn publish(&self, id: &TimetableId) -> Result<Timetable, StoreError> {
        let tt = self.store.transition(id, TimetableStatus::Published)?;
        dispatch(
            self.notifier.clone(),
            Event::Published {
                timetable_id: tt.id.clone(),
            },
        );
        Ok(tt)
    }
}
