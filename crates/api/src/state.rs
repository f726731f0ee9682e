use std::sync::Arc;

use jobs::notify::{LogNotifier, Notifier, WebhookNotifier};
use jobs::store::InMemStore;
use jobs::InMemJobs;
use solver_ga::GaSolver;
use tracing::info;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<InMemJobs<GaSolver>>,
}

impl AppState {
    pub fn from_config(cfg: &ServerConfig) -> Self {
        let notifier: Arc<dyn Notifier> = match &cfg.webhook_url {
            Some(url) => {
                info!(%url, "notifications go to webhook");
                Arc::new(WebhookNotifier::new(url.clone()))
            }
            None => Arc::new(LogNotifier),
        };
        let jobs = InMemJobs::new(GaSolver::new(), Arc::new(InMemStore::new()), notifier);
        Self { jobs: Arc::new(jobs) }
    }
}
