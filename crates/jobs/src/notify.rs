//! Fire-and-forget notifications about timetable lifecycle events.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use types::TimetableId;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Generated {
        #[serde(rename = "timetableId")]
        timetable_id: TimetableId,
    },
    Approved {
        #[serde(rename = "timetableId")]
        timetable_id: TimetableId,
    },
    Published {
        #[serde(rename = "timetableId")]
        timetable_id: TimetableId,
    },
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, event: &Event) -> anyhow::Result<()>;
}

/// Sends `event` on a background task. Failures are logged and never reach
/// the caller.
pub fn dispatch(notifier: Arc<dyn Notifier>, event: Event) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&event).await {
            warn!(error = %e, ?event, "notification failed");
        }
    });
}

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &Event) -> anyhow::Result<()> {
        info!(?event, "timetable event");
        Ok(())
    }
}

/// POSTs each event as JSON to a fixed URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &Event) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .json(event)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let e = Event::Approved {
            timetable_id: TimetableId::from("t1"),
        };
        assert_eq!(
            serde_json::to_value(&e).unwrap(),
            serde_json::json!({"event": "approved", "timetableId": "t1"})
        );
    }

    #[tokio::test]
    async fn webhook_failure_is_an_error_not_a_panic() {
        let n = WebhookNotifier::new("http://127.0.0.1:9/unreachable");
        let e = Event::Generated {
            timetable_id: TimetableId::from("t1"),
        };
        assert!(n.notify(&e).await.is_err());
    }
}
