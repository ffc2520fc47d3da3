// src/notify/webhook.rs
// =============================================================================
// Sends broken-link alerts to a chat webhook.
//
// Each alert is one POST with a JSON body:
//   {"content": "Broken link detected: ..."}
//
// Delivery runs on its own tokio task so the crawl never waits for it.
// Failures are logged and otherwise ignored: a dead webhook must not turn
// into a failed crawl.
// =============================================================================

use super::{BrokenLinkEvent, Notifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

// How long flush() waits for outstanding deliveries
const FLUSH_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct WebhookPayload {
    content: String,
}

pub struct WebhookNotifier {
    client: Client,
    endpoint: Url,
    deliveries: Mutex<Vec<JoinHandle<()>>>,
}

impl WebhookNotifier {
    pub fn new(endpoint: Url, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(crate::checker::USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            deliveries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn notify(&self, event: BrokenLinkEvent) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let payload = WebhookPayload {
            content: event.message(),
        };

        let handle = tokio::spawn(async move {
            // .json() sets Content-Type: application/json
            let result = client.post(endpoint).json(&payload).send().await;
            match result.and_then(|response| response.error_for_status()) {
                Ok(_) => debug!(url = %event.request_url, "webhook notified"),
                Err(e) => warn!(url = %event.request_url, error = %e, "webhook delivery failed"),
            }
        });

        // A poisoned lock only means another delivery panicked; keep going
        let mut deliveries = match self.deliveries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        deliveries.retain(|handle| !handle.is_finished());
        deliveries.push(handle);
    }

    async fn flush(&self) {
        let pending: Vec<JoinHandle<()>> = {
            let mut deliveries = match self.deliveries.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            deliveries.drain(..).collect()
        };

        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        if tokio::time::timeout(FLUSH_GRACE, futures::future::join_all(pending))
            .await
            .is_err()
        {
            warn!(count, "gave up waiting for webhook deliveries");
        }
    }
}
