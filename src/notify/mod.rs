// src/notify/mod.rs
// =============================================================================
// Out-of-band alerts about broken links.
//
// The broken link registry calls notify() once per distinct broken URL whose
// status is not on the suppression list. A notifier must never hold up the
// crawl: notify() only starts the delivery, flush() waits for deliveries
// that are still running when the crawl is over.
//
// Submodules:
// - webhook: posts a chat-style JSON message to a configured endpoint
// =============================================================================

mod webhook;

pub use webhook::WebhookNotifier;

use async_trait::async_trait;

// What a notifier is told about a broken link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLinkEvent {
    pub request_url: String,
    pub reference_url: Option<String>,
    pub status_code: Option<String>,
}

impl BrokenLinkEvent {
    // Human-readable one-paragraph description, used as the message text
    pub fn message(&self) -> String {
        format!(
            "Broken link detected: {} (status: {}) found on {}",
            self.request_url,
            self.status_code.as_deref().unwrap_or("no response"),
            self.reference_url.as_deref().unwrap_or("the start page"),
        )
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    // Starts delivering an alert. Must return without waiting for delivery.
    fn notify(&self, event: BrokenLinkEvent);

    // Waits (bounded) for deliveries still in flight
    async fn flush(&self);
}
