// src/crawl/registry.rs
// =============================================================================
// Keeps the list of confirmed broken links.
//
// record() does three things, in this order, and only the first time a URL
// is recorded:
// 1. Stores the broken link
// 2. Tells the reporter (console / JSON output)
// 3. Tells the notifier, unless the status is a known false positive
//
// Some sites answer automated requests with 302, 403 or 999 even though the
// page is fine. Those still show up in the report, they just do not page
// anybody.
// =============================================================================

use crate::error::LinkError;
use crate::notify::{BrokenLinkEvent, Notifier};
use crate::report::Reporter;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

// Statuses that do not trigger a notification unless configured otherwise
pub const DEFAULT_SUPPRESSED_STATUSES: [u16; 3] = [302, 403, 999];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub request_url: String,
    pub reference_url: Option<String>,
    pub status_code: Option<String>,
    pub status_message: String,
}

impl BrokenLink {
    pub fn from_error(
        request_url: impl Into<String>,
        reference_url: Option<String>,
        error: &LinkError,
    ) -> Self {
        Self {
            request_url: request_url.into(),
            reference_url,
            status_code: error.status_code(),
            status_message: error.status_message(),
        }
    }

    fn http_status(&self) -> Option<u16> {
        self.status_code.as_deref().and_then(|code| code.parse().ok())
    }
}

pub struct BrokenLinkRegistry {
    links: Vec<BrokenLink>,
    seen: HashSet<String>,
    suppressed: HashSet<u16>,
    reporter: Arc<dyn Reporter>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl BrokenLinkRegistry {
    pub fn new(
        suppressed: impl IntoIterator<Item = u16>,
        reporter: Arc<dyn Reporter>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            links: Vec::new(),
            seen: HashSet::new(),
            suppressed: suppressed.into_iter().collect(),
            reporter,
            notifier,
        }
    }

    // Records a broken link. Returns false (and does nothing) if this URL is
    // already registered, whatever page it was found on this time.
    pub fn record(&mut self, link: BrokenLink) -> bool {
        if !self.seen.insert(link.request_url.clone()) {
            return false;
        }

        warn!(
            url = %link.request_url,
            referrer = link.reference_url.as_deref().unwrap_or(""),
            status = link.status_code.as_deref().unwrap_or(""),
            message = %link.status_message,
            "broken link"
        );
        self.reporter.broken_link(&link);

        if let Some(notifier) = &self.notifier {
            if !self.is_suppressed(&link) {
                notifier.notify(BrokenLinkEvent {
                    request_url: link.request_url.clone(),
                    reference_url: link.reference_url.clone(),
                    status_code: link.status_code.clone(),
                });
            }
        }

        self.links.push(link);
        true
    }

    // Broken links in the order they were found
    pub fn links(&self) -> &[BrokenLink] {
        &self.links
    }

    pub fn notifier(&self) -> Option<&Arc<dyn Notifier>> {
        self.notifier.as_ref()
    }

    fn is_suppressed(&self, link: &BrokenLink) -> bool {
        link.http_status()
            .map(|status| self.suppressed.contains(&status))
            .unwrap_or(false)
    }
}
