// src/crawl/driver.rs
// =============================================================================
// The crawl loop.
//
// One cycle per link, strictly one fetch at a time:
//
//   IDLE        take the next link from the frontier (none left -> DONE)
//   FETCHING    GET it through the Fetcher
//   CLASSIFYING ok / expandable / broken
//   EXPANDING   internal HTML page: extract links, offer each to the frontier
//   RECORDING   mark visited, register it if broken, back to IDLE
//   DONE        report totals
//
// The loop keeps going while the frontier holds at least one link, so the
// last queued link is always checked.
//
// Rust concepts:
// - Generics: the driver works with any Fetcher (real HTTP or a test fake)
// - while let: loop until the frontier hands back None
// - Arc<dyn Trait>: shared reporter / notifier objects
// =============================================================================

use super::frontier::{CrawlTarget, Frontier, FrontierPolicy};
use super::registry::{BrokenLink, BrokenLinkRegistry};
use crate::checker::{classify, extract_links, Classification, FetchResponse, Fetcher};
use crate::config::CrawlConfig;
use crate::notify::Notifier;
use crate::report::Reporter;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

// Final numbers for one run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    /// Distinct links processed (visited plus anything still queued)
    pub links_checked: usize,
    /// Wall-clock time since the process started
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    /// Broken links, in the order they were found
    pub broken_links: Vec<BrokenLink>,
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

// All mutable crawl state for one run, in one place
pub struct CrawlSession {
    pub base_url: Url,
    pub base_host: String,
    pub frontier: Frontier,
    pub broken: BrokenLinkRegistry,
}

impl CrawlSession {
    // Builds the session and queues the base URL as the first link
    pub fn new(
        config: &CrawlConfig,
        reporter: Arc<dyn Reporter>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let mut frontier = Frontier::new(FrontierPolicy {
            base_host: config.base_host.clone(),
            ignore_external: config.ignore_external,
            ignored_query_params: config.ignored_query_params.clone(),
        });
        frontier.seed(CrawlTarget::new(config.base_url.as_str(), None));

        let broken = BrokenLinkRegistry::new(
            config.suppressed_statuses.iter().copied(),
            reporter,
            notifier,
        );

        Self {
            base_url: config.base_url.clone(),
            base_host: config.base_host.clone(),
            frontier,
            broken,
        }
    }
}

pub struct CrawlDriver<F: Fetcher> {
    session: CrawlSession,
    fetcher: F,
    reporter: Arc<dyn Reporter>,
    include_images: bool,
}

impl<F: Fetcher> CrawlDriver<F> {
    pub fn new(
        session: CrawlSession,
        fetcher: F,
        reporter: Arc<dyn Reporter>,
        include_images: bool,
    ) -> Self {
        Self {
            session,
            fetcher,
            reporter,
            include_images,
        }
    }

    // Crawls until the frontier is empty.
    // `started` is when the process started; the summary's elapsed time
    // is measured from there.
    pub async fn run(mut self, started: Instant) -> CrawlSummary {
        info!(base = %self.session.base_url, "crawl started");

        while let Some(target) = self.session.frontier.next() {
            self.process(target).await;
        }

        // Give webhook deliveries a chance to finish before we report
        if let Some(notifier) = self.session.broken.notifier() {
            notifier.flush().await;
        }

        let summary = CrawlSummary {
            links_checked: self.session.frontier.known_count(),
            elapsed: started.elapsed(),
            broken_links: self.session.broken.links().to_vec(),
        };

        info!(
            links = summary.links_checked,
            visited = self.session.frontier.visited_count(),
            broken = summary.broken_links.len(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "crawl finished"
        );
        self.reporter.finished(&summary);

        summary
    }

    // One full fetch / classify / expand / record cycle
    async fn process(&mut self, target: CrawlTarget) {
        let outcome = self.fetcher.fetch(&target.request_url).await;
        let classification = classify(&outcome, &self.session.base_host);

        if let (Classification::Expandable, Ok(response)) = (&classification, &outcome) {
            self.expand(&target, response);
        }

        self.session.frontier.mark_visited(&target.request_url);
        let elapsed = outcome.as_ref().ok().map(|response| response.elapsed);
        self.reporter.link_checked(&target, &classification, elapsed);

        if let Classification::Broken(error) = &classification {
            self.session.broken.record(BrokenLink::from_error(
                target.request_url.clone(),
                target.reference_url.clone(),
                error,
            ));
        }
    }

    // Offers every link found on an internal HTML page to the frontier
    fn expand(&mut self, target: &CrawlTarget, response: &FetchResponse) {
        // Resolve against where we actually ended up after redirects
        let page_url = match Url::parse(&response.final_url)
            .or_else(|_| Url::parse(&target.request_url))
        {
            Ok(url) => url,
            Err(_) => return,
        };

        let links = extract_links(&response.body, &page_url, self.include_images);
        let found = links.len();

        let mut accepted = 0;
        for link in links {
            let candidate = CrawlTarget::new(link, Some(target.request_url.clone()));
            if self.session.frontier.offer(candidate) {
                accepted += 1;
            }
        }

        debug!(
            page = %target.request_url,
            found,
            accepted,
            pending = self.session.frontier.pending(),
            "expanded page"
        );
    }
}
