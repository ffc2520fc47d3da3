// src/crawl/frontier.rs
// =============================================================================
// The frontier: every link we have discovered but not fetched yet.
//
// How it works:
// 1. offer() runs a candidate link through the filters below
// 2. Accepted links go to the back of a FIFO queue (breadth-first order:
//    links found on early pages are checked before links found later)
// 3. next() hands the driver the link at the front of the queue
// 4. mark_visited() records that a link's fetch cycle is over
//
// Filters, in order (first rejection wins):
// 1. Scheme blacklist (mailto:, javascript:, ... and bare #fragments)
// 2. External links, when the run ignores them
// 3. Ignored query parameters, when present with a non-empty value
// 4. Already known: queued, being fetched right now, or visited
//
// A URL is accepted at most once per run. The referrer kept for it is the
// page that offered it first.
//
// Rust concepts:
// - VecDeque: Double-ended queue, perfect for breadth-first search
// - HashSet: O(1) membership checks for dedup
// =============================================================================

use std::collections::{HashSet, VecDeque};
use url::Url;

// Prefixes we never fetch. Compared case-insensitively.
pub const BLACKLISTED_PREFIXES: [&str; 8] = [
    "javascript:",
    "mailto:",
    "telnet:",
    "file:",
    "news:",
    "tel:",
    "ftp:",
    "#",
];

// True if a raw href or URL starts with a blacklisted scheme or is a bare
// in-page fragment
pub fn is_blacklisted(link: &str) -> bool {
    let link = link.trim_start();
    BLACKLISTED_PREFIXES.iter().any(|prefix| {
        link.len() >= prefix.len()
            && link.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    })
}

// One link waiting to be checked, plus where we found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Absolute URL to fetch. This is the link's identity.
    pub request_url: String,
    /// Page the link was found on. None for the base URL.
    pub reference_url: Option<String>,
}

impl CrawlTarget {
    pub fn new(request_url: impl Into<String>, reference_url: Option<String>) -> Self {
        Self {
            request_url: request_url.into(),
            reference_url,
        }
    }
}

// Which links the frontier lets in
#[derive(Debug, Clone, Default)]
pub struct FrontierPolicy {
    /// Host of the base URL. Links on other hosts are "external".
    pub base_host: String,
    /// Drop external links entirely (they are never fetched)
    pub ignore_external: bool,
    /// Query parameter names that get a URL rejected when set
    pub ignored_query_params: Vec<String>,
}

#[derive(Debug)]
pub struct Frontier {
    policy: FrontierPolicy,
    queue: VecDeque<CrawlTarget>,
    // Every URL ever accepted: queued, in flight, or visited
    known: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new(policy: FrontierPolicy) -> Self {
        Self {
            policy,
            queue: VecDeque::new(),
            known: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    // Queues the starting point of the crawl.
    // Only the dedup rule applies: the base URL is always checked.
    pub fn seed(&mut self, target: CrawlTarget) -> bool {
        if !self.known.insert(target.request_url.clone()) {
            return false;
        }
        self.queue.push_back(target);
        true
    }

    // Offers a discovered link. Returns true if it was queued.
    pub fn offer(&mut self, target: CrawlTarget) -> bool {
        if is_blacklisted(&target.request_url) {
            return false;
        }

        // Anything we cannot parse, we cannot fetch either
        let Ok(url) = Url::parse(&target.request_url) else {
            return false;
        };

        if self.policy.ignore_external && !self.is_internal(&url) {
            return false;
        }

        if self.has_ignored_query(&url) {
            return false;
        }

        if !self.known.insert(target.request_url.clone()) {
            return false;
        }

        self.queue.push_back(target);
        true
    }

    // Removes and returns the oldest queued link
    pub fn next(&mut self) -> Option<CrawlTarget> {
        self.queue.pop_front()
    }

    // Records that a URL has been fetched (successfully or not).
    // Calling it twice is harmless.
    pub fn mark_visited(&mut self, url: &str) {
        if !self.visited.contains(url) {
            self.visited.insert(url.to_string());
            self.known.insert(url.to_string());
        }
    }

    // Links still waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    // Number of distinct links seen this run (queued or visited)
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    // Same hostname as the base URL. Scheme and port are not compared, so
    // http://example.com:8080/ is internal to https://example.com/.
    fn is_internal(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| host.eq_ignore_ascii_case(&self.policy.base_host))
            .unwrap_or(false)
    }

    fn has_ignored_query(&self, url: &Url) -> bool {
        if self.policy.ignored_query_params.is_empty() {
            return false;
        }
        url.query_pairs().any(|(name, value)| {
            !value.is_empty()
                && self
                    .policy
                    .ignored_query_params
                    .iter()
                    .any(|ignored| ignored.as_str() == &*name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier() -> Frontier {
        Frontier::new(FrontierPolicy {
            base_host: "example.com".to_string(),
            ..FrontierPolicy::default()
        })
    }

    fn target(url: &str, from: &str) -> CrawlTarget {
        CrawlTarget::new(url, Some(from.to_string()))
    }

    #[test]
    fn test_blacklist_prefixes() {
        assert!(is_blacklisted("mailto:test@example.com"));
        assert!(is_blacklisted("JavaScript:void(0)"));
        assert!(is_blacklisted("  tel:+123"));
        assert!(is_blacklisted("#section"));
        assert!(is_blacklisted("ftp://files.example.com"));
        assert!(!is_blacklisted("https://example.com/#section"));
        assert!(!is_blacklisted("/telephones"));
        assert!(!is_blacklisted("news"));
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = frontier();
        frontier.offer(target("https://example.com/a", "https://example.com/"));
        frontier.offer(target("https://example.com/b", "https://example.com/"));
        frontier.offer(target("https://example.com/c", "https://example.com/a"));

        let order: Vec<String> = std::iter::from_fn(|| frontier.next())
            .map(|t| t.request_url)
            .collect();
        assert_eq!(
            order,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c"
            ]
        );
    }

    #[test]
    fn test_dedup_keeps_first_referrer() {
        let mut frontier = frontier();
        assert!(frontier.offer(target("https://example.com/a", "https://example.com/first")));
        assert!(!frontier.offer(target("https://example.com/a", "https://example.com/second")));
        assert!(!frontier.offer(target("https://example.com/a", "https://example.com/first")));

        assert_eq!(frontier.pending(), 1);
        let queued = frontier.next().unwrap();
        assert_eq!(
            queued.reference_url.as_deref(),
            Some("https://example.com/first")
        );
        assert!(frontier.next().is_none());
    }

    #[test]
    fn test_visited_links_are_rejected() {
        let mut frontier = frontier();
        frontier.offer(target("https://example.com/a", "https://example.com/"));
        let current = frontier.next().unwrap();

        // While the link is in flight it must not be re-queued (self links)
        assert!(!frontier.offer(target("https://example.com/a", "https://example.com/a")));

        frontier.mark_visited(&current.request_url);
        assert_eq!(frontier.visited_count(), 1);
        assert!(!frontier.offer(target("https://example.com/a", "https://example.com/b")));
        assert_eq!(frontier.pending(), 0);
    }

    #[test]
    fn test_mark_visited_is_idempotent() {
        let mut frontier = frontier();
        frontier.mark_visited("https://example.com/");
        frontier.mark_visited("https://example.com/");
        assert_eq!(frontier.visited_count(), 1);
        assert_eq!(frontier.known_count(), 1);
    }

    #[test]
    fn test_blacklisted_link_is_rejected() {
        let mut frontier = frontier();
        assert!(!frontier.offer(target("mailto:a@example.com", "https://example.com/")));
        assert!(!frontier.offer(target("javascript:alert(1)", "https://example.com/")));
        assert_eq!(frontier.pending(), 0);
    }

    #[test]
    fn test_external_links_kept_by_default() {
        let mut frontier = frontier();
        assert!(frontier.offer(target("https://external.com/", "https://example.com/")));
    }

    #[test]
    fn test_external_links_dropped_when_ignored() {
        let mut frontier = Frontier::new(FrontierPolicy {
            base_host: "example.com".to_string(),
            ignore_external: true,
            ignored_query_params: Vec::new(),
        });
        assert!(!frontier.offer(target("https://external.com/", "https://example.com/")));
        assert!(frontier.offer(target("https://example.com/a", "https://example.com/")));
        assert_eq!(frontier.pending(), 1);
    }

    #[test]
    fn test_internal_means_same_hostname() {
        let mut frontier = Frontier::new(FrontierPolicy {
            base_host: "localhost".to_string(),
            ignore_external: true,
            ignored_query_params: Vec::new(),
        });
        // Another port or scheme on the same host is still internal
        assert!(frontier.offer(target("http://localhost:9000/a", "http://localhost:8080/")));
        assert!(frontier.offer(target("https://LOCALHOST/b", "http://localhost:8080/")));
        // A subdomain is not
        assert!(!frontier.offer(target("http://api.localhost:8080/", "http://localhost:8080/")));
        assert_eq!(frontier.pending(), 2);
    }

    #[test]
    fn test_ignored_query_params() {
        let mut frontier = Frontier::new(FrontierPolicy {
            base_host: "example.com".to_string(),
            ignore_external: false,
            ignored_query_params: vec!["utm_source".to_string()],
        });
        assert!(!frontier.offer(target("https://example.com/x?utm_source=foo", "https://example.com/")));
        // Present but empty is allowed through
        assert!(frontier.offer(target("https://example.com/x?utm_source=", "https://example.com/")));
        assert!(frontier.offer(target("https://example.com/x?page=2", "https://example.com/")));
        assert_eq!(frontier.pending(), 2);
    }

    #[test]
    fn test_unparseable_link_is_rejected() {
        let mut frontier = frontier();
        assert!(!frontier.offer(target("not a url", "https://example.com/")));
    }

    #[test]
    fn test_seed_skips_filters_but_not_dedup() {
        let mut frontier = Frontier::new(FrontierPolicy {
            base_host: "example.com".to_string(),
            ignore_external: true,
            ignored_query_params: vec!["ref".to_string()],
        });
        assert!(frontier.seed(CrawlTarget::new("https://example.com/?ref=home", None)));
        assert!(!frontier.seed(CrawlTarget::new("https://example.com/?ref=home", None)));
        assert_eq!(frontier.known_count(), 1);
    }
}
