// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from the base URL
// - Every link is fetched exactly once per run
// - Only internal HTML pages are mined for more links
// - Broken links are collected (once per URL) and optionally announced
//
// Submodules:
// - frontier: queue of discovered links + visited set + link filters
// - registry: confirmed broken links, reporting and notification
// - driver:   the fetch / classify / expand / record loop
// =============================================================================

mod driver;
mod frontier;
mod registry;

pub use driver::{CrawlDriver, CrawlSession, CrawlSummary};
pub use frontier::{is_blacklisted, CrawlTarget};
pub use registry::{BrokenLink, DEFAULT_SUPPRESSED_STATUSES};
