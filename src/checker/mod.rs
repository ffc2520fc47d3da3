// src/checker/mod.rs
// =============================================================================
// This module contains the per-link logic of the crawler.
//
// Submodules:
// - http: Fetches a URL (the Fetcher trait and its reqwest implementation)
// - classify: Decides whether a fetch outcome is ok, broken, or a page to mine
// - html: Extracts candidate links from HTML pages
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::classify()` instead of
// `checker::classify::classify()`.
// =============================================================================

mod classify;
mod html;
mod http;

pub use classify::{classify, Classification};
pub use html::extract_links;
pub use http::{FetchResponse, Fetcher, HttpFetcher, USER_AGENT};
