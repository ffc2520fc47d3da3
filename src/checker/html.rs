// src/checker/html.rs
// =============================================================================
// This module extracts candidate links from an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Resolve relative links against the page URL (or its <base href>)
// - Drop fragments, so /docs#intro and /docs are the same page
//
// Output is a list of absolute http(s) URLs, deduplicated within the page,
// in the order they first appear.
//
// Rust concepts:
// - Iterators: For processing collections
// - Option chaining: and_then / map to skip anything unusable
// =============================================================================

use crate::crawl::is_blacklisted;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all checkable links from a page
//
// Parameters:
//   body: raw page bytes (decoded as UTF-8, invalid bytes replaced)
//   page_url: the URL the page was served from (for resolving relative links)
//   include_images: also return <img src> targets
//
// Returns: Vec<String> of absolute URLs, no duplicates
//
// Example:
//   body = "<a href='/docs'>Docs</a><a href='/docs#top'>Top</a>"
//   page_url = "https://example.com/"
//   result = ["https://example.com/docs"]
pub fn extract_links(body: &[u8], page_url: &Url, include_images: bool) -> Vec<String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    // The selectors are constants, so parsing them cannot fail
    let anchors = Selector::parse("a[href]").expect("valid anchor selector");
    let images = Selector::parse("img[src]").expect("valid image selector");

    let base = document_base(&document, page_url);

    let hrefs = document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"));

    let mut raw: Vec<&str> = hrefs.collect();
    if include_images {
        raw.extend(
            document
                .select(&images)
                .filter_map(|element| element.value().attr("src")),
        );
    }

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in raw {
        if let Some(absolute) = resolve_url(&base, href) {
            if seen.insert(absolute.clone()) {
                links.push(absolute);
            }
        }
    }

    links
}

// The URL relative links are resolved against: the first <base href> if
// the document has a usable one, otherwise the page URL itself
fn document_base(document: &Html, page_url: &Url) -> Url {
    let selector = Selector::parse("base[href]").expect("valid base selector");

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

// Resolves a possibly-relative href to an absolute URL
//
// Returns None for blacklisted schemes (mailto:, javascript:, bare #...),
// unparseable hrefs and anything that is not http/https after resolution.
//
// Examples:
//   base = "https://example.com/page/"
//   href = "/docs"        -> Some("https://example.com/docs")
//   href = "../other"     -> Some("https://example.com/other")
//   href = "#section"     -> None
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || is_blacklisted(href) {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url.to_string())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why from_utf8_lossy?
//    - Pages are not always valid UTF-8 (legacy encodings, broken bytes)
//    - A few replaced characters never change what an href points to
//    - Failing the whole page would hide every link on it
//
// 2. Why Url::join for absolute hrefs too?
//    - join() on an absolute href simply returns that href, parsed
//    - One code path handles both relative and absolute links
//
// 3. Why dedup here as well as in the frontier?
//    - A page often links the same target from a header, a footer and the
//      body; collapsing them here keeps the frontier's work small
// -----------------------------------------------------------------------------
