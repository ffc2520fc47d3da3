// src/checker/http.rs
// =============================================================================
// This module fetches URLs over HTTP.
//
// Key functionality:
// - Makes one GET request per URL (no retries: a failure is a broken link)
// - Applies the per-request timeout and an identifying User-Agent
// - Only downloads the body for HTML pages (nothing else is ever mined)
// - Turns transport failures into a LinkError with a stable error code
//
// The crawl driver only talks to the Fetcher trait, so tests can swap in an
// in-memory fetcher instead of the network.
//
// Rust concepts:
// - async/await: For network I/O
// - Traits: The Fetcher seam between the crawler and the network
// - async-trait: Lets a trait declare async methods
// =============================================================================

use crate::error::LinkError;
use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as _;
use std::time::{Duration, Instant};
use tracing::debug;

// The header value every request carries, so site owners can recognise us
pub const USER_AGENT: &str = concat!("link-patrol/", env!("CARGO_PKG_VERSION"));

// A response that made it back to us at the transport level.
// The status may still be an error status; classifying it is not our job.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL after any redirects were followed
    pub final_url: String,
    /// HTTP status code (200, 404, ...)
    pub status: u16,
    /// Reason phrase ("OK", "Not Found", ...)
    pub status_message: String,
    /// Value of the Content-Type header, if any
    pub content_type: Option<String>,
    /// Body bytes. Empty unless the response is HTML.
    pub body: Vec<u8>,
    /// How long the request took
    pub elapsed: Duration,
}

// Anything that can fetch a URL.
//
// Implementations must honour their own timeout and return
// LinkError::Transport instead of hanging.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, LinkError>;
}

// The real fetcher, backed by a reqwest client
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    // Builds the shared HTTP client.
    // Fails only if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, LinkError> {
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Skip the download for anything we will never parse
        let is_html = content_type
            .as_deref()
            .map(is_html_content_type)
            .unwrap_or(false);
        let body = if is_html {
            response
                .bytes()
                .await
                .map_err(categorize_error)?
                .to_vec()
        } else {
            Vec::new()
        };

        let elapsed = started.elapsed();
        debug!(url, status = status.as_u16(), ?elapsed, "fetched");

        Ok(FetchResponse {
            final_url,
            status: status.as_u16(),
            status_message: status.canonical_reason().unwrap_or("").to_string(),
            content_type,
            body,
            elapsed,
        })
    }
}

// True if a Content-Type header value announces an HTML document
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("text/html")
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - etc.
//
// The top-level reqwest message is vague ("error sending request"), the
// useful detail lives further down the source chain, so we flatten it.
fn categorize_error(error: reqwest::Error) -> LinkError {
    let message = error_chain(&error);
    let lower = message.to_lowercase();

    let code = if error.is_timeout() {
        Some("TIMEOUT")
    } else if error.is_redirect() {
        Some("TOO_MANY_REDIRECTS")
    } else if error.is_body() || error.is_decode() {
        Some("BODY_ERROR")
    } else {
        code_from_message(&lower)
    };

    LinkError::Transport {
        code: code.map(str::to_string),
        message,
    }
}

// Recognises connection-level failures from their text
fn code_from_message(lower: &str) -> Option<&'static str> {
    if lower.contains("dns") || lower.contains("failed to lookup") || lower.contains("resolve") {
        Some("DNS_ERROR")
    } else if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
        Some("TLS_ERROR")
    } else if lower.contains("refused") {
        Some("CONNECTION_REFUSED")
    } else if lower.contains("reset") {
        Some("CONNECTION_RESET")
    } else if lower.contains("timed out") {
        Some("TIMEOUT")
    } else {
        None
    }
}

// Joins an error and all its sources into one line
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
