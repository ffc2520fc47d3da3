// src/checker/classify.rs
// =============================================================================
// Decides what a fetch outcome means for the crawl.
//
//   200 / 204, internal host, text/html  -> Expandable (mine it for links)
//   200 / 204, anything else             -> Ok
//   any other status                     -> Broken(HttpStatus)
//   transport failure                    -> Broken(Transport)
//
// Pure function, no I/O.
// =============================================================================

use super::http::{is_html_content_type, FetchResponse};
use crate::error::LinkError;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Link works, nothing more to do
    Ok,
    /// Link works and is an internal HTML page: extract its links
    Expandable,
    /// Link is broken
    Broken(LinkError),
}

pub fn classify(outcome: &Result<FetchResponse, LinkError>, base_host: &str) -> Classification {
    let response = match outcome {
        Ok(response) => response,
        Err(error) => return Classification::Broken(error.clone()),
    };

    if !matches!(response.status, 200 | 204) {
        return Classification::Broken(LinkError::HttpStatus {
            code: response.status,
            message: response.status_message.clone(),
        });
    }

    // Hostname only, the same rule the frontier uses for external links
    let internal = Url::parse(&response.final_url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.eq_ignore_ascii_case(base_host)))
        .unwrap_or(false);
    let html = response
        .content_type
        .as_deref()
        .map(is_html_content_type)
        .unwrap_or(false);

    if internal && html {
        Classification::Expandable
    } else {
        Classification::Ok
    }
}
