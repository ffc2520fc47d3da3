// src/error.rs
// =============================================================================
// Error types used across the crawler.
//
// Two families:
// - LinkError: why a single link is broken. Never aborts the crawl, the
//   driver turns it into a BROKEN classification and moves on.
// - ConfigError: the run cannot start (bad base URL, bad webhook, ...).
//   Fatal, reported before any crawling begins.
//
// Rust concepts:
// - thiserror: derive macro that implements std::error::Error + Display
// - #[source]: links an error to the lower-level error that caused it
// =============================================================================

use thiserror::Error;

// Why a link failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The server answered, but not with 200 or 204
    #[error("HTTP {code} {message}")]
    HttpStatus { code: u16, message: String },

    /// No usable answer at all (timeout, DNS, refused connection, TLS, ...)
    ///
    /// `code` is a stable identifier such as "TIMEOUT" when we could
    /// recognise the failure, otherwise only the message is known.
    #[error("{}", transport_label(.code, .message))]
    Transport { code: Option<String>, message: String },
}

impl LinkError {
    // Status code as shown in reports: the HTTP code, or the transport
    // error code if there is one
    pub fn status_code(&self) -> Option<String> {
        match self {
            LinkError::HttpStatus { code, .. } => Some(code.to_string()),
            LinkError::Transport { code, .. } => code.clone(),
        }
    }

    // Status message as shown in reports.
    // Transport failures use the code (or message) upper-cased.
    pub fn status_message(&self) -> String {
        match self {
            LinkError::HttpStatus { message, .. } => message.clone(),
            LinkError::Transport { code, message } => {
                code.as_deref().unwrap_or(message).to_uppercase()
            }
        }
    }
}

fn transport_label<'a>(code: &'a Option<String>, message: &'a str) -> &'a str {
    code.as_deref().unwrap_or(message)
}

// Startup problems. Any of these stops the program before the first fetch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a base URL is required (pass it as an argument or set LINK_PATROL_BASE_URL)")]
    MissingBaseUrl,

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("base URL '{0}' has no host")]
    MissingHost(String),

    #[error("invalid webhook URL '{url}': {source}")]
    InvalidWebhookUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}
