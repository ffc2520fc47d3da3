// src/config.rs
// =============================================================================
// Turns raw command-line / environment input into a validated CrawlConfig.
//
// Everything that can be wrong with the input is caught here, before the
// first request goes out: a missing or unparseable base URL, a base URL
// that is not http(s) or has no host, a bad webhook URL, a zero timeout.
// =============================================================================

use crate::cli::Cli;
use crate::crawl::DEFAULT_SUPPRESSED_STATUSES;
use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Where the crawl starts
    pub base_url: Url,
    /// Host of base_url; links on any other host are external
    pub base_host: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Hide per-link progress output
    pub silent: bool,
    /// Query parameter names that get a URL rejected
    pub ignored_query_params: Vec<String>,
    /// Never fetch links on other hosts
    pub ignore_external: bool,
    /// Also check <img src> targets
    pub include_images: bool,
    /// Where to send broken-link alerts
    pub webhook_url: Option<Url>,
    /// Broken statuses that do not trigger an alert
    pub suppressed_statuses: Vec<u16>,
    /// Print the final report as JSON
    pub json: bool,
    /// Exit with 1 when broken links were found
    pub fail_on_broken: bool,
}

impl CrawlConfig {
    // A config with every option at its default
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)?;
        let base_host = base_url
            .host_str()
            .ok_or_else(|| ConfigError::MissingHost(base_url.to_string()))?
            .to_string();

        Ok(Self {
            base_url,
            base_host,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            silent: false,
            ignored_query_params: Vec::new(),
            ignore_external: false,
            include_images: false,
            webhook_url: None,
            suppressed_statuses: DEFAULT_SUPPRESSED_STATUSES.to_vec(),
            json: false,
            fail_on_broken: false,
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let base_url = cli
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;

        let mut config = Self::new(base_url)?;

        if cli.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        config.timeout = Duration::from_millis(cli.timeout);
        config.silent = cli.silent;
        config.ignore_external = cli.ignore_external;
        config.include_images = cli.include_images;
        config.json = cli.json;
        config.fail_on_broken = cli.fail_on_broken;

        config.ignored_query_params = cli
            .ignore_query
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if let Some(statuses) = &cli.suppress_status {
            config.suppressed_statuses = statuses.clone();
        }

        config.webhook_url = match cli.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                Some(Url::parse(url).map_err(|source| ConfigError::InvalidWebhookUrl {
                    url: url.to_string(),
                    source,
                })?)
            }
            _ => None,
        };

        Ok(config)
    }
}

// The base URL is a link like any other: its fragment is dropped so it has
// the same identity as the links extracted from pages
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }

    url.set_fragment(None);
    Ok(url)
}
