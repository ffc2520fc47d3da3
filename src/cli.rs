// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every option can also be set through an environment variable
// (LINK_PATROL_*), which is handy in CI where the command line is fixed.
// Command-line values win over the environment.
//
// Raw values only: validation happens in config.rs.
// =============================================================================

use crate::config::DEFAULT_TIMEOUT_MS;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "link-patrol",
    version,
    about = "Crawl a website and report every broken link",
    long_about = "link-patrol starts at a base URL, follows every internal link it can find, \
                  and checks every link (internal and external) along the way. \
                  Broken links are reported as soon as they are found."
)]
pub struct Cli {
    /// Website URL to start crawling from (e.g., https://example.com)
    #[arg(env = "LINK_PATROL_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "LINK_PATROL_TIMEOUT", value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout: u64,

    /// Only print broken links and the final summary
    #[arg(long, env = "LINK_PATROL_SILENT")]
    pub silent: bool,

    /// Query parameter names that make a link be skipped (comma separated)
    ///
    /// Example: --ignore-query utm_source,utm_medium
    #[arg(long, env = "LINK_PATROL_IGNORE_QUERY", value_name = "NAME", value_delimiter = ',')]
    pub ignore_query: Vec<String>,

    /// Do not check links that point to other hosts
    #[arg(long, env = "LINK_PATROL_IGNORE_EXTERNAL")]
    pub ignore_external: bool,

    /// Also check image sources (<img src>)
    #[arg(long, env = "LINK_PATROL_INCLUDE_IMAGES")]
    pub include_images: bool,

    /// Webhook that receives a message for every broken link
    #[arg(long, env = "LINK_PATROL_WEBHOOK_URL", value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Broken statuses that are reported but never sent to the webhook
    /// (default: 302,403,999)
    #[arg(long, env = "LINK_PATROL_SUPPRESS_STATUS", value_name = "CODE", value_delimiter = ',')]
    pub suppress_status: Option<Vec<u16>>,

    /// Output the final report in JSON format instead of text.
    /// Broken links are still listed as they are found, on stderr.
    #[arg(long)]
    pub json: bool,

    /// Exit with code 1 if any broken link was found
    #[arg(long)]
    pub fail_on_broken: bool,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "link_patrol=debug")
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["link-patrol", "https://example.com"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(cli.timeout, 5000);
        assert!(cli.ignore_query.is_empty());
        assert!(cli.suppress_status.is_none());
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_repeated_and_delimited_query_names() {
        let cli = Cli::try_parse_from([
            "link-patrol",
            "https://example.com",
            "--ignore-query",
            "utm_source,utm_medium",
            "--ignore-query",
            "ref",
        ])
        .unwrap();
        assert_eq!(cli.ignore_query, vec!["utm_source", "utm_medium", "ref"]);
    }

    #[test]
    fn test_rejects_non_numeric_status() {
        let result = Cli::try_parse_from([
            "link-patrol",
            "https://example.com",
            "--suppress-status",
            "abc",
        ]);
        assert!(result.is_err());
    }
}
