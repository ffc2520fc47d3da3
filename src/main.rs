// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments (and LINK_PATROL_* environment variables)
// 2. Validate them into a CrawlConfig
// 3. Build the HTTP fetcher, the reporter and the optional webhook notifier
// 4. Crawl the site until every discovered link has been checked
// 5. Exit with the proper code (0 = crawl finished, 1 = broken links found
//    with --fail-on-broken, 2 = setup error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - fetch, classify, extract links
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated configuration
mod crawl; // src/crawl/ - frontier, broken link registry, crawl loop
mod error; // src/error.rs - error types
mod notify; // src/notify/ - webhook alerts
mod report; // src/report.rs - console / JSON output

use anyhow::{Context, Result};
use checker::HttpFetcher;
use clap::Parser;
use cli::Cli;
use config::CrawlConfig;
use crawl::{CrawlDriver, CrawlSession};
use notify::{Notifier, WebhookNotifier};
use report::{ConsoleReporter, Reporter};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // The summary reports time since process start, so take it first
    let started = Instant::now();

    let exit_code = match run(started).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished
//   Ok(1) = crawl finished, broken links found and --fail-on-broken set
//   Err   = could not start (bad configuration, HTTP client setup)
async fn run(started: Instant) -> Result<i32> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = CrawlConfig::from_cli(&cli).context("invalid configuration")?;

    let fetcher = HttpFetcher::new(config.timeout).context("failed to create HTTP client")?;

    let notifier: Option<Arc<dyn Notifier>> = match &config.webhook_url {
        Some(url) => Some(Arc::new(
            WebhookNotifier::new(url.clone(), config.timeout)
                .context("failed to create webhook client")?,
        )),
        None => None,
    };

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(config.silent, config.json));

    if !config.json {
        println!("🔍 Crawling website: {}", config.base_url);
        if config.ignore_external {
            println!("   (external links are skipped)");
        }
        println!();
    }

    let session = CrawlSession::new(&config, reporter.clone(), notifier);
    let driver = CrawlDriver::new(session, fetcher, reporter, config.include_images);
    let summary = driver.run(started).await;

    if config.fail_on_broken && !summary.broken_links.is_empty() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Sets up tracing output on stderr, so stdout only carries the report.
// RUST_LOG wins over --log-level when both are given.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Only fails if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
