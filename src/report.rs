// src/report.rs
// =============================================================================
// Everything the user sees on stdout (and, in JSON mode, stderr).
//
// The crawler emits three kinds of events:
// - link_checked: one per fetch cycle (progress line, hidden by --silent)
// - broken_link:  one per distinct broken URL, as soon as it is found
// - finished:     once, with the totals
//
// ConsoleReporter renders them either as human-readable lines or, with
// --json, as a single JSON document printed at the end. In JSON mode stdout
// carries nothing but that document, so broken links are still announced
// as they are found, on stderr.
// =============================================================================

use crate::checker::Classification;
use crate::crawl::{BrokenLink, CrawlSummary, CrawlTarget};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

type Output = Mutex<Box<dyn Write + Send>>;

pub trait Reporter: Send + Sync {
    fn link_checked(
        &self,
        target: &CrawlTarget,
        classification: &Classification,
        elapsed: Option<Duration>,
    );

    fn broken_link(&self, link: &BrokenLink);

    fn finished(&self, summary: &CrawlSummary);
}

pub struct ConsoleReporter {
    silent: bool,
    json: bool,
    out: Output,
    err: Output,
}

impl ConsoleReporter {
    pub fn new(silent: bool, json: bool) -> Self {
        Self::with_writers(silent, json, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(
        silent: bool,
        json: bool,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            silent,
            json,
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    // A closed pipe must not take the crawl down, so write errors are dropped
    fn write(output: &Output, text: &str) {
        if let Ok(mut writer) = output.lock() {
            let _ = writeln!(writer, "{}", text);
            let _ = writer.flush();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn link_checked(
        &self,
        target: &CrawlTarget,
        classification: &Classification,
        elapsed: Option<Duration>,
    ) {
        if self.silent || self.json {
            return;
        }
        Self::write(&self.out, &format_progress(target, classification, elapsed));
    }

    fn broken_link(&self, link: &BrokenLink) {
        let output = if self.json { &self.err } else { &self.out };
        Self::write(output, &format_broken(link));
    }

    fn finished(&self, summary: &CrawlSummary) {
        if self.json {
            // Serializing plain strings and numbers cannot fail
            match serde_json::to_string_pretty(summary) {
                Ok(json) => Self::write(&self.out, &json),
                Err(e) => Self::write(&self.err, &format!("Error: could not serialize report: {}", e)),
            }
            return;
        }

        let text = format!(
            "\n📊 Summary:\n   📋 Links checked: {}\n   ❌ Broken: {}\n   ⏱️  Elapsed: {:.2}s",
            summary.links_checked,
            summary.broken_links.len(),
            summary.elapsed.as_secs_f64()
        );
        Self::write(&self.out, &text);
    }
}

// One line per fetch cycle, e.g.
//   ✅ 200 https://example.com/a (123 ms)
fn format_progress(
    target: &CrawlTarget,
    classification: &Classification,
    elapsed: Option<Duration>,
) -> String {
    let status = match classification {
        Classification::Ok | Classification::Expandable => "✅".to_string(),
        Classification::Broken(error) => format!("❌ {}", error),
    };

    match elapsed {
        Some(elapsed) => format!(
            "{} {} ({} ms)",
            status,
            target.request_url,
            elapsed.as_millis()
        ),
        None => format!("{} {}", status, target.request_url),
    }
}

// One line per broken link, e.g.
//   🔗 BROKEN https://example.com/b [404 Not Found] on https://example.com/a
fn format_broken(link: &BrokenLink) -> String {
    let status = match &link.status_code {
        Some(code) if *code != link.status_message => format!("{} {}", code, link.status_message),
        _ => link.status_message.clone(),
    };

    format!(
        "🔗 BROKEN {} [{}] on {}",
        link.request_url,
        status,
        link.reference_url.as_deref().unwrap_or("(start page)")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkError;
    use std::sync::Arc;

    // Cloneable in-memory writer so a test can read back what was printed
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn reporter(silent: bool, json: bool) -> (ConsoleReporter, Captured, Captured) {
        let out = Captured::default();
        let err = Captured::default();
        let reporter =
            ConsoleReporter::with_writers(silent, json, Box::new(out.clone()), Box::new(err.clone()));
        (reporter, out, err)
    }

    fn broken() -> BrokenLink {
        BrokenLink {
            request_url: "https://example.com/b".to_string(),
            reference_url: Some("https://example.com/a".to_string()),
            status_code: Some("404".to_string()),
            status_message: "Not Found".to_string(),
        }
    }

    fn summary() -> CrawlSummary {
        CrawlSummary {
            links_checked: 2,
            elapsed: Duration::from_millis(250),
            broken_links: vec![broken()],
        }
    }

    #[test]
    fn test_text_mode_prints_broken_links_on_stdout() {
        let (reporter, out, err) = reporter(true, false);
        reporter.link_checked(&CrawlTarget::new("https://example.com/a", None), &Classification::Ok, None);
        reporter.broken_link(&broken());
        reporter.finished(&summary());

        let out = out.text();
        assert!(!out.contains("✅"), "silent hides progress lines");
        assert!(out.contains("🔗 BROKEN https://example.com/b [404 Not Found]"));
        assert!(out.contains("📋 Links checked: 2"));
        assert!(err.text().is_empty());
    }

    #[test]
    fn test_json_mode_streams_broken_links_to_stderr() {
        let (reporter, out, err) = reporter(false, true);
        reporter.link_checked(&CrawlTarget::new("https://example.com/a", None), &Classification::Ok, None);
        reporter.broken_link(&broken());

        // Announced as soon as it is found, before the final report
        assert_eq!(
            err.text(),
            "🔗 BROKEN https://example.com/b [404 Not Found] on https://example.com/a\n"
        );
        assert!(out.text().is_empty());

        reporter.finished(&summary());
        let report: serde_json::Value = serde_json::from_str(&out.text()).unwrap();
        assert_eq!(report["links_checked"], 2);
        assert_eq!(report["broken_links"][0]["request_url"], "https://example.com/b");
    }

    #[test]
    fn test_format_broken_http() {
        let link = BrokenLink {
            request_url: "https://example.com/b".to_string(),
            reference_url: Some("https://example.com/a".to_string()),
            status_code: Some("404".to_string()),
            status_message: "Not Found".to_string(),
        };
        assert_eq!(
            format_broken(&link),
            "🔗 BROKEN https://example.com/b [404 Not Found] on https://example.com/a"
        );
    }

    #[test]
    fn test_format_broken_transport_does_not_repeat_code() {
        let link = BrokenLink {
            request_url: "https://down.example/".to_string(),
            reference_url: None,
            status_code: Some("TIMEOUT".to_string()),
            status_message: "TIMEOUT".to_string(),
        };
        assert_eq!(
            format_broken(&link),
            "🔗 BROKEN https://down.example/ [TIMEOUT] on (start page)"
        );
    }

    #[test]
    fn test_format_progress() {
        let target = CrawlTarget::new("https://example.com/a", None);
        assert_eq!(
            format_progress(&target, &Classification::Ok, Some(Duration::from_millis(42))),
            "✅ https://example.com/a (42 ms)"
        );

        let broken = Classification::Broken(LinkError::HttpStatus {
            code: 500,
            message: "Internal Server Error".to_string(),
        });
        assert_eq!(
            format_progress(&target, &broken, None),
            "❌ HTTP 500 Internal Server Error https://example.com/a"
        );
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = CrawlSummary {
            links_checked: 3,
            elapsed: Duration::from_millis(1500),
            broken_links: vec![BrokenLink {
                request_url: "https://example.com/b".to_string(),
                reference_url: Some("https://example.com/a".to_string()),
                status_code: Some("404".to_string()),
                status_message: "Not Found".to_string(),
            }],
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["links_checked"], 3);
        assert_eq!(json["elapsed_ms"], 1500);
        assert_eq!(json["broken_links"][0]["request_url"], "https://example.com/b");
        assert_eq!(json["broken_links"][0]["status_code"], "404");
    }
}
