//! Crawl statistics
//!
//! Workers bump `CrawlCounters` as they go; when the crawl ends the counters
//! are frozen into a `CrawlStatistics` value for printing and summaries.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Live counters shared by all workers
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pages_crawled: AtomicUsize,
    fetch_failures: AtomicUsize,
    links_probed: AtomicUsize,
    probe_failures: AtomicUsize,
    invalid_skips: AtomicUsize,
    non_html_links: AtomicUsize,
    pages_enqueued: AtomicUsize,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a recorded page and returns the new total
    pub fn record_page_crawled(&self) -> usize {
        self.pages_crawled.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe(&self) {
        self.links_probed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe_failure(&self) {
        self.probe_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a link skipped because an earlier probe of it failed
    pub fn record_invalid_skip(&self) {
        self.invalid_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_non_html_link(&self) {
        self.non_html_links.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_enqueued(&self) {
        self.pages_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_crawled(&self) -> usize {
        self.pages_crawled.load(Ordering::Relaxed)
    }

    /// Freezes the counters into a statistics value
    pub fn finish(
        &self,
        workers: usize,
        invalid_urls: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> CrawlStatistics {
        CrawlStatistics {
            started_at,
            finished_at,
            workers,
            pages_crawled: self.pages_crawled.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            links_probed: self.links_probed.load(Ordering::Relaxed),
            probe_failures: self.probe_failures.load(Ordering::Relaxed),
            invalid_skips: self.invalid_skips.load(Ordering::Relaxed),
            non_html_links: self.non_html_links.load(Ordering::Relaxed),
            pages_enqueued: self.pages_enqueued.load(Ordering::Relaxed),
            invalid_urls,
        }
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Size of the worker pool
    pub workers: usize,

    /// Pages fetched and recorded
    pub pages_crawled: usize,

    /// Pages dropped because their fetch failed
    pub fetch_failures: usize,

    /// Header probes issued
    pub links_probed: usize,

    /// Probes that failed, marking their URL invalid
    pub probe_failures: usize,

    /// Links skipped because they were already known to be invalid
    pub invalid_skips: usize,

    /// Links whose probe reported a non-HTML content type
    pub non_html_links: usize,

    /// Pages discovered and queued, the seed excluded
    pub pages_enqueued: usize,

    /// Distinct invalid URLs at the end of the crawl
    pub invalid_urls: usize,
}

impl CrawlStatistics {
    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Percentage of dequeued pages that were fetched successfully
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_crawled + self.fetch_failures;
        if attempted == 0 {
            0.0
        } else {
            (self.pages_crawled as f64 / attempted as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Workers: {}", stats.workers);
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!(
        "  Duration: {:.2}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    );
    println!();

    println!("Pages:");
    println!("  Crawled: {}", stats.pages_crawled);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!("  Discovered and queued: {}", stats.pages_enqueued);
    println!();

    println!("Links:");
    println!("  Probed: {}", stats.links_probed);
    println!("  Non-HTML: {}", stats.non_html_links);
    println!("  Probe failures: {}", stats.probe_failures);
    println!("  Skipped as known invalid: {}", stats.invalid_skips);
    println!("  Distinct invalid URLs: {}", stats.invalid_urls);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_crawled,
        stats.pages_crawled + stats.fetch_failures
    );
}
