//! End-of-run summary reporting

use std::time::Duration;

/// Counters describing one completed (or cancelled) crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// URLs dequeued and dispatched to fetch
    pub urls_visited: u64,

    /// Pages whose text passed the length policy and were saved
    pub pages_persisted: u64,

    /// Pages fetched and scanned for links but below the length policy
    pub pages_discarded: u64,

    /// Pages whose fetch failed (network error or non-200 status)
    pub pages_failed: u64,

    /// PDF documents recognized and merged into their pages
    pub pdfs_ingested: u64,

    /// PDF documents that failed to download, rasterize, or recognize
    pub pdfs_failed: u64,

    /// Distinct normalized URLs seen (enqueued or claimed) during the run
    pub urls_seen: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// True if the run stopped on a cancellation signal rather than a
    /// drained frontier
    pub cancelled: bool,
}

/// Prints the run summary to stdout in a human-readable form.
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    if summary.cancelled {
        println!("Run was cancelled before the frontier drained.\n");
    }

    println!("Pages:");
    println!("  Visited:   {}", summary.urls_visited);
    println!("  Persisted: {}", summary.pages_persisted);
    println!("  Discarded: {}", summary.pages_discarded);
    println!("  Failed:    {}", summary.pages_failed);
    println!();

    println!("PDF documents:");
    println!("  Ingested: {}", summary.pdfs_ingested);
    println!("  Failed:   {}", summary.pdfs_failed);
    println!();

    println!("Frontier: {} distinct URLs seen", summary.urls_seen);

    let rate = if summary.elapsed.as_secs_f64() > 0.0 {
        summary.urls_visited as f64 / summary.elapsed.as_secs_f64()
    } else {
        0.0
    };
    println!(
        "Elapsed: {:.1?} ({:.2} pages/sec)",
        summary.elapsed, rate
    );
}
