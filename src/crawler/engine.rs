//! Crawl engine: worker pool and per-URL pipeline
//!
//! The engine owns everything a run needs (the HTTP client, the frontier,
//! the scope policy, the PDF ingestor, and the output sinks) and drives a
//! fixed pool of workers through the per-URL pipeline:
//!
//! fetch -> extract -> ingest PDFs -> persist -> discover links -> enqueue
//!
//! Failure policy: fetch and ingest failures are counted and logged, then
//! the worker moves on. Only a persistence failure (disk full,
//! permissions) aborts the run: the first one cancels the frontier and is
//! returned from [`CrawlEngine::run`].

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::extract::parse_page;
use crate::output::{CrawlSummary, CsvRecorder, MetadataRecorder, ScrapeRecord, TextStore};
use crate::pdf::{PdfIngestor, TesseractCli};
use crate::url::{extract_domain, normalize_url, CrawlScope};
use crate::{EzhuthuError, PersistError};
use chrono::Utc;
use reqwest::Client;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use url::Url;

/// Run counters, shared across workers
#[derive(Debug, Default)]
struct Counters {
    visited: AtomicU64,
    persisted: AtomicU64,
    discarded: AtomicU64,
    failed: AtomicU64,
    pdfs_ingested: AtomicU64,
    pdfs_failed: AtomicU64,
}

/// State shared by every worker of a run
struct EngineShared {
    config: Config,
    client: Client,
    frontier: Frontier,
    scope: CrawlScope,
    ingestor: PdfIngestor,
    store: TextStore,
    recorder: Box<dyn MetadataRecorder>,
    counters: Counters,
    fatal: Mutex<Option<PersistError>>,
}

/// Cooperative cancellation handle for a running crawl.
///
/// Cloneable and cheap; typically handed to a signal handler. Cancelling
/// stops new dispatch while letting in-flight pages complete and be
/// recorded.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<EngineShared>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.shared.frontier.cancel();
    }
}

/// The crawl engine
pub struct CrawlEngine {
    shared: Arc<EngineShared>,
    seeds: Vec<Url>,
}

impl CrawlEngine {
    /// Builds an engine from a validated configuration.
    ///
    /// Opens the output sinks up front so a bad output location fails the
    /// run before any network traffic.
    pub fn new(config: Config) -> Result<Self, EzhuthuError> {
        let client = build_http_client(&config.user_agent)?;

        let mut seeds = Vec::new();
        for seed in &config.seeds {
            seeds.push(normalize_url(seed)?);
        }

        let scope = CrawlScope::new(&config, &seeds);
        let store = TextStore::create(Path::new(&config.output.text_dir))?;
        let recorder = CsvRecorder::open(Path::new(&config.output.metadata_path))?;
        let ingestor = PdfIngestor::new(client.clone(), Arc::new(TesseractCli), &config.ocr);

        let shared = Arc::new(EngineShared {
            config,
            client,
            frontier: Frontier::new(),
            scope,
            ingestor,
            store,
            recorder: Box::new(recorder),
            counters: Counters::default(),
            fatal: Mutex::new(None),
        });

        Ok(Self { shared, seeds })
    }

    /// Returns a handle that cancels this run when invoked.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Runs the crawl until the frontier drains or the run is cancelled.
    ///
    /// Returns the run summary, or the first persistence failure if one
    /// aborted the run.
    pub async fn run(&self) -> Result<CrawlSummary, EzhuthuError> {
        let start = Instant::now();

        for seed in &self.seeds {
            if self.shared.frontier.enqueue(seed, 0) {
                tracing::debug!("Seeded frontier with {}", seed);
            }
        }

        let workers = self.shared.config.crawler.workers;
        tracing::info!(
            "Starting crawl: {} seeds, {} workers",
            self.seeds.len(),
            workers
        );

        let mut handles = Vec::new();
        for worker_id in 0..workers {
            let shared = Arc::clone(&self.shared);
            handles.push(tokio::spawn(worker_loop(shared, worker_id)));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Worker task panicked: {}", e);
            }
        }

        if let Some(fatal) = self.shared.fatal.lock().unwrap().take() {
            return Err(fatal.into());
        }

        let summary = self.summary(start.elapsed());
        tracing::info!(
            "Crawl finished: {} visited, {} persisted, {} failed in {:?}",
            summary.urls_visited,
            summary.pages_persisted,
            summary.pages_failed,
            summary.elapsed
        );

        Ok(summary)
    }

    fn summary(&self, elapsed: std::time::Duration) -> CrawlSummary {
        let counters = &self.shared.counters;
        CrawlSummary {
            urls_visited: counters.visited.load(Ordering::Relaxed),
            pages_persisted: counters.persisted.load(Ordering::Relaxed),
            pages_discarded: counters.discarded.load(Ordering::Relaxed),
            pages_failed: counters.failed.load(Ordering::Relaxed),
            pdfs_ingested: counters.pdfs_ingested.load(Ordering::Relaxed),
            pdfs_failed: counters.pdfs_failed.load(Ordering::Relaxed),
            urls_seen: self.shared.frontier.seen_count() as u64,
            elapsed,
            cancelled: self.shared.frontier.is_cancelled(),
        }
    }
}

/// One worker: pull, process, repeat until the frontier is done.
async fn worker_loop(shared: Arc<EngineShared>, worker_id: u32) {
    while let Some(entry) = shared.frontier.next_entry().await {
        tracing::debug!("Worker {} processing {}", worker_id, entry.url);

        let result = process_entry(&shared, &entry).await;
        shared.frontier.task_done();

        if let Err(e) = result {
            tracing::error!("Persistence failure, aborting run: {}", e);
            {
                let mut fatal = shared.fatal.lock().unwrap();
                if fatal.is_none() {
                    *fatal = Some(e);
                }
            }
            shared.frontier.cancel();
            break;
        }
    }

    tracing::debug!("Worker {} exiting", worker_id);
}

/// Runs one URL through the pipeline.
///
/// Only persistence failures escape as errors; everything else is
/// absorbed into the counters.
async fn process_entry(shared: &EngineShared, entry: &FrontierEntry) -> Result<(), PersistError> {
    let counters = &shared.counters;
    counters.visited.fetch_add(1, Ordering::Relaxed);

    let page = match fetch_page(&shared.client, &entry.url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Fetch failed: {}", e);
            counters.failed.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
    };

    let parsed = parse_page(&page.body, &page.final_url);
    let mut text = parsed.text;

    // Document work is sequenced through the ingestor's own bound rather
    // than fanned out per link.
    for pdf_url in &parsed.pdf_links {
        if !shared.frontier.claim(pdf_url) {
            tracing::debug!("Skipping already-ingested document {}", pdf_url);
            continue;
        }

        match shared.ingestor.ingest(pdf_url).await {
            Ok(recognized) => {
                let recognized = recognized.trim();
                if !recognized.is_empty() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(recognized);
                }
                counters.pdfs_ingested.fetch_add(1, Ordering::Relaxed);
                tracing::info!("Ingested document {}", pdf_url);
            }
            Err(e) => {
                tracing::warn!("Document ingestion failed: {}", e);
                counters.pdfs_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    let chars = text.chars().count();
    let threshold = shared.config.crawler.min_text_length;
    if chars > threshold {
        persist_page(shared, &page.final_url, &text)?;
        counters.persisted.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Persisted {} ({} chars)", page.final_url, chars);
    } else {
        // Below threshold: dropped, but its links are still followed.
        counters.discarded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            "Discarded {} ({} chars, threshold {})",
            page.final_url,
            chars,
            threshold
        );
    }

    discover_links(shared, entry, &parsed.links);

    Ok(())
}

/// Writes the page text and appends its metadata record.
fn persist_page(shared: &EngineShared, url: &Url, text: &str) -> Result<(), PersistError> {
    let scraped_at = Utc::now();
    let filename = shared.store.save(url, text, scraped_at)?;

    let record = ScrapeRecord {
        filename,
        domain_name: extract_domain(url).unwrap_or_default(),
        date_time_scraped: scraped_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        url: url.to_string(),
    };
    shared.recorder.record(&record)
}

/// Enqueues the in-scope, unseen links of a processed page.
fn discover_links(shared: &EngineShared, entry: &FrontierEntry, links: &[Url]) {
    let max_depth = shared.config.crawler.max_depth;
    let next_depth = entry.depth + 1;
    if max_depth > 0 && next_depth > max_depth {
        tracing::debug!("Depth limit reached at {}", entry.url);
        return;
    }

    for link in links {
        let domain = match extract_domain(link) {
            Some(d) => d,
            None => continue,
        };

        if !shared.scope.allows(&domain) {
            tracing::trace!("Out of scope: {}", link);
            continue;
        }

        if shared.frontier.enqueue(link, next_depth) {
            tracing::trace!("Enqueued {} at depth {}", link, next_depth);
        }
    }
}

/// Convenience wrapper: build an engine and run it to completion.
pub async fn crawl(config: Config) -> Result<CrawlSummary, EzhuthuError> {
    let engine = CrawlEngine::new(config)?;
    engine.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CrawlerConfig, OcrConfig, OutputConfig, UserAgentConfig,
    };

    fn test_config(seeds: Vec<String>, text_dir: &str, metadata_path: &str) -> Config {
        Config {
            crawler: CrawlerConfig {
                workers: 2,
                min_text_length: 50,
                max_depth: 0,
                follow_external: false,
            },
            user_agent: UserAgentConfig {
                crawler_name: "EzhuthuBot".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            ocr: OcrConfig::default(),
            output: OutputConfig {
                text_dir: text_dir.to_string(),
                metadata_path: metadata_path.to_string(),
            },
            seeds,
            deny: vec![],
        }
    }

    #[tokio::test]
    async fn test_engine_rejects_unwritable_output() {
        // A regular file as a path component makes the text dir unusable.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let config = test_config(
            vec!["https://example.com/".to_string()],
            blocker.path().join("res").to_str().unwrap(),
            blocker.path().join("metadata.csv").to_str().unwrap(),
        );
        assert!(matches!(
            CrawlEngine::new(config),
            Err(EzhuthuError::Persist(_))
        ));
    }

    #[tokio::test]
    async fn test_engine_builds_with_valid_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(
            vec!["https://example.com/".to_string()],
            dir.path().join("res").to_str().unwrap(),
            dir.path().join("metadata.csv").to_str().unwrap(),
        );
        let engine = CrawlEngine::new(config).unwrap();
        let _handle = engine.cancel_handle();
    }
}
