//! Crawler module: fetching, the frontier, and the crawl engine
//!
//! The engine pulls URLs from a deduplicated frontier with a fixed worker
//! pool, runs each page through fetch/extract/persist, and feeds
//! discovered links back in. PDF documents found along the way are routed
//! through the ingestor instead of the page pipeline.

mod engine;
mod fetcher;
mod frontier;

pub use engine::{crawl, CancelHandle, CrawlEngine};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, PageResult};
pub use frontier::{Frontier, FrontierEntry};

pub use crate::output::CrawlSummary;
