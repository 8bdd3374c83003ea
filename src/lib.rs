//! Ezhuthu: a Malayalam text harvester
//!
//! This crate implements a focused web crawler that fetches pages from seed
//! URLs, extracts Malayalam-script text, OCRs linked PDF documents, and
//! records per-page scrape metadata to an append-only CSV table.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod pdf;
pub mod url;

use thiserror::Error;

/// Main error type for Ezhuthu operations
#[derive(Debug, Error)]
pub enum EzhuthuError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// A failed page or document fetch.
///
/// Fetch failures are non-fatal to a crawl run: the engine logs them,
/// counts them, and moves on. The URL stays consumed so it is never
/// retried within the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timeout for {url}")]
    Timeout { url: String },
}

/// A failed PDF ingestion (download, rasterize, or OCR step).
///
/// Never fatal to the containing page: the engine proceeds with whatever
/// page text was already extracted.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to spool {url} to disk: {source}")]
    Spool {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rasterize {url}: {message}")]
    Rasterize { url: String, message: String },

    #[error("Document {url} contains no pages")]
    EmptyDocument { url: String },

    #[error("OCR failed for {url}: {source}")]
    Ocr {
        url: String,
        #[source]
        source: pdf::OcrError,
    },

    #[error("Ingest task for {url} aborted: {message}")]
    Task { url: String, message: String },
}

/// A failed write to the text store or metadata table.
///
/// Unlike the other error kinds, persistence failures indicate an
/// unrecoverable environment condition (disk full, permissions) and abort
/// the run.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write page text to {path}: {source}")]
    TextWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open metadata table {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to append metadata record: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush metadata table: {0}")]
    Flush(#[from] std::io::Error),
}

/// Result type alias for Ezhuthu operations
pub type Result<T> = std::result::Result<T, EzhuthuError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlSummary};
pub use url::{extract_domain, normalize_url, CrawlScope};
