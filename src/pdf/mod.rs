//! PDF ingestion: download, rasterize, recognize
//!
//! PDF links discovered during extraction are not fetched inline with the
//! page; the engine hands them here so document work can be bounded
//! separately from page concurrency. The pipeline per document:
//!
//! 1. Download the raw bytes (same 200-only rule as page fetches)
//! 2. Spool them to a named temp file
//! 3. Rasterize each page via pdfium (not async-safe, so the whole
//!    CPU-bound tail runs under `spawn_blocking`)
//! 4. OCR each page image in page order, concatenating recognized text
//!
//! The spooled PDF and the rasterized page images live in scoped temp
//! locations and are removed when the scope ends, whether ingestion
//! succeeded or failed. A failed document never aborts its page.

mod ocr;

pub use ocr::{OcrEngine, OcrError, TesseractCli};

use crate::config::OcrConfig;
use crate::crawler::fetch_bytes;
use crate::IngestError;
use pdfium_render::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// Downloads and OCRs PDF documents discovered during a crawl.
pub struct PdfIngestor {
    client: Client,
    engine: Arc<dyn OcrEngine>,
    languages: String,
    render_width: u32,
    permits: Arc<Semaphore>,
}

impl PdfIngestor {
    /// Creates an ingestor sharing the crawl's HTTP client.
    ///
    /// `max_concurrent` documents are rasterized/recognized at once;
    /// further requests wait on the semaphore so recognition cannot
    /// monopolize the blocking thread pool.
    pub fn new(client: Client, engine: Arc<dyn OcrEngine>, config: &OcrConfig) -> Self {
        Self {
            client,
            engine,
            languages: config.language_spec(),
            render_width: config.render_width,
            permits: Arc::new(Semaphore::new(config.max_concurrent as usize)),
        }
    }

    /// Ingests one PDF document, returning its recognized text.
    ///
    /// Every failure mode (download, corrupt document, zero pages, OCR)
    /// maps to an [`IngestError`] carrying the document URL; the caller
    /// logs it and proceeds with the page's own text.
    pub async fn ingest(&self, url: &Url) -> Result<String, IngestError> {
        let url_string = url.to_string();

        let bytes = fetch_bytes(&self.client, url)
            .await
            .map_err(|source| IngestError::Download {
                url: url_string.clone(),
                source,
            })?;

        tracing::debug!("Downloaded {} ({} bytes), queueing for OCR", url, bytes.len());

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| IngestError::Task {
                url: url_string.clone(),
                message: e.to_string(),
            })?;

        let engine = Arc::clone(&self.engine);
        let languages = self.languages.clone();
        let width = self.render_width;
        let task_url = url_string.clone();

        tokio::task::spawn_blocking(move || {
            recognize_document(&bytes, &task_url, engine.as_ref(), &languages, width)
        })
        .await
        .map_err(|e| IngestError::Task {
            url: url_string,
            message: e.to_string(),
        })?
    }
}

/// Rasterizes every page of the document and OCRs each image in order.
///
/// Runs on a blocking thread. The spooled PDF (`NamedTempFile`) and the
/// page images (`TempDir`) are dropped on all exit paths.
fn recognize_document(
    bytes: &[u8],
    url: &str,
    engine: &dyn OcrEngine,
    languages: &str,
    render_width: u32,
) -> Result<String, IngestError> {
    let spool_err = |source: std::io::Error| IngestError::Spool {
        url: url.to_string(),
        source,
    };
    let raster_err = |message: String| IngestError::Rasterize {
        url: url.to_string(),
        message,
    };

    let mut spool = tempfile::Builder::new()
        .prefix("ezhuthu-")
        .suffix(".pdf")
        .tempfile()
        .map_err(spool_err)?;
    spool.write_all(bytes).map_err(spool_err)?;
    spool.flush().map_err(spool_err)?;

    let pdfium = Pdfium::new(
        Pdfium::bind_to_system_library().map_err(|e| raster_err(format!("{:?}", e)))?,
    );
    let document = pdfium
        .load_pdf_from_file(&spool.path(), None)
        .map_err(|e| raster_err(format!("{:?}", e)))?;

    let pages = document.pages();
    if pages.len() == 0 {
        return Err(IngestError::EmptyDocument {
            url: url.to_string(),
        });
    }

    let scratch = tempfile::tempdir().map_err(spool_err)?;
    let render_config = PdfRenderConfig::new().set_target_width(render_width as i32);

    let mut recognized = String::new();
    for (index, page) in pages.iter().enumerate() {
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| raster_err(format!("page {}: {:?}", index, e)))?;

        let image_path = scratch.path().join(format!("page-{:04}.png", index));
        bitmap
            .as_image()
            .save(&image_path)
            .map_err(|e| raster_err(format!("page {}: {}", index, e)))?;

        let text = engine
            .recognize(&image_path, languages)
            .map_err(|source| IngestError::Ocr {
                url: url.to_string(),
                source,
            })?;
        recognized.push_str(&text);
    }

    Ok(recognized)
}
