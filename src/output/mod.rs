//! Output layer: text files, metadata table, and the run summary
//!
//! Persistence failures here are the one error class that aborts a crawl
//! run; everything else in the pipeline degrades and continues.

mod recorder;
pub mod summary;
mod text_store;

pub use recorder::{CsvRecorder, MetadataRecorder, ScrapeRecord};
pub use summary::{print_summary, CrawlSummary};
pub use text_store::TextStore;
