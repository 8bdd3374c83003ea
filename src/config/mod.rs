//! Configuration loading and validation
//!
//! Configuration is a single TOML file naming the seeds, the crawler
//! behavior, the OCR language set, and the output locations. It is loaded
//! once, validated, and immutable for the duration of a run.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlerConfig, DomainEntry, OcrConfig, OutputConfig, UserAgentConfig};
