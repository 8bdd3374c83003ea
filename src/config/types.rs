use serde::Deserialize;

/// Main configuration structure for Ezhuthu
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    pub output: OutputConfig,
    /// Seed URLs the crawl starts from (depth 0)
    pub seeds: Vec<String>,
    /// Domains that are never followed, even within the crawl scope
    #[serde(default)]
    pub deny: Vec<DomainEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent crawl workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Pages whose extracted text has at most this many characters are
    /// discarded (strictly-greater persists)
    #[serde(rename = "min-text-length", default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Maximum link depth from the seeds; 0 means unbounded
    #[serde(rename = "max-depth", default)]
    pub max_depth: u32,

    /// Follow links to domains outside the seed set. Off by default:
    /// an unrestricted crawl of the open web rarely terminates.
    #[serde(rename = "follow-external", default)]
    pub follow_external: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// OCR configuration for the PDF ingestion pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language codes tried together, in order
    /// (primary script first, Latin fallback last)
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Target pixel width when rasterizing a PDF page for recognition
    #[serde(rename = "render-width", default = "default_render_width")]
    pub render_width: u32,

    /// Maximum PDFs rasterized/recognized at once. Recognition is
    /// CPU-bound and must not starve the fetch workers.
    #[serde(rename = "max-concurrent", default = "default_ocr_concurrent")]
    pub max_concurrent: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            render_width: default_render_width(),
            max_concurrent: default_ocr_concurrent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one UTF-8 text file per persisted page
    #[serde(rename = "text-dir")]
    pub text_dir: String,

    /// Path of the append-only metadata CSV table
    #[serde(rename = "metadata-path")]
    pub metadata_path: String,
}

/// A domain pattern entry for the deny list
#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    /// Domain pattern (e.g., "example.com" or "*.example.com")
    pub domain: String,
}

fn default_workers() -> u32 {
    4
}

fn default_min_text_length() -> usize {
    50
}

fn default_languages() -> Vec<String> {
    vec!["mal".to_string(), "eng".to_string()]
}

fn default_render_width() -> u32 {
    2000
}

fn default_ocr_concurrent() -> u32 {
    2
}

impl OcrConfig {
    /// Joins the language codes into the `lang1+lang2` form tesseract takes.
    pub fn language_spec(&self) -> String {
        self.languages.join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config: Config = toml::from_str(
            r#"
seeds = ["https://example.com/"]

[crawler]

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
text-dir = "./res"
metadata-path = "./metadata.csv"
"#,
        )
        .unwrap();

        assert_eq!(config.crawler.workers, 4);
        assert_eq!(config.crawler.min_text_length, 50);
        assert_eq!(config.crawler.max_depth, 0);
        assert!(!config.crawler.follow_external);
        assert_eq!(config.ocr.languages, vec!["mal", "eng"]);
        assert_eq!(config.ocr.max_concurrent, 2);
        assert!(config.deny.is_empty());
    }

    #[test]
    fn test_language_spec_joins_with_plus() {
        let ocr = OcrConfig::default();
        assert_eq!(ocr.language_spec(), "mal+eng");
    }
}
