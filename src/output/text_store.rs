//! Per-page text file storage
//!
//! Each persisted page becomes one UTF-8 text file in the output
//! directory. Filenames combine the scrape timestamp (readable), a
//! process-wide monotonic counter (unique under concurrency, where a bare
//! timestamp would collide), and a short hash of the URL (traceable back
//! to its source).

use crate::PersistError;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Writes page text files with collision-resistant names.
#[derive(Debug)]
pub struct TextStore {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl TextStore {
    /// Creates the output directory if needed and returns the store.
    pub fn create(dir: &Path) -> Result<Self, PersistError> {
        std::fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            sequence: AtomicU64::new(0),
        })
    }

    /// Writes one page's text, returning the filename recorded in the
    /// metadata table.
    pub fn save(
        &self,
        url: &Url,
        text: &str,
        scraped_at: DateTime<Utc>,
    ) -> Result<String, PersistError> {
        let filename = self.build_filename(url, scraped_at);
        let path = self.dir.join(&filename);

        std::fs::write(&path, text).map_err(|source| PersistError::TextWrite {
            path: path.display().to_string(),
            source,
        })?;

        Ok(filename)
    }

    fn build_filename(&self, url: &Url, scraped_at: DateTime<Utc>) -> String {
        let stamp = scraped_at.format("%Y%m%dT%H%M%S");
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let digest = Sha256::digest(url.as_str().as_bytes());
        let tag = hex::encode(&digest[..4]);

        format!("{}-{:06}-{}.txt", stamp, sequence, tag)
    }
}
