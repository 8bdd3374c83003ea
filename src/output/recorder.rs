//! Append-only metadata table
//!
//! One row per persisted page, written to a CSV file that survives across
//! runs. The header is written exactly once, when the file is created or
//! found empty; every append is a single serialized row so concurrent
//! workers can never interleave partial records.

use crate::PersistError;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

/// Column order of the metadata table.
const HEADER: [&str; 4] = ["filename", "domain_name", "date_time_scraped", "url"];

/// Metadata describing one successfully persisted page
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRecord {
    /// Name of the text file within the output directory
    pub filename: String,

    /// Host the page was served from
    pub domain_name: String,

    /// Scrape time, `YYYY-MM-DD HH:MM:SS` UTC
    pub date_time_scraped: String,

    /// The page URL as fetched
    pub url: String,
}

/// Durable sink for scrape records.
pub trait MetadataRecorder: Send + Sync {
    /// Appends one record as a single atomic row.
    fn record(&self, entry: &ScrapeRecord) -> Result<(), PersistError>;
}

/// CSV-backed recorder.
///
/// The writer lives behind a mutex: `record` is the serialization point
/// shared by all crawl workers.
#[derive(Debug)]
pub struct CsvRecorder {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvRecorder {
    /// Opens (or creates) the metadata table at `path` in append mode.
    ///
    /// Writes the header row if and only if the file is new or empty, so
    /// resumed runs keep appending to the same table without a second
    /// header.
    pub fn open(path: &Path) -> Result<Self, PersistError> {
        let needs_header = match std::fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| PersistError::Open {
                path: path.display().to_string(),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            writer: Mutex::new(writer),
        })
    }
}

impl MetadataRecorder for CsvRecorder {
    fn record(&self, entry: &ScrapeRecord) -> Result<(), PersistError> {
        let mut writer = self.writer.lock().unwrap();
        writer.serialize(entry)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(n: usize) -> ScrapeRecord {
        ScrapeRecord {
            filename: format!("20240101T000000-{:06}-abcd1234.txt", n),
            domain_name: "malayalam.example.org".to_string(),
            date_time_scraped: "2024-01-01 00:00:00".to_string(),
            url: format!("https://malayalam.example.org/page/{}", n),
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");

        let recorder = CsvRecorder::open(&path).unwrap();
        recorder.record(&record(1)).unwrap();
        recorder.record(&record(2)).unwrap();
        drop(recorder);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "filename,domain_name,date_time_scraped,url");
    }

    #[test]
    fn test_reopen_does_not_duplicate_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");

        {
            let recorder = CsvRecorder::open(&path).unwrap();
            recorder.record(&record(1)).unwrap();
        }
        {
            let recorder = CsvRecorder::open(&path).unwrap();
            recorder.record(&record(2)).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let headers = content
            .lines()
            .filter(|l| l.starts_with("filename,"))
            .count();
        assert_eq!(headers, 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        let recorder = Arc::new(CsvRecorder::open(&path).unwrap());

        let workers = 8;
        let per_worker = 25;
        let mut handles = Vec::new();
        for w in 0..workers {
            let recorder = Arc::clone(&recorder);
            handles.push(std::thread::spawn(move || {
                for i in 0..per_worker {
                    recorder.record(&record(w * per_worker + i)).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        drop(recorder);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1 + workers * per_worker);
        assert_eq!(lines[0], "filename,domain_name,date_time_scraped,url");

        // Every row parses back into exactly four fields.
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 4, "malformed row: {}", line);
        }
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        let recorder = CsvRecorder::open(&path).unwrap();

        let mut entry = record(1);
        entry.url = "https://example.com/page?a=1,2".to_string();
        recorder.record(&entry).unwrap();
        drop(recorder);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[3], "https://example.com/page?a=1,2");
    }

    #[test]
    fn test_open_fails_on_unwritable_path() {
        // A regular file as a path component makes the open fail.
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = CsvRecorder::open(&file.path().join("metadata.csv"));
        assert!(matches!(result.unwrap_err(), PersistError::Open { .. }));
    }
}
