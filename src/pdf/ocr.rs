//! OCR engine abstraction
//!
//! Recognition is a capability seam: the ingestor only needs "image in,
//! text out for a language set". The production implementation shells out
//! to the tesseract binary; tests substitute their own engine.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Maps a rasterized page image to recognized text.
///
/// Implementations are invoked from blocking worker threads and must be
/// safe to share across them.
pub trait OcrEngine: Send + Sync {
    /// Recognizes text in the image using the given language spec
    /// (tesseract form, e.g. `"mal+eng"`).
    fn recognize(&self, image: &Path, languages: &str) -> Result<String, OcrError>;
}

/// OCR engine failures
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("tesseract binary not found on PATH")]
    MissingBinary,

    #[error("failed to run tesseract: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("tesseract failed: {stderr}")]
    Engine { stderr: String },

    #[error("tesseract produced non-UTF-8 output")]
    Encoding,
}

/// OCR via the tesseract command-line tool.
///
/// Runs `tesseract <image> stdout -l <languages>` per page image. The
/// binary and the requested language packs must be installed on the host.
#[derive(Debug, Default)]
pub struct TesseractCli;

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &Path, languages: &str) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(languages)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OcrError::MissingBinary
                } else {
                    OcrError::Spawn(e)
                }
            })?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| OcrError::Encoding)
    }
}
