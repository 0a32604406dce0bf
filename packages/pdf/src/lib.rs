#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Injury report PDF handling.
//!
//! The league publishes its injury reports only as PDFs. This crate
//! builds report URLs, downloads them with retry (see [`download`]), and
//! turns them into the plain text the injury parser consumes using
//! pure-Rust text extraction ([`pdf_extract`]).

pub mod download;
pub mod retry;

use std::path::Path;

/// Errors specific to report download and extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// A report slot hour outside `0..=23`.
    #[error("Invalid report hour {0} (expected 0-23)")]
    InvalidHour(u32),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Magic bytes every PDF file starts with.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Returns `true` if `bytes` looks like a PDF document.
#[must_use]
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extracts the text of a PDF held in memory.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if `bytes` is not a PDF or the
/// extractor rejects it.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    if !is_pdf(bytes) {
        return Err(PdfError::Extraction(format!(
            "input of {} bytes is not a PDF document",
            bytes.len()
        )));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    log::debug!(
        "Extracted {} characters of text from {} bytes of PDF",
        text.len(),
        bytes.len()
    );

    Ok(text)
}

/// Reads a PDF file and extracts its text.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read, or
/// [`PdfError::Extraction`] if it is not a readable PDF.
pub fn extract_text_from_path(path: &Path) -> Result<String, PdfError> {
    let bytes = std::fs::read(path)?;
    extract_text(&bytes)
}

/// Loads report text from `path`: `.pdf` files go through extraction,
/// anything else is read as UTF-8 text.
///
/// # Errors
///
/// Returns [`PdfError`] if the file cannot be read or extracted.
pub fn load_report_text(path: &Path) -> Result<String, PdfError> {
    let is_pdf_file = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf_file {
        extract_text_from_path(path)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn scratch_file(name: &str, contents: &[u8]) -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = extract_text(b"Injury Report: 01/15/25").unwrap_err();
        assert!(matches!(err, PdfError::Extraction(_)));
    }

    #[test]
    fn recognizes_pdf_magic() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(!is_pdf(b""));
        assert!(!is_pdf(b"<html>"));
    }

    #[test]
    fn loads_plain_text_reports_verbatim() {
        let (_dir, path) = scratch_file("report.txt", b"Miami Heat\nButler, Jimmy Out\n");
        let text = load_report_text(&path).unwrap();
        assert_eq!(text, "Miami Heat\nButler, Jimmy Out\n");
    }

    #[test]
    fn pdf_extension_goes_through_extraction() {
        let (_dir, path) = scratch_file("report.PDF", b"not really a pdf");
        let err = load_report_text(&path).unwrap_err();
        assert!(matches!(err, PdfError::Extraction(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_report_text(Path::new("/nonexistent/sports_etl/report.txt")).unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }
}
