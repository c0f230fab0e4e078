//! Plain-text extraction from uploaded resume documents.
//!
//! [`extract_text`] never fails: unsupported types and broken documents both
//! yield an empty string and a log line.

mod docx;
mod pdf;

use std::path::Path;

use tracing::{debug, warn};

pub use docx::extract_docx;
pub use pdf::extract_pdf;

#[derive(Debug, thiserror::Error)]
pub enum TextExtractError {
    #[error("unsupported document type: {0:?}")]
    Unsupported(String),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("PDF extractor panicked: {0}")]
    Panicked(String),
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detect the document type from the file extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("pdf") {
            Some(Self::Pdf)
        } else if ext.eq_ignore_ascii_case("docx") {
            Some(Self::Docx)
        } else {
            None
        }
    }

    pub fn extract(self, bytes: &[u8]) -> Result<String, TextExtractError> {
        match self {
            Self::Pdf => extract_pdf(bytes),
            Self::Docx => extract_docx(bytes),
        }
    }
}

/// Extract text, reporting why nothing could be extracted.
pub fn try_extract_text(filename: &str, bytes: &[u8]) -> Result<String, TextExtractError> {
    DocumentKind::from_filename(filename)
        .ok_or_else(|| TextExtractError::Unsupported(filename.to_string()))?
        .extract(bytes)
}

/// Extract text from a document, or return "" when that is not possible.
pub fn extract_text(filename: &str, bytes: &[u8]) -> String {
    match try_extract_text(filename, bytes) {
        Ok(text) => {
            debug!(filename, chars = text.len(), "Extracted document text");
            text
        }
        Err(e @ TextExtractError::Unsupported(_)) => {
            warn!(filename, "Skipping text extraction: {e}");
            String::new()
        }
        Err(e) => {
            warn!(filename, error = %e, "Text extraction failed");
            String::new()
        }
    }
}

/// [`extract_text`] on the blocking thread pool.
pub async fn extract_text_blocking(filename: String, bytes: Vec<u8>) -> String {
    let name = filename.clone();
    match tokio::task::spawn_blocking(move || extract_text(&filename, &bytes)).await {
        Ok(text) => text,
        Err(e) => {
            warn!(filename = %name, error = %e, "Text extraction task failed");
            String::new()
        }
    }
}
