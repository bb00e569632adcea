//! PDF content extractor.
//!
//! Uses pdf-extract to pull the text of every page, concatenated in page
//! order.

use std::fs;
use std::panic;
use std::path::Path;

use log::debug;

use crate::error::{FolioError, Result};
use crate::extraction::extractor::ContentExtractor;
use crate::extraction::kind::FileKind;

/// Extractor for PDF files.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        PdfExtractor
    }
}

impl ContentExtractor for PdfExtractor {
    fn kind(&self) -> FileKind {
        FileKind::Pdf
    }

    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        debug!("Extracting PDF: {}", path.display());
        let bytes = fs::read(path).map_err(|e| FolioError::extraction(path, e.to_string()))?;
        extract_pdf_text(&bytes).map_err(|reason| FolioError::extraction(path, reason))
    }
}

/// Extract text from PDF bytes. The parser can panic on malformed input;
/// that is reported like any other parse failure.
fn extract_pdf_text(bytes: &[u8]) -> std::result::Result<String, String> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("PDF extraction failed: {e}")),
        Err(_) => Err("PDF parser panicked on malformed input".to_string()),
    }
}
