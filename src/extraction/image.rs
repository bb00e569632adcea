//! OCR extractor for images.
//!
//! Runs an external OCR program as `<program> <image> stdout` (the
//! Tesseract command line) and reads the recognized text from its standard
//! output.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{FolioError, Result};
use crate::extraction::extractor::ContentExtractor;
use crate::extraction::kind::FileKind;

/// Default OCR program.
pub const DEFAULT_OCR_PROGRAM: &str = "tesseract";

/// Extracts text from `.png`/`.jpg`/`.jpeg` files with an OCR program.
#[derive(Debug, Clone)]
pub struct OcrImageExtractor {
    program: String,
}

impl OcrImageExtractor {
    /// Create an extractor that runs `tesseract`.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_OCR_PROGRAM)
    }

    /// Create an extractor that runs a different OCR program with the same
    /// command line shape.
    pub fn with_program<S: Into<String>>(program: S) -> Self {
        OcrImageExtractor {
            program: program.into(),
        }
    }

    /// The OCR program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for OcrImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for OcrImageExtractor {
    fn kind(&self) -> FileKind {
        FileKind::Image
    }

    fn name(&self) -> &'static str {
        "ocr"
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        debug!("Running {} on {}", self.program, path.display());
        let output = Command::new(&self.program)
            .arg(path)
            .arg("stdout")
            .output()
            .map_err(|e| {
                FolioError::extraction(path, format!("failed to run {}: {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            return Err(FolioError::extraction(
                path,
                if detail.is_empty() {
                    format!("{} exited with {}", self.program, output.status)
                } else {
                    format!("{} exited with {}: {detail}", self.program, output.status)
                },
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
