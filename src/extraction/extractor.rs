//! Extraction traits.

use std::path::Path;

use crate::document::Metadata;
use crate::error::Result;
use crate::extraction::kind::FileKind;

/// Text extraction for one kind of file.
pub trait ContentExtractor: Send + Sync {
    /// The file kind this extractor handles.
    fn kind(&self) -> FileKind;

    /// Get the name of this extractor.
    fn name(&self) -> &'static str;

    /// Extract the textual content of a file.
    ///
    /// Failures are reported as [`FolioError::Extraction`](crate::error::FolioError::Extraction).
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Output of an extraction adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Extracted text; may be empty.
    pub text: String,
    /// File metadata.
    pub metadata: Metadata,
}

/// The contract the retrieval façade uses to turn files into text.
pub trait ExtractionAdapter: Send + Sync {
    /// Classify a file. [`FileKind::Unsupported`] files are skipped by callers.
    fn classify(&self, path: &Path) -> FileKind;

    /// Extract text and metadata from a file.
    fn extract(&self, path: &Path) -> Result<Extracted>;
}
