//! Extractor registry for managing content extractors.

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;

use crate::document::{Metadata, MetadataValue};
use crate::error::{FolioError, Result};
use crate::extraction::extractor::{ContentExtractor, Extracted, ExtractionAdapter};
use crate::extraction::image::OcrImageExtractor;
use crate::extraction::kind::FileKind;
use crate::extraction::pdf::PdfExtractor;
use crate::extraction::text::TextExtractor;

/// Registry of content extractors, one per file kind.
///
/// ```
/// use std::path::Path;
/// use folio::extraction::{ExtractionAdapter, ExtractorRegistry, FileKind};
///
/// let registry = ExtractorRegistry::default();
/// assert_eq!(registry.classify(Path::new("photo.JPG")), FileKind::Image);
/// assert!(registry.get(FileKind::Pdf).is_some());
/// ```
pub struct ExtractorRegistry {
    extractors: AHashMap<FileKind, Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        ExtractorRegistry {
            extractors: AHashMap::new(),
        }
    }

    /// Registry with the text, PDF and OCR extractors, running `ocr_program`
    /// for images.
    pub fn with_ocr_program<S: Into<String>>(ocr_program: S) -> Self {
        let mut registry = Self::new();
        registry.register(TextExtractor::new());
        registry.register(PdfExtractor::new());
        registry.register(OcrImageExtractor::with_program(ocr_program));
        registry
    }

    /// Register an extractor for its kind, replacing any previous one.
    pub fn register<E: ContentExtractor + 'static>(&mut self, extractor: E) {
        self.extractors.insert(extractor.kind(), Arc::new(extractor));
    }

    /// Get the extractor for a file kind.
    pub fn get(&self, kind: FileKind) -> Option<Arc<dyn ContentExtractor>> {
        self.extractors.get(&kind).cloned()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_ocr_program(crate::extraction::image::DEFAULT_OCR_PROGRAM)
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.extractors.keys().map(FileKind::name).collect();
        kinds.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl ExtractionAdapter for ExtractorRegistry {
    fn classify(&self, path: &Path) -> FileKind {
        FileKind::from_path(path)
    }

    fn extract(&self, path: &Path) -> Result<Extracted> {
        let kind = self.classify(path);
        let extractor = self
            .get(kind)
            .ok_or_else(|| FolioError::extraction(path, format!("no extractor for {kind} files")))?;

        let metadata = Metadata::from_path(path)
            .map_err(|e| match e {
                FolioError::Extraction { .. } => e,
                other => FolioError::extraction(path, other.to_string()),
            })?
            .with_extra("kind", MetadataValue::from(kind.name()));

        let text = extractor.extract_text(path)?;
        debug!(
            "Extracted {} characters from {} with {}",
            text.chars().count(),
            metadata.filename,
            extractor.name()
        );

        Ok(Extracted { text, metadata })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ExtractorRegistry::new();
        assert!(registry.get(FileKind::Text).is_none());
    }

    #[test]
    fn test_extract_text_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memo.TXT");
        fs::write(&path, "Quarterly numbers").unwrap();

        let extracted = ExtractorRegistry::default().extract(&path).unwrap();
        assert_eq!(extracted.text, "Quarterly numbers");
        assert_eq!(extracted.metadata.filename, "memo.TXT");
        assert_eq!(extracted.metadata.size, 17);
        assert_eq!(
            extracted.metadata.extra("kind").and_then(|v| v.as_text()),
            Some("text")
        );
    }

    #[test]
    fn test_unsupported_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "a,b").unwrap();

        let registry = ExtractorRegistry::default();
        assert_eq!(registry.classify(&path), FileKind::Unsupported);
        assert!(matches!(
            registry.extract(&path),
            Err(FolioError::Extraction { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_extraction_error() {
        let dir = TempDir::new().unwrap();
        let result = ExtractorRegistry::default().extract(&dir.path().join("gone.txt"));
        assert!(matches!(result, Err(FolioError::Extraction { .. })));
    }

    #[test]
    fn test_debug_lists_kinds() {
        let rendered = format!("{:?}", ExtractorRegistry::default());
        assert_eq!(rendered, r#"ExtractorRegistry { kinds: ["image", "pdf", "text"] }"#);
    }
}
