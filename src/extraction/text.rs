//! Plain text extractor.

use std::fs;
use std::path::Path;

use crate::error::{FolioError, Result};
use crate::extraction::extractor::ContentExtractor;
use crate::extraction::kind::FileKind;

/// Reads `.txt` files as strict UTF-8.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        TextExtractor
    }
}

impl ContentExtractor for TextExtractor {
    fn kind(&self) -> FileKind {
        FileKind::Text
    }

    fn name(&self) -> &'static str {
        "text"
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| FolioError::extraction(path, e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| {
            FolioError::extraction(
                path,
                format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_reads_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Grüße aus Köln").unwrap();

        assert_eq!(TextExtractor::new().extract_text(&path).unwrap(), "Grüße aus Köln");
    }

    #[test]
    fn test_invalid_utf8_is_extraction_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [b'a', b'b', 0xff, 0xfe]).unwrap();

        let err = TextExtractor::new().extract_text(&path).unwrap_err();
        assert!(matches!(err, FolioError::Extraction { .. }));
        assert_eq!(err.reason(), "invalid UTF-8 at byte 2");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = TextExtractor::new().extract_text(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(FolioError::Extraction { .. })));
    }
}
