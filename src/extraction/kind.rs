//! File classification by extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Kind of source file, decided by its extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `.pdf`
    Pdf,
    /// `.png`, `.jpg`, `.jpeg`
    Image,
    /// `.txt`
    Text,
    /// Anything else; skipped without error.
    Unsupported,
}

impl FileKind {
    /// Classify an extension (without the leading dot).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => FileKind::Pdf,
            "png" | "jpg" | "jpeg" => FileKind::Image,
            "txt" => FileKind::Text,
            _ => FileKind::Unsupported,
        }
    }

    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(FileKind::Unsupported, FileKind::from_extension)
    }

    /// True for every kind except [`FileKind::Unsupported`].
    pub fn is_supported(&self) -> bool {
        !matches!(self, FileKind::Unsupported)
    }

    /// Lowercase name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Image => "image",
            FileKind::Text => "text",
            FileKind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(FileKind::from_path(Path::new("a/report.PDF")), FileKind::Pdf);
        assert_eq!(FileKind::from_path(Path::new("scan.jpeg")), FileKind::Image);
        assert_eq!(FileKind::from_path(Path::new("scan.Png")), FileKind::Image);
        assert_eq!(FileKind::from_path(Path::new("notes.txt")), FileKind::Text);
        assert_eq!(FileKind::from_path(Path::new("data.csv")), FileKind::Unsupported);
        assert_eq!(FileKind::from_path(Path::new("README")), FileKind::Unsupported);
    }

    #[test]
    fn test_is_supported() {
        assert!(FileKind::Text.is_supported());
        assert!(!FileKind::Unsupported.is_supported());
        assert_eq!(FileKind::Image.to_string(), "image");
    }
}
