//! File metadata carried alongside every document record.
//!
//! The three required keys (`filename`, `size`, `creation_date`) are typed
//! fields; anything else lives in an open map of [`MetadataValue`]s that the
//! indexes store verbatim and never interpret.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use folio::document::{Metadata, MetadataValue};
//!
//! let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
//! let metadata = Metadata::new("invoice.pdf", 2048, created)
//!     .with_extra("pages", MetadataValue::Integer(3));
//!
//! assert_eq!(metadata.filename, "invoice.pdf");
//! assert_eq!(metadata.extra("pages").and_then(|v| v.as_integer()), Some(3));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// A value stored under an additional metadata key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    /// Text value.
    Text(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean flag.
    Boolean(bool),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
}

impl MetadataValue {
    /// Get the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer value, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the timestamp, if this is a timestamp.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            MetadataValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Boolean(value)
    }
}

/// Metadata of one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Base name of the source file, used to locate it again on export.
    pub filename: String,
    /// File size in bytes.
    pub size: u64,
    /// Creation time of the file (modification time where the platform
    /// does not record creation).
    pub creation_date: DateTime<Utc>,
    /// Additional keys, opaque to the indexes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, MetadataValue>,
}

impl Metadata {
    /// Create metadata from the three required keys.
    pub fn new<S: Into<String>>(filename: S, size: u64, creation_date: DateTime<Utc>) -> Self {
        Metadata {
            filename: filename.into(),
            size,
            creation_date,
            extra: BTreeMap::new(),
        }
    }

    /// Read metadata for a file from the filesystem.
    pub fn from_path(path: &Path) -> Result<Self> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                FolioError::extraction(path, "file name is missing or not valid UTF-8")
            })?
            .to_string();

        let fs_metadata = fs::metadata(path)?;
        let created = fs_metadata
            .created()
            .or_else(|_| fs_metadata.modified())?;

        Ok(Metadata::new(
            filename,
            fs_metadata.len(),
            DateTime::<Utc>::from(created),
        ))
    }

    /// Add an additional key.
    pub fn with_extra<K: Into<String>>(mut self, key: K, value: MetadataValue) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Look up an additional key.
    pub fn extra(&self, key: &str) -> Option<&MetadataValue> {
        self.extra.get(key)
    }

    /// Serialize into the opaque blob sent to remote services.
    pub fn to_blob(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore metadata from a blob produced by [`Metadata::to_blob`].
    pub fn from_blob(blob: &str) -> Result<Self> {
        Ok(serde_json::from_str(blob)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_blob_preserves_every_key() {
        let created = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        let metadata = Metadata::new("scan.png", 512, created)
            .with_extra("ocr_lang", "eng".into())
            .with_extra("pages", MetadataValue::Integer(1));

        let blob = metadata.to_blob().unwrap();
        let restored = Metadata::from_blob(&blob).unwrap();

        assert_eq!(restored, metadata);
    }

    #[test]
    fn test_blob_without_extra_keys() {
        let created = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        let blob = Metadata::new("a.txt", 1, created).to_blob().unwrap();

        assert!(!blob.contains("extra"));
        assert_eq!(Metadata::from_blob(&blob).unwrap().filename, "a.txt");
    }

    #[test]
    fn test_from_path_reads_size_and_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"hello metadata").unwrap();

        let metadata = Metadata::from_path(&path).unwrap();
        assert_eq!(metadata.filename, "notes.txt");
        assert_eq!(metadata.size, 14);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Metadata::from_path(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(FolioError::Io(_))));
    }
}
