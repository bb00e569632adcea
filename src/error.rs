//! Error types for the Folio library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`FolioError`] enum. Batch operations (building an index, ingesting
//! records, exporting matches) do not fail as a whole when a single item
//! fails; they collect per-item errors into itemized reports instead, and
//! only return `Err` for problems that stop any work from starting.
//!
//! # Examples
//!
//! ```
//! use folio::error::{FolioError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FolioError::invalid_argument("top_k must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for Folio operations.
#[derive(Error, Debug)]
pub enum FolioError {
    /// I/O errors (file operations, directory listing, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A source file could not be turned into text.
    #[error("Extraction error for {}: {reason}", path.display())]
    Extraction {
        /// The file that failed.
        path: PathBuf,
        /// Why it failed.
        reason: String,
    },

    /// A vector's length differs from the index's established dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimension the index holds.
        expected: usize,
        /// The dimension that was offered.
        actual: usize,
    },

    /// An ingestion batch was empty and the caller requires input.
    #[error("Empty batch: at least one record is required")]
    EmptyBatch,

    /// A record offered to a vector index carried no embedding.
    #[error("Missing embedding for record {0}")]
    MissingEmbedding(String),

    /// The embedding adapter failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The remote vector service failed or returned an unusable response.
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// A matched file could not be copied to the destination.
    #[error("Copy error for {filename}: {reason}")]
    Copy {
        /// The file name that failed to copy.
        filename: String,
        /// Why it failed.
        reason: String,
    },

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration, detected before any work starts.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation not allowed in the current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors from remote adapters
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for operations that may fail with FolioError.
pub type Result<T> = std::result::Result<T, FolioError>;

impl FolioError {
    /// Create a new extraction error.
    pub fn extraction<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        FolioError::Extraction {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        FolioError::DimensionMismatch { expected, actual }
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        FolioError::Embedding(msg.into())
    }

    /// Create a new remote service error.
    pub fn remote<S: Into<String>>(msg: S) -> Self {
        FolioError::RemoteService(msg.into())
    }

    /// Create a new copy error.
    pub fn copy<F: Into<String>, S: Into<String>>(filename: F, reason: S) -> Self {
        FolioError::Copy {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        FolioError::Analysis(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        FolioError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        FolioError::InvalidConfig(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        FolioError::InvalidOperation(msg.into())
    }

    /// Short reason text used in skipped-file and failure reports.
    ///
    /// For extraction and copy errors the path or file name is already part
    /// of the report entry, so only the reason is returned.
    pub fn reason(&self) -> String {
        match self {
            FolioError::Extraction { reason, .. } => reason.clone(),
            FolioError::Copy { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}
