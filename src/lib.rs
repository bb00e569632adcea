//! # Folio
//!
//! Find documents in a folder of PDFs, scanned images and text files, by
//! keyword or by meaning.
//!
//! ## Features
//!
//! - Pluggable extraction per file kind (text, PDF, OCR for images)
//! - Exact nearest-neighbour search over embeddings
//! - Stemmed BM25 keyword search
//! - Optional remote vector service backend
//! - Itemized reports for every partial failure
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use folio::retrieval::{RetrievalConfig, Retriever};
//!
//! let retriever = Retriever::new(RetrievalConfig::default()).unwrap();
//! let report = retriever.build(Path::new("./documents")).unwrap();
//! for skipped in &report.skipped {
//!     eprintln!("skipped {}: {}", skipped.filename, skipped.reason);
//! }
//!
//! let hits = retriever.search("unpaid invoice").unwrap();
//! retriever.export_matches(&hits, Path::new("./matches")).unwrap();
//! ```

pub mod analysis;
pub mod cli;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extraction;
pub mod lexical;
pub mod remote;
pub mod retrieval;
pub mod vector;

pub mod prelude {
    pub use crate::document::{DocId, DocumentRecord, Metadata};
    pub use crate::embedding::TextEmbedder;
    pub use crate::error::{FolioError, Result};
    pub use crate::retrieval::{BackendKind, RetrievalConfig, Retriever, SearchHit};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
