//! Document record and identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::metadata::Metadata;
use crate::vector::core::vector::Vector;

/// Opaque identifier of a record within one index instance.
///
/// Identifiers order lexicographically; the vector index uses this order to
/// break distance ties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Create an identifier from any string.
    pub fn new<S: Into<String>>(id: S) -> Self {
        DocId(id.into())
    }

    /// Identifier for the `seq`-th file of a build (1-based).
    ///
    /// The number is zero-padded so that ascending identifier order equals
    /// ingestion order.
    pub fn sequential(seq: usize) -> Self {
        DocId(format!("doc-{seq:010}"))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        DocId::new(id)
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId(id)
    }
}

/// Extracted text plus metadata, optionally with an embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique identifier within the index that holds the record.
    pub id: DocId,
    /// Extracted text; empty when extraction yielded nothing.
    pub text: String,
    /// File metadata, stored verbatim.
    pub metadata: Metadata,
    /// Embedding of `text`, present only for vector backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vector>,
}

impl DocumentRecord {
    /// Create a record without an embedding.
    pub fn new<I: Into<DocId>, S: Into<String>>(id: I, text: S, metadata: Metadata) -> Self {
        DocumentRecord {
            id: id.into(),
            text: text.into(),
            metadata,
            embedding: None,
        }
    }

    /// Attach an embedding.
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// File name from the record's metadata.
    pub fn filename(&self) -> &str {
        &self.metadata.filename
    }
}
