//! Embedder for pre-computed vectors.
//!
//! Looks vectors up in a fixed text → vector table, for fixtures and for
//! callers that computed embeddings elsewhere. Unknown text is an error.

use ahash::AHashMap;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{FolioError, Result};
use crate::vector::core::vector::Vector;

/// Table-driven embedder.
///
/// ```
/// use folio::embedding::{PrecomputedEmbedder, TextEmbedder};
/// use folio::vector::Vector;
///
/// let embedder = PrecomputedEmbedder::new(2)
///     .with_vector("north", Vector::new(vec![0.0, 1.0]))
///     .unwrap();
/// assert_eq!(embedder.embed("north").unwrap().data, vec![0.0, 1.0]);
/// assert!(embedder.embed("south").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrecomputedEmbedder {
    vectors: AHashMap<String, Vector>,
    dimension: usize,
}

impl PrecomputedEmbedder {
    /// Create an empty table for vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        PrecomputedEmbedder {
            vectors: AHashMap::new(),
            dimension,
        }
    }

    /// Add an entry, builder style.
    pub fn with_vector<S: Into<String>>(mut self, text: S, vector: Vector) -> Result<Self> {
        self.insert(text, vector)?;
        Ok(self)
    }

    /// Add or replace an entry.
    pub fn insert<S: Into<String>>(&mut self, text: S, vector: Vector) -> Result<()> {
        vector.validate_dimension(self.dimension)?;
        self.vectors.insert(text.into(), vector);
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when the table is empty.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl TextEmbedder for PrecomputedEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        self.vectors.get(text).cloned().ok_or_else(|| {
            FolioError::embedding(format!("no precomputed vector for text {text:?}"))
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "precomputed"
    }
}
