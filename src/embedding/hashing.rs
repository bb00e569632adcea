//! Feature-hashing embedder.
//!
//! Each analyzed term is hashed with FNV-1a into one of `dimension` buckets;
//! one hash bit picks the sign so that collisions tend to cancel. The
//! result is L2-normalized. No model is needed, so it works offline, and
//! texts sharing stemmed terms end up close together.

use std::hash::Hasher;
use std::sync::Arc;

use fnv::FnvHasher;

use crate::analysis::analyzer::{Analyzer, StemmingAnalyzer};
use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{FolioError, Result};
use crate::vector::core::vector::Vector;

/// Dimension of the default sentence model (all-MiniLM-L6-v2).
pub const DEFAULT_DIMENSION: usize = 384;

/// Deterministic bag-of-terms embedder.
#[derive(Clone)]
pub struct HashingEmbedder {
    analyzer: Arc<dyn Analyzer>,
    dimension: usize,
}

impl std::fmt::Debug for HashingEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashingEmbedder")
            .field("analyzer", &self.analyzer.name())
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl HashingEmbedder {
    /// Create an embedder producing vectors of `dimension` components.
    pub fn new(dimension: usize) -> Result<Self> {
        Self::with_analyzer(Arc::new(StemmingAnalyzer::new()?), dimension)
    }

    /// Create an embedder that hashes the terms of a custom analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(FolioError::invalid_config(
                "embedding dimension must be at least 1",
            ));
        }
        Ok(HashingEmbedder {
            analyzer,
            dimension,
        })
    }

    fn bucket(&self, term: &str) -> (usize, f32) {
        let mut hasher = FnvHasher::default();
        hasher.write(term.as_bytes());
        let hash = hasher.finish();

        let index = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl TextEmbedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        let mut data = vec![0.0f32; self.dimension];
        for term in self.analyzer.terms(text)? {
            let (index, sign) = self.bucket(&term);
            data[index] += sign;
        }

        let mut vector = Vector::new(data);
        vector.normalize();
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}
