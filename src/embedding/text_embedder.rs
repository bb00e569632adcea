//! Text embedding trait.

use crate::error::Result;
use crate::vector::core::vector::Vector;

/// Trait for converting text to vector embeddings.
///
/// Implementations must be deterministic: identical text and configuration
/// produce identical vectors of length [`TextEmbedder::dimension`].
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    fn embed(&self, text: &str) -> Result<Vector>;

    /// Generate embeddings for multiple texts in batch.
    ///
    /// The default implementation calls `embed` sequentially.
    /// Override this method for better performance with batch processing.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder.
    fn name(&self) -> &str {
        "text_embedder"
    }
}
