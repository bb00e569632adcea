//! Text embedding adapters for the similarity backends.
//!
//! An embedder maps text to a fixed-dimension [`Vector`](crate::vector::Vector)
//! and must return the same vector for the same text. Calls are synchronous
//! and may block (model inference, network).
//!
//! - [`HashingEmbedder`] - offline FNV-1a feature hashing
//! - [`HttpEmbedder`] - OpenAI-compatible embeddings endpoint
//! - [`PrecomputedEmbedder`] - fixed text → vector table
//!
//! # Custom Implementation
//!
//! ```
//! use folio::embedding::TextEmbedder;
//! use folio::error::Result;
//! use folio::vector::Vector;
//!
//! struct LengthEmbedder;
//!
//! impl TextEmbedder for LengthEmbedder {
//!     fn embed(&self, text: &str) -> Result<Vector> {
//!         Ok(Vector::new(vec![text.len() as f32]))
//!     }
//!
//!     fn dimension(&self) -> usize {
//!         1
//!     }
//! }
//!
//! let vectors = LengthEmbedder.embed_batch(&["ab", "abc"]).unwrap();
//! assert_eq!(vectors[1].data, vec![3.0]);
//! ```

pub mod hashing;
pub mod http;
pub mod precomputed;
pub mod text_embedder;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;
pub use precomputed::PrecomputedEmbedder;
pub use text_embedder::TextEmbedder;
