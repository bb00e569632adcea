//! Lexical (keyword) search over analyzed document text.
//!
//! Documents are analyzed into stemmed terms and stored in an in-memory
//! inverted index; queries are analyzed with the same analyzer and ranked
//! with BM25.

pub mod config;
pub mod index;
pub mod inverted_index;
pub mod scoring;

pub use config::LexicalConfig;
pub use index::{LexicalHit, LexicalIndex, LexicalStats};
pub use scoring::{QueryOperator, ScoringConfig};
