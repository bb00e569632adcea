//! Analyzers that combine a tokenizer with a chain of filters.
//!
//! - [`PipelineAnalyzer`] - custom tokenizer + filter chains
//! - [`StemmingAnalyzer`] - word tokenizer, lowercase, English stop words, Porter stemming
//!
//! # Examples
//!
//! ```
//! use folio::analysis::analyzer::{Analyzer, StemmingAnalyzer};
//!
//! let analyzer = StemmingAnalyzer::new().unwrap();
//! let terms = analyzer.terms("The invoices were running late").unwrap();
//!
//! assert_eq!(terms, vec!["invoic", "were", "run", "late"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

pub mod pipeline;
pub mod stemming;

pub use pipeline::PipelineAnalyzer;
pub use stemming::StemmingAnalyzer;

/// Trait for analyzers that convert text into processed tokens.
///
/// The same analyzer must be used for documents and queries of one index.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Analyze the text and keep only the term strings, in order.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}
