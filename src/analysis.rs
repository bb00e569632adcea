//! Text analysis for the lexical index.
//!
//! Text is turned into index terms by an [`Analyzer`]: a tokenizer splits
//! the text, then token filters lowercase, drop stop words and stem. The
//! same analyzer is applied to documents at ingestion and to query text at
//! search time, so both end up in the same term space.
//!
//! ```text
//! Raw Text → Tokenizer → Lowercase → Stop Words → Stemmer → Terms
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, StemmingAnalyzer};
pub use token::{Token, TokenStream};
pub use token_filter::Filter;
pub use tokenizer::Tokenizer;
