//! Stemming analyzer used by the lexical index.
//!
//! # Pipeline
//!
//! 1. RegexTokenizer (words, keeping dotted forms such as `v1.2` together)
//! 2. LowercaseFilter
//! 3. StopFilter (English stop words, tokens shorter than two characters)
//! 4. StemFilter (Porter)
//!
//! # Examples
//!
//! ```
//! use folio::analysis::analyzer::{Analyzer, StemmingAnalyzer};
//!
//! let analyzer = StemmingAnalyzer::new().unwrap();
//! assert_eq!(analyzer.terms("Invoices").unwrap(), analyzer.terms("invoice").unwrap());
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stem::StemFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// Tokenize, lowercase, drop stop words and short tokens, then stem.
#[derive(Clone, Debug)]
pub struct StemmingAnalyzer {
    inner: PipelineAnalyzer,
}

impl StemmingAnalyzer {
    /// Create a stemming analyzer with the default English stop words and a
    /// minimum token length of two.
    pub fn new() -> Result<Self> {
        Self::build(StopFilter::new())
    }

    /// Create a stemming analyzer with a custom stop list and minimum token
    /// length. `None` keeps the default English list; an empty list
    /// disables stop word removal.
    pub fn with_options(stop_words: Option<&[String]>, min_token_len: usize) -> Result<Self> {
        let stop_filter = match stop_words {
            Some(words) => StopFilter::from_words(words.iter().cloned()),
            None => StopFilter::new(),
        };
        Self::build(stop_filter.with_min_size(min_token_len))
    }

    fn build(stop_filter: StopFilter) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(stop_filter))
            .add_filter(Arc::new(StemFilter::new()))
            .with_name("stemming");

        Ok(StemmingAnalyzer { inner: analyzer })
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Analyzer for StemmingAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "stemming"
    }
}
