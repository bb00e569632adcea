//! Configuration for the lexical index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, StemmingAnalyzer};
use crate::analysis::token_filter::stop::DEFAULT_MIN_SIZE;
use crate::error::Result;
use crate::lexical::scoring::{QueryOperator, ScoringConfig};

/// Lexical index settings: BM25 parameters, query operator and analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// BM25 term frequency saturation.
    pub k1: f32,
    /// BM25 document length normalization.
    pub b: f32,
    /// How query terms combine.
    pub operator: QueryOperator,
    /// Remove English stop words during analysis.
    pub stop_words: bool,
    /// Tokens shorter than this many characters are dropped.
    pub min_token_len: usize,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        let scoring = ScoringConfig::default();
        LexicalConfig {
            k1: scoring.k1,
            b: scoring.b,
            operator: QueryOperator::default(),
            stop_words: true,
            min_token_len: DEFAULT_MIN_SIZE,
        }
    }
}

impl LexicalConfig {
    /// BM25 parameters.
    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            k1: self.k1,
            b: self.b,
        }
    }

    /// Build the analyzer shared by ingestion and query parsing.
    pub fn analyzer(&self) -> Result<Arc<dyn Analyzer>> {
        let analyzer = if self.stop_words {
            StemmingAnalyzer::with_options(None, self.min_token_len)?
        } else {
            StemmingAnalyzer::with_options(Some(&[]), self.min_token_len)?
        };
        Ok(Arc::new(analyzer))
    }

    /// Validate the BM25 parameters.
    pub fn validate(&self) -> Result<()> {
        self.scoring().validate()
    }
}
