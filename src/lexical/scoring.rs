//! BM25 relevance scoring.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// K1 parameter for BM25 (term frequency saturation).
    pub k1: f32,

    /// B parameter for BM25 (document length normalization).
    pub b: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig { k1: 1.2, b: 0.75 }
    }
}

impl ScoringConfig {
    /// Check the parameters: `k1` must be non-negative and `b` in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(FolioError::invalid_config(format!(
                "k1 must be a non-negative number, got {}",
                self.k1
            )));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(FolioError::invalid_config(format!(
                "b must be between 0 and 1, got {}",
                self.b
            )));
        }
        Ok(())
    }

    /// Inverse document frequency of a term found in `doc_freq` of
    /// `doc_count` documents.
    ///
    /// `ln(1 + (N - df + 0.5) / (df + 0.5))` never goes negative, so a term
    /// present in most documents still adds to the score.
    pub fn idf(&self, doc_count: usize, doc_freq: usize) -> f32 {
        let n = doc_count as f32;
        let df = doc_freq as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// BM25 contribution of one term to one document.
    pub fn term_score(&self, idf: f32, term_freq: u32, doc_len: u32, avg_doc_len: f32) -> f32 {
        let tf = term_freq as f32;
        let norm = if avg_doc_len > 0.0 {
            1.0 - self.b + self.b * doc_len as f32 / avg_doc_len
        } else {
            1.0
        };
        idf * (tf * (self.k1 + 1.0)) / (tf + self.k1 * norm)
    }
}

/// How multiple query terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOperator {
    /// A document matches if it contains any query term.
    #[default]
    Or,
    /// A document matches only if it contains every query term.
    And,
}

impl QueryOperator {
    /// Parse an operator name (`or` / `and`, case-insensitive).
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "or" => Ok(QueryOperator::Or),
            "and" => Ok(QueryOperator::And),
            _ => Err(FolioError::invalid_config(format!(
                "Unknown query operator: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idf_is_positive_for_common_terms() {
        let config = ScoringConfig::default();
        assert!(config.idf(3, 3) > 0.0);
        assert!(config.idf(3, 2) > 0.0);
        assert!(config.idf(3, 1) > config.idf(3, 2));
    }

    #[test]
    fn test_term_score_saturates() {
        let config = ScoringConfig::default();
        let idf = config.idf(10, 1);
        let once = config.term_score(idf, 1, 10, 10.0);
        let twice = config.term_score(idf, 2, 10, 10.0);
        let many = config.term_score(idf, 100, 10, 10.0);

        assert!(twice > once);
        assert!(many < idf * (config.k1 + 1.0));
    }

    #[test]
    fn test_shorter_documents_score_higher() {
        let config = ScoringConfig::default();
        let idf = config.idf(10, 1);
        assert!(config.term_score(idf, 1, 5, 10.0) > config.term_score(idf, 1, 20, 10.0));
    }

    #[test]
    fn test_validate() {
        assert!(ScoringConfig::default().validate().is_ok());
        assert!(ScoringConfig { k1: -1.0, b: 0.5 }.validate().is_err());
        assert!(ScoringConfig { k1: 1.2, b: 1.5 }.validate().is_err());
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(QueryOperator::parse_str("AND").unwrap(), QueryOperator::And);
        assert_eq!(QueryOperator::parse_str("or").unwrap(), QueryOperator::Or);
        assert!(QueryOperator::parse_str("xor").is_err());
    }
}
