//! Stop filter implementation.
//!
//! Removes common words (stop words) and tokens shorter than a minimum
//! length, neither of which helps keyword relevance.
//!
//! # Examples
//!
//! ```
//! use folio::analysis::token_filter::Filter;
//! use folio::analysis::token_filter::stop::StopFilter;
//! use folio::analysis::token::Token;
//!
//! let filter = StopFilter::new();
//! let tokens = vec![
//!     Token::new("the", 0),
//!     Token::new("quick", 1),
//!     Token::new("x", 2),
//! ];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "quick");
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// Default minimum token length, in characters.
pub const DEFAULT_MIN_SIZE: usize = 2;

/// A filter that removes stop words and short tokens from the token stream.
///
/// Matching is exact, so this filter belongs after lowercasing.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: HashSet<String>,
    min_size: usize,
}

impl StopFilter {
    /// Create a stop filter with the default English list and minimum size.
    pub fn new() -> Self {
        StopFilter {
            stop_words: DEFAULT_ENGLISH_STOP_WORDS_SET.clone(),
            min_size: DEFAULT_MIN_SIZE,
        }
    }

    /// Create a stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: words.into_iter().map(Into::into).collect(),
            min_size: DEFAULT_MIN_SIZE,
        }
    }

    /// Set the minimum token length; shorter tokens are removed.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Check whether a word is on the stop list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .filter(|token| {
                !token.is_stopped()
                    && token.text.chars().count() >= self.min_size
                    && !self.stop_words.contains(&token.text)
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn run(filter: &StopFilter, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_default_stop_words() {
        let filter = StopFilter::new();
        assert_eq!(
            run(&filter, &["this", "is", "an", "invoice", "for", "42"]),
            vec!["invoice", "42"]
        );
    }

    #[test]
    fn test_custom_words_and_min_size() {
        let filter = StopFilter::from_words(["foo"]).with_min_size(1);
        assert_eq!(run(&filter, &["foo", "x", "the"]), vec!["x", "the"]);
    }

    #[test]
    fn test_positions_are_kept() {
        let filter = StopFilter::new();
        let tokens = vec![Token::new("the", 0), Token::new("receipt", 1)];
        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();
        assert_eq!(result[0].position, 1);
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stop");
    }
}
