//! Lexical index: stemmed keyword search ranked by BM25.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use folio::document::{DocumentRecord, Metadata};
//! use folio::lexical::{LexicalConfig, LexicalIndex};
//!
//! let mut index = LexicalIndex::new(&LexicalConfig::default()).unwrap();
//! let records = [("a", "Two invoices are overdue"), ("b", "Invoice #42"), ("c", "receipt")]
//!     .into_iter()
//!     .map(|(id, text)| DocumentRecord::new(id, text, Metadata::new(id, 0, Utc::now())));
//! index.ingest(records).unwrap();
//!
//! let hits = index.query("invoice").unwrap();
//! let ids: Vec<&str> = hits.iter().map(|hit| hit.id.as_str()).collect();
//! assert_eq!(hits.len(), 2);
//! assert!(!ids.contains(&"c"));
//! ```

use std::cmp::Ordering;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use log::debug;
use serde::Serialize;

use crate::analysis::analyzer::Analyzer;
use crate::document::{DocId, DocumentRecord, Metadata};
use crate::error::{FolioError, Result};
use crate::lexical::config::LexicalConfig;
use crate::lexical::inverted_index::InvertedIndex;
use crate::lexical::scoring::{QueryOperator, ScoringConfig};

/// One result of a lexical query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicalHit {
    /// Identifier of the matched record.
    pub id: DocId,
    /// Metadata of the matched record.
    pub metadata: Metadata,
    /// BM25 relevance; larger is better.
    pub score: f32,
}

/// Size of a lexical index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LexicalStats {
    /// Number of stored documents.
    pub documents: usize,
    /// Number of distinct terms.
    pub terms: usize,
    /// Average document length in terms.
    pub average_length: f32,
}

#[derive(Debug, Clone)]
struct StoredDocument {
    id: DocId,
    metadata: Metadata,
}

/// In-memory inverted index over analyzed document text.
pub struct LexicalIndex {
    analyzer: Arc<dyn Analyzer>,
    scoring: ScoringConfig,
    operator: QueryOperator,
    require_non_empty: bool,
    inverted: InvertedIndex,
    documents: Vec<Option<StoredDocument>>,
    slots: AHashMap<DocId, u32>,
}

impl std::fmt::Debug for LexicalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalIndex")
            .field("analyzer", &self.analyzer.name())
            .field("scoring", &self.scoring)
            .field("operator", &self.operator)
            .field("documents", &self.slots.len())
            .finish()
    }
}

impl LexicalIndex {
    /// Create an empty index from configuration.
    pub fn new(config: &LexicalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_analyzer(
            config.analyzer()?,
            config.scoring(),
            config.operator,
        ))
    }

    /// Create an empty index with an explicit analyzer.
    pub fn with_analyzer(
        analyzer: Arc<dyn Analyzer>,
        scoring: ScoringConfig,
        operator: QueryOperator,
    ) -> Self {
        LexicalIndex {
            analyzer,
            scoring,
            operator,
            require_non_empty: false,
            inverted: InvertedIndex::new(),
            documents: Vec::new(),
            slots: AHashMap::new(),
        }
    }

    /// Make empty ingestion batches fail with [`FolioError::EmptyBatch`].
    pub fn require_non_empty(mut self, require: bool) -> Self {
        self.require_non_empty = require;
        self
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no document is stored.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True when a document with this id is stored.
    pub fn contains(&self, id: &DocId) -> bool {
        self.slots.contains_key(id)
    }

    /// Metadata of a stored document.
    pub fn get(&self, id: &DocId) -> Option<&Metadata> {
        let slot = *self.slots.get(id)?;
        self.documents[slot as usize]
            .as_ref()
            .map(|doc| &doc.metadata)
    }

    /// Remove every document.
    pub fn clear(&mut self) {
        self.inverted.clear();
        self.documents.clear();
        self.slots.clear();
    }

    /// Index statistics.
    pub fn stats(&self) -> LexicalStats {
        LexicalStats {
            documents: self.inverted.doc_count(),
            terms: self.inverted.term_count(),
            average_length: self.inverted.average_doc_length(),
        }
    }

    /// Analyze and store records, replacing any stored record with the same
    /// id. Returns the number of records ingested.
    ///
    /// All records are analyzed before the index is touched, so a failing
    /// batch leaves the index unchanged.
    pub fn ingest<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        let analyzed = records
            .into_iter()
            .map(|record| {
                let terms = self.analyzer.terms(&record.text)?;
                Ok((record, terms))
            })
            .collect::<Result<Vec<_>>>()?;

        if analyzed.is_empty() && self.require_non_empty {
            return Err(FolioError::EmptyBatch);
        }

        let count = analyzed.len();
        for (record, terms) in analyzed {
            let slot = match self.slots.get(&record.id) {
                Some(slot) => *slot,
                None => {
                    let slot = self.documents.len() as u32;
                    self.documents.push(None);
                    self.slots.insert(record.id.clone(), slot);
                    slot
                }
            };

            debug!(
                "Indexed {} ({}) with {} terms",
                record.id,
                record.metadata.filename,
                terms.len()
            );
            self.inverted.add_document(slot, &terms);
            self.documents[slot as usize] = Some(StoredDocument {
                id: record.id,
                metadata: record.metadata,
            });
        }

        Ok(count)
    }

    /// Find every document matching the query, best first.
    ///
    /// Hits are ordered by descending score, then ascending id. A query
    /// with no usable terms returns no hits.
    pub fn query(&self, query_text: &str) -> Result<Vec<LexicalHit>> {
        let mut query_terms = self.analyzer.terms(query_text)?;
        let mut seen = AHashSet::new();
        query_terms.retain(|term| seen.insert(term.clone()));

        if query_terms.is_empty() || self.inverted.doc_count() == 0 {
            return Ok(Vec::new());
        }

        let doc_count = self.inverted.doc_count();
        let avg_doc_len = self.inverted.average_doc_length();
        let mut scores: AHashMap<u32, (f32, usize)> = AHashMap::new();

        for term in &query_terms {
            let Some(postings) = self.inverted.postings(term) else {
                continue;
            };
            let idf = self.scoring.idf(doc_count, postings.len());
            for posting in postings {
                let score = self.scoring.term_score(
                    idf,
                    posting.term_frequency,
                    self.inverted.doc_length(posting.doc),
                    avg_doc_len,
                );
                let entry = scores.entry(posting.doc).or_insert((0.0, 0));
                entry.0 += score;
                entry.1 += 1;
            }
        }

        let required = match self.operator {
            QueryOperator::Or => 1,
            QueryOperator::And => query_terms.len(),
        };

        let mut hits: Vec<LexicalHit> = scores
            .into_iter()
            .filter(|(_, (_, matched))| *matched >= required)
            .filter_map(|(slot, (score, _))| {
                self.documents[slot as usize].as_ref().map(|doc| LexicalHit {
                    id: doc.id.clone(),
                    metadata: doc.metadata.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.id.cmp(&b.id))
        });

        debug!(
            "Lexical query {:?} -> terms {:?}, {} hits",
            query_text,
            query_terms,
            hits.len()
        );
        Ok(hits)
    }

    /// Like [`LexicalIndex::query`], keeping at most `k` hits.
    pub fn query_top_k(&self, query_text: &str, k: usize) -> Result<Vec<LexicalHit>> {
        if k == 0 {
            return Err(FolioError::invalid_argument("k must be at least 1"));
        }
        let mut hits = self.query(query_text)?;
        hits.truncate(k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(id: &str, text: &str) -> DocumentRecord {
        DocumentRecord::new(id, text, Metadata::new(format!("{id}.txt"), 0, Utc::now()))
    }

    fn index_with(docs: &[(&str, &str)]) -> LexicalIndex {
        let mut index = LexicalIndex::new(&LexicalConfig::default()).unwrap();
        index
            .ingest(docs.iter().map(|(id, text)| record(id, text)))
            .unwrap();
        index
    }

    fn ids(hits: &[LexicalHit]) -> Vec<&str> {
        hits.iter().map(|hit| hit.id.as_str()).collect()
    }

    #[test]
    fn test_stemmed_match() {
        let index = index_with(&[
            ("a", "Please pay the attached invoices"),
            ("b", "Invoice #42"),
            ("c", "receipt for lunch"),
        ]);

        let hits = index.query("invoice").unwrap();
        let mut matched = ids(&hits);
        matched.sort();
        assert_eq!(matched, vec!["a", "b"]);
        assert!(hits.iter().all(|hit| hit.score > 0.0));
    }

    #[test]
    fn test_ranking_prefers_term_frequency() {
        let index = index_with(&[
            ("a", "invoice overdue"),
            ("b", "invoice invoice invoice overdue"),
            ("c", "nothing relevant here"),
        ]);

        assert_eq!(ids(&index.query("invoice").unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn test_ties_break_by_id() {
        let index = index_with(&[("b", "budget report"), ("a", "budget report")]);
        let hits = index.query("budget").unwrap();

        assert_eq!(ids(&hits), vec!["a", "b"]);
        assert_eq!(hits[0].score, hits[1].score);
    }

    #[test]
    fn test_and_operator() {
        let config = LexicalConfig {
            operator: QueryOperator::And,
            ..LexicalConfig::default()
        };
        let mut index = LexicalIndex::new(&config).unwrap();
        index
            .ingest(vec![
                record("a", "invoice paid"),
                record("b", "invoice pending"),
            ])
            .unwrap();

        assert_eq!(ids(&index.query("paid invoices").unwrap()), vec!["a"]);
    }

    #[test]
    fn test_empty_and_stopword_queries() {
        let index = index_with(&[("a", "the invoice")]);

        assert!(index.query("").unwrap().is_empty());
        assert!(index.query("the and of").unwrap().is_empty());
        assert!(index.query("?!").unwrap().is_empty());
    }

    #[test]
    fn test_query_on_empty_index() {
        let index = LexicalIndex::new(&LexicalConfig::default()).unwrap();
        assert!(index.query("invoice").unwrap().is_empty());
    }

    #[test]
    fn test_reingest_replaces_record() {
        let mut index = index_with(&[("a", "invoice"), ("b", "receipt")]);
        index.ingest(vec![record("a", "receipt copy")]).unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.query("invoice").unwrap().is_empty());
        assert_eq!(ids(&index.query("receipt").unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn test_reingest_unchanged_keeps_ranking() {
        let docs = [
            ("a", "invoice overdue reminder"),
            ("b", "invoice paid"),
            ("c", "overdue library book"),
        ];
        let mut index = index_with(&docs);
        let before = index.query("overdue invoice").unwrap();

        index
            .ingest(docs.iter().map(|(id, text)| record(id, text)))
            .unwrap();
        let after = index.query("overdue invoice").unwrap();

        assert_eq!(before, after);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_query_top_k() {
        let index = index_with(&[("a", "invoice"), ("b", "invoice"), ("c", "invoice")]);

        assert_eq!(index.query_top_k("invoice", 2).unwrap().len(), 2);
        assert!(matches!(
            index.query_top_k("invoice", 0),
            Err(FolioError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_batch() {
        let mut index = LexicalIndex::new(&LexicalConfig::default()).unwrap();
        assert_eq!(index.ingest(Vec::new()).unwrap(), 0);

        let mut strict = LexicalIndex::new(&LexicalConfig::default())
            .unwrap()
            .require_non_empty(true);
        assert!(matches!(
            strict.ingest(Vec::new()),
            Err(FolioError::EmptyBatch)
        ));
    }

    #[test]
    fn test_stats_and_get() {
        let index = index_with(&[("a", "invoice paid"), ("b", "")]);
        let stats = index.stats();

        assert_eq!(stats.documents, 2);
        assert_eq!(stats.terms, 2);
        assert_eq!(stats.average_length, 1.0);
        assert_eq!(index.get(&DocId::from("a")).unwrap().filename, "a.txt");
        assert!(index.get(&DocId::from("z")).is_none());
    }
}
