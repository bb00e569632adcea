//! In-memory inverted index.
//!
//! Maps terms to postings lists (document slot + term frequency). Documents
//! are addressed by dense `u32` slots owned by the lexical index; a slot can
//! be emptied and refilled when a document is replaced.

use ahash::AHashMap;

/// A single entry in a term's postings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Document slot.
    pub doc: u32,
    /// Number of times the term appears in the document.
    pub term_frequency: u32,
}

/// Inverted index mapping terms to postings lists, with the document
/// lengths needed for BM25 length normalization.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: AHashMap<String, Vec<Posting>>,
    doc_lengths: Vec<Option<u32>>,
    doc_count: usize,
    total_doc_length: u64,
}

impl InvertedIndex {
    /// Create an empty inverted index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a document's terms in `slot`, replacing whatever the slot held.
    pub fn add_document(&mut self, slot: u32, terms: &[String]) {
        self.remove_document(slot);

        let idx = slot as usize;
        if idx >= self.doc_lengths.len() {
            self.doc_lengths.resize(idx + 1, None);
        }
        let doc_len = terms.len() as u32;
        self.doc_lengths[idx] = Some(doc_len);
        self.doc_count += 1;
        self.total_doc_length += doc_len as u64;

        let mut frequencies: AHashMap<&str, u32> = AHashMap::new();
        for term in terms {
            *frequencies.entry(term.as_str()).or_insert(0) += 1;
        }

        for (term, term_frequency) in frequencies {
            self.postings
                .entry(term.to_string())
                .or_default()
                .push(Posting {
                    doc: slot,
                    term_frequency,
                });
        }
    }

    /// Remove the document in `slot`. Removing an empty slot is a no-op.
    pub fn remove_document(&mut self, slot: u32) {
        let Some(doc_len) = self
            .doc_lengths
            .get_mut(slot as usize)
            .and_then(Option::take)
        else {
            return;
        };

        self.doc_count -= 1;
        self.total_doc_length -= doc_len as u64;
        self.postings.retain(|_, postings| {
            postings.retain(|p| p.doc != slot);
            !postings.is_empty()
        });
    }

    /// Postings for a term, if any document contains it.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Length (in terms) of the document in `slot`.
    pub fn doc_length(&self, slot: u32) -> u32 {
        self.doc_lengths
            .get(slot as usize)
            .copied()
            .flatten()
            .unwrap_or(0)
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Average document length across all indexed documents.
    pub fn average_doc_length(&self) -> f32 {
        if self.doc_count == 0 {
            return 0.0;
        }
        self.total_doc_length as f32 / self.doc_count as f32
    }

    /// Remove every document.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
