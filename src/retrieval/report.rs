//! Result and report types returned by the retrieval façade.

use std::path::PathBuf;

use serde::Serialize;

use crate::document::DocId;
use crate::retrieval::config::BackendKind;

/// A file that was not indexed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Base name of the file.
    pub filename: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of a build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    /// Backend the records went into.
    pub backend: BackendKind,
    /// Number of records ingested.
    pub ingested: usize,
    /// Files that failed extraction, embedding or ingestion.
    pub skipped: Vec<SkippedFile>,
    /// Files ignored because their type is not supported.
    pub unsupported: Vec<String>,
}

impl BuildReport {
    pub(crate) fn new(backend: BackendKind) -> Self {
        BuildReport {
            backend,
            ingested: 0,
            skipped: Vec::new(),
            unsupported: Vec::new(),
        }
    }

    pub(crate) fn skip<F: Into<String>, R: Into<String>>(&mut self, filename: F, reason: R) {
        self.skipped.push(SkippedFile {
            filename: filename.into(),
            reason: reason.into(),
        });
    }

    /// True when no supported file was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// How to read [`SearchHit::score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    /// Distance from the query; lower is better.
    Distance,
    /// Keyword relevance; higher is better.
    Relevance,
    /// Service similarity; higher is better.
    Similarity,
}

impl ScoreKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScoreKind::Distance => "distance",
            ScoreKind::Relevance => "relevance",
            ScoreKind::Similarity => "similarity",
        }
    }

    /// True when larger scores mean better matches.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, ScoreKind::Distance)
    }
}

/// One ranked search result, the same shape for every backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Record identifier.
    pub id: DocId,
    /// Base name of the source file.
    pub filename: String,
    /// Distance or score, see `score_kind`.
    pub score: f32,
    /// Meaning of `score`.
    pub score_kind: ScoreKind,
}

/// A file that could not be exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCopy {
    /// Base name of the file.
    pub filename: String,
    /// Why the copy failed.
    pub reason: String,
}

/// Outcome of exporting matched files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    /// Destination directory.
    pub destination: PathBuf,
    /// Files copied, in hit order.
    pub copied: Vec<String>,
    /// Files that could not be copied.
    pub failed: Vec<FailedCopy>,
}
