//! Retrieval façade over the similarity, lexical and remote backends.
//!
//! A [`Retriever`] turns a folder of files into a searchable index, answers
//! free-text queries with one [`SearchHit`] shape for every backend, and
//! copies matched files to a destination folder.

mod backend;
pub mod config;
pub mod export;
pub mod report;
pub mod retriever;

pub use config::{BackendKind, DEFAULT_TOP_K, RetrievalConfig, RetrievalConfigBuilder};
pub use report::{BuildReport, ExportReport, FailedCopy, ScoreKind, SearchHit, SkippedFile};
pub use retriever::{HandleState, Retriever};
