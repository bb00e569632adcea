//! Configuration for the retrieval façade.
//!
//! # Examples
//!
//! ```
//! use folio::retrieval::{BackendKind, RetrievalConfig};
//! use folio::vector::DistanceMetric;
//!
//! let config = RetrievalConfig::builder()
//!     .backend(BackendKind::Similarity)
//!     .metric(DistanceMetric::Cosine)
//!     .top_k(3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.top_k, 3);
//! assert!(RetrievalConfig::builder().top_k(0).build().is_err());
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::lexical::config::LexicalConfig;
use crate::remote::service::WriteMode;
use crate::vector::core::distance::DistanceMetric;

/// Default number of hits returned by a search.
pub const DEFAULT_TOP_K: usize = 5;

/// Which index answers queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Exact nearest-neighbour search over embeddings.
    Similarity,
    /// BM25 keyword search over stemmed text.
    #[default]
    Lexical,
    /// A remote vector service.
    Remote,
}

impl BackendKind {
    /// Parse a backend name (case-insensitive). `vector` is accepted for
    /// `similarity`.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "similarity" | "vector" => Ok(BackendKind::Similarity),
            "lexical" => Ok(BackendKind::Lexical),
            "remote" => Ok(BackendKind::Remote),
            _ => Err(FolioError::invalid_config(format!("Unknown backend: {s}"))),
        }
    }

    /// Lowercase name of the backend.
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Similarity => "similarity",
            BackendKind::Lexical => "lexical",
            BackendKind::Remote => "remote",
        }
    }

    /// True for the backends that need an embedder.
    pub fn needs_embedder(&self) -> bool {
        matches!(self, BackendKind::Similarity | BackendKind::Remote)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings of a [`Retriever`](crate::retrieval::Retriever).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Backend used by `build` and `search`.
    pub backend: BackendKind,
    /// Hits returned when the caller does not ask for a number.
    pub top_k: usize,
    /// Distance metric of the similarity backend.
    pub metric: DistanceMetric,
    /// Explicit embedding dimension; otherwise set by the first vector.
    pub dimension: Option<usize>,
    /// Fail builds that produce no records.
    pub require_non_empty: bool,
    /// Lexical backend settings.
    pub lexical: LexicalConfig,
    /// What a rebuild does with vectors stored by the remote backend.
    pub remote_write_mode: WriteMode,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        RetrievalConfig {
            backend: BackendKind::default(),
            top_k: DEFAULT_TOP_K,
            metric: DistanceMetric::default(),
            dimension: None,
            require_non_empty: false,
            lexical: LexicalConfig::default(),
            remote_write_mode: WriteMode::default(),
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder for RetrievalConfig.
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::new()
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            FolioError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: RetrievalConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(FolioError::invalid_config("top_k must be at least 1"));
        }
        if self.dimension == Some(0) {
            return Err(FolioError::invalid_config("dimension must be at least 1"));
        }
        self.lexical.validate()
    }
}

/// Builder for RetrievalConfig.
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend.
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the default number of hits.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Set the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Fix the embedding dimension.
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.config.dimension = Some(dimension);
        self
    }

    /// Fail builds that produce no records.
    pub fn require_non_empty(mut self, require: bool) -> Self {
        self.config.require_non_empty = require;
        self
    }

    /// Set the lexical backend settings.
    pub fn lexical(mut self, lexical: LexicalConfig) -> Self {
        self.config.lexical = lexical;
        self
    }

    /// Set the remote write mode.
    pub fn remote_write_mode(mut self, mode: WriteMode) -> Self {
        self.config.remote_write_mode = mode;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<RetrievalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::lexical::scoring::QueryOperator;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.backend, BackendKind::Lexical);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.metric, DistanceMetric::SquaredEuclidean);
        assert_eq!(config.remote_write_mode, WriteMode::Replace);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(RetrievalConfig::builder().dimension(0).build().is_err());

        let lexical = LexicalConfig {
            b: 2.0,
            ..LexicalConfig::default()
        };
        assert!(matches!(
            RetrievalConfig::builder().lexical(lexical).build(),
            Err(FolioError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("folio.json");
        fs::write(
            &path,
            r#"{"backend": "remote", "top_k": 2, "lexical": {"operator": "and"}, "remote_write_mode": "merge"}"#,
        )
        .unwrap();

        let config = RetrievalConfig::from_json_file(&path).unwrap();
        assert_eq!(config.backend, BackendKind::Remote);
        assert_eq!(config.top_k, 2);
        assert_eq!(config.lexical.operator, QueryOperator::And);
        assert_eq!(config.remote_write_mode, WriteMode::Merge);
        assert_eq!(config.metric, DistanceMetric::SquaredEuclidean);
    }

    #[test]
    fn test_json_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(RetrievalConfig::from_json_file(&dir.path().join("none.json")).is_err());

        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"top_k": 0}"#).unwrap();
        assert!(matches!(
            RetrievalConfig::from_json_file(&path),
            Err(FolioError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(BackendKind::parse_str("Vector").unwrap(), BackendKind::Similarity);
        assert_eq!(BackendKind::parse_str("remote").unwrap(), BackendKind::Remote);
        assert!(BackendKind::parse_str("sql").is_err());
        assert!(BackendKind::Remote.needs_embedder());
        assert!(!BackendKind::Lexical.needs_embedder());
    }
}
