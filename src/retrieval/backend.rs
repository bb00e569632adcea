//! The index a built handle holds, one variant per backend.

use std::sync::Arc;

use log::debug;

use crate::document::{DocId, Metadata};
use crate::embedding::TextEmbedder;
use crate::error::{FolioError, Result};
use crate::lexical::LexicalIndex;
use crate::remote::VectorService;
use crate::retrieval::config::BackendKind;
use crate::retrieval::report::{ScoreKind, SearchHit};
use crate::vector::{FlatIndex, Vector};

/// Vectors held by a remote service on behalf of a handle.
pub(crate) struct RemoteCollection {
    pub(crate) service: Arc<dyn VectorService>,
    pub(crate) dimension: usize,
    pub(crate) upserted: usize,
}

pub(crate) enum Backend {
    Similarity(FlatIndex),
    Lexical(LexicalIndex),
    Remote(RemoteCollection),
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .finish()
    }
}

impl Backend {
    pub(crate) fn kind(&self) -> BackendKind {
        match self {
            Backend::Similarity(_) => BackendKind::Similarity,
            Backend::Lexical(_) => BackendKind::Lexical,
            Backend::Remote(_) => BackendKind::Remote,
        }
    }

    /// Records held locally, or upserted by the last build for remote.
    pub(crate) fn len(&self) -> usize {
        match self {
            Backend::Similarity(index) => index.len(),
            Backend::Lexical(index) => index.len(),
            Backend::Remote(collection) => collection.upserted,
        }
    }

    /// Answer `query` with at most `k` hits.
    pub(crate) fn search(
        &self,
        query: &str,
        k: usize,
        embedder: Option<&dyn TextEmbedder>,
    ) -> Result<Vec<SearchHit>> {
        match self {
            Backend::Lexical(index) => Ok(index
                .query_top_k(query, k)?
                .into_iter()
                .map(|hit| SearchHit {
                    filename: hit.metadata.filename,
                    id: hit.id,
                    score: hit.score,
                    score_kind: ScoreKind::Relevance,
                })
                .collect()),
            Backend::Similarity(index) => {
                let vector = embed_query(embedder, query)?;
                Ok(index
                    .query(&vector.data, k)?
                    .into_iter()
                    .map(|hit| SearchHit {
                        filename: hit.metadata.filename,
                        id: hit.id,
                        score: hit.distance,
                        score_kind: ScoreKind::Distance,
                    })
                    .collect())
            }
            Backend::Remote(collection) => {
                let vector = embed_query(embedder, query)?;
                vector.validate_dimension(collection.dimension)?;

                let matches = collection.service.query(&vector.data, k)?;
                debug!(
                    "{} returned {} matches",
                    collection.service.name(),
                    matches.len()
                );
                matches
                    .into_iter()
                    .map(|m| {
                        let metadata = Metadata::from_blob(&m.metadata_blob).map_err(|e| {
                            FolioError::remote(format!(
                                "match {} has unreadable metadata: {e}",
                                m.id
                            ))
                        })?;
                        Ok(SearchHit {
                            id: DocId::new(m.id),
                            filename: metadata.filename,
                            score: m.score,
                            score_kind: ScoreKind::Similarity,
                        })
                    })
                    .collect()
            }
        }
    }
}

fn embed_query(embedder: Option<&dyn TextEmbedder>, query: &str) -> Result<Vector> {
    let embedder = embedder
        .ok_or_else(|| FolioError::invalid_config("vector search requires an embedder"))?;
    embedder.embed(query)
}
