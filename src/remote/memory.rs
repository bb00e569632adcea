//! Process-local vector service.
//!
//! Behaves like a remote store (create-if-absent index, upsert by id,
//! similarity scores where larger is better) without leaving the process.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::error::{FolioError, Result};
use crate::remote::service::{RemoteMatch, VectorService};
use crate::vector::core::distance::DistanceMetric;

#[derive(Debug, Default)]
struct MemoryState {
    dimension: Option<usize>,
    vectors: BTreeMap<String, (Vec<f32>, String)>,
}

/// In-memory [`VectorService`]. Scores are `1 / (1 + squared distance)`.
#[derive(Debug, Default)]
pub struct InMemoryVectorService {
    state: Mutex<MemoryState>,
}

impl InMemoryVectorService {
    /// Create a service with no index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.state.lock().vectors.len()
    }

    /// True when no vector is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of the index, once created.
    pub fn dimension(&self) -> Option<usize> {
        self.state.lock().dimension
    }

    fn check_dimension(state: &MemoryState, vector: &[f32]) -> Result<()> {
        match state.dimension {
            None => Err(FolioError::remote("index has not been created")),
            Some(dimension) if dimension != vector.len() => Err(FolioError::remote(format!(
                "vector dimension {} does not match index dimension {dimension}",
                vector.len()
            ))),
            Some(_) => Ok(()),
        }
    }
}

impl VectorService for InMemoryVectorService {
    fn name(&self) -> &str {
        "memory"
    }

    fn ensure_index(&self, dimension: usize) -> Result<()> {
        let mut state = self.state.lock();
        match state.dimension {
            None => {
                state.dimension = Some(dimension);
                Ok(())
            }
            Some(existing) if existing == dimension => Ok(()),
            Some(existing) => Err(FolioError::remote(format!(
                "index exists with dimension {existing}, requested {dimension}"
            ))),
        }
    }

    fn upsert(&self, id: &str, vector: &[f32], metadata_blob: &str) -> Result<()> {
        let mut state = self.state.lock();
        Self::check_dimension(&state, vector)?;
        state
            .vectors
            .insert(id.to_string(), (vector.to_vec(), metadata_blob.to_string()));
        Ok(())
    }

    fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RemoteMatch>> {
        if top_k == 0 {
            return Err(FolioError::invalid_argument("top_k must be at least 1"));
        }
        let state = self.state.lock();
        if state.vectors.is_empty() {
            return Ok(Vec::new());
        }
        Self::check_dimension(&state, vector)?;

        let metric = DistanceMetric::SquaredEuclidean;
        let mut matches = state
            .vectors
            .iter()
            .map(|(id, (stored, blob))| {
                let distance = metric.distance(vector, stored)?;
                Ok(RemoteMatch {
                    id: id.clone(),
                    score: 1.0 / (1.0 + distance),
                    metadata_blob: blob.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(top_k);
        Ok(matches)
    }

    fn delete_all(&self) -> Result<()> {
        self.state.lock().vectors.clear();
        Ok(())
    }
}
