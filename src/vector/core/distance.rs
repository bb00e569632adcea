//! Distance metrics for vector similarity calculation.
//!
//! Every metric here is a *distance*: smaller means more similar, so the
//! flat index always sorts ascending regardless of the metric in use.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Below this many vectors a batch is scored sequentially.
const PARALLEL_THRESHOLD: usize = 256;

/// Distance metrics for vector similarity calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Squared Euclidean (L2) distance, without the square root.
    #[default]
    SquaredEuclidean,
    /// Cosine distance (1 - cosine similarity).
    Cosine,
}

impl DistanceMetric {
    /// Calculate the distance between two vectors using this metric.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(FolioError::dimension_mismatch(a.len(), b.len()));
        }

        let result = match self {
            DistanceMetric::SquaredEuclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>(),
            DistanceMetric::Cosine => {
                let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
                let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

                if norm_a == 0.0 || norm_b == 0.0 {
                    1.0 // Maximum distance for zero vectors
                } else {
                    1.0 - (dot_product / (norm_a * norm_b))
                }
            }
        };

        Ok(result)
    }

    /// Get the name of this distance metric.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::SquaredEuclidean => "squared_euclidean",
            DistanceMetric::Cosine => "cosine",
        }
    }

    /// Parse a distance metric from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "squared_euclidean" | "squared-euclidean" | "l2" | "euclidean" => {
                Ok(DistanceMetric::SquaredEuclidean)
            }
            "cosine" => Ok(DistanceMetric::Cosine),
            _ => Err(FolioError::invalid_config(format!(
                "Unknown distance metric: {s}"
            ))),
        }
    }

    /// Calculate distance between a query vector and multiple vectors.
    ///
    /// Large batches are scored on the rayon pool; the output order always
    /// matches the input order.
    pub fn batch_distance(&self, query: &[f32], vectors: &[&[f32]]) -> Result<Vec<f32>> {
        if vectors.len() < PARALLEL_THRESHOLD {
            return vectors
                .iter()
                .map(|v| self.distance(query, v))
                .collect::<Result<Vec<_>>>();
        }

        vectors
            .par_iter()
            .map(|v| self.distance(query, v))
            .collect::<Result<Vec<_>>>()
    }
}
