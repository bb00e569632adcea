//! Flat similarity index for exact (brute-force) nearest-neighbour search.
//!
//! Every query scans all stored vectors, so a query costs `O(N·D)`. Results
//! are exact: the returned hits are the `k` stored records with the smallest
//! distance to the query, ascending, with equal distances ordered by
//! ascending [`DocId`].
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use folio::document::{DocumentRecord, Metadata};
//! use folio::vector::{DistanceMetric, FlatIndex, Vector};
//!
//! let mut index = FlatIndex::new(DistanceMetric::SquaredEuclidean);
//! let records = [("a", [1.0, 0.0]), ("b", [0.0, 1.0]), ("c", [10.0, 10.0])]
//!     .into_iter()
//!     .map(|(id, v)| {
//!         DocumentRecord::new(id, "", Metadata::new(format!("{id}.txt"), 0, Utc::now()))
//!             .with_embedding(Vector::new(v.to_vec()))
//!     });
//! index.ingest(records).unwrap();
//!
//! let hits = index.query(&[1.0, 1.0], 2).unwrap();
//! assert_eq!(hits[0].id.as_str(), "a");
//! assert_eq!(hits[1].id.as_str(), "b");
//! assert_eq!(hits[0].distance, 1.0);
//! ```

use std::cmp::Ordering;

use ahash::AHashMap;
use log::{debug, warn};
use serde::Serialize;

use crate::document::{DocId, DocumentRecord, Metadata};
use crate::error::{FolioError, Result};
use crate::vector::core::distance::DistanceMetric;
use crate::vector::core::vector::Vector;

#[derive(Debug, Clone)]
struct FlatEntry {
    id: DocId,
    vector: Vector,
    metadata: Metadata,
}

/// One result of a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorHit {
    /// Identifier of the matched record.
    pub id: DocId,
    /// Metadata of the matched record.
    pub metadata: Metadata,
    /// Distance to the query under the index metric; smaller is better.
    pub distance: f32,
}

/// A record that was not ingested, with the reason.
#[derive(Debug)]
pub struct RejectedRecord {
    /// Identifier of the rejected record.
    pub id: DocId,
    /// File name from the rejected record's metadata.
    pub filename: String,
    /// Why the record was rejected.
    pub error: FolioError,
}

/// Outcome of ingesting a batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Number of records added or replaced.
    pub ingested: usize,
    /// Records left out of the index.
    pub rejected: Vec<RejectedRecord>,
}

impl IngestReport {
    /// Whether every record of the batch was ingested.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Exact vector index storing `(id, vector, metadata)` triples.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    metric: DistanceMetric,
    configured_dimension: Option<usize>,
    dimension: Option<usize>,
    require_non_empty: bool,
    entries: Vec<FlatEntry>,
    positions: AHashMap<DocId, usize>,
}

impl FlatIndex {
    /// Create an empty index whose dimension is set by the first vector.
    pub fn new(metric: DistanceMetric) -> Self {
        FlatIndex {
            metric,
            configured_dimension: None,
            dimension: None,
            require_non_empty: false,
            entries: Vec::new(),
            positions: AHashMap::new(),
        }
    }

    /// Create an empty index with an explicit dimension.
    pub fn with_dimension(metric: DistanceMetric, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(FolioError::invalid_config("dimension must be positive"));
        }
        let mut index = Self::new(metric);
        index.configured_dimension = Some(dimension);
        index.dimension = Some(dimension);
        Ok(index)
    }

    /// Make [`FlatIndex::ingest`] fail with [`FolioError::EmptyBatch`] on
    /// empty input instead of treating it as a no-op.
    pub fn require_non_empty(mut self, require: bool) -> Self {
        self.require_non_empty = require;
        self
    }

    /// Distance metric used by this index.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Established dimension, if any.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a record with this id is stored.
    pub fn contains(&self, id: &DocId) -> bool {
        self.positions.contains_key(id)
    }

    /// Look up a stored vector and its metadata.
    pub fn get(&self, id: &DocId) -> Option<(&Vector, &Metadata)> {
        self.positions.get(id).map(|&pos| {
            let entry = &self.entries[pos];
            (&entry.vector, &entry.metadata)
        })
    }

    /// Remove every record. An explicitly configured dimension is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.dimension = self.configured_dimension;
    }

    /// Add or replace a single record.
    ///
    /// On error the index is left exactly as it was.
    pub fn insert(&mut self, record: DocumentRecord) -> Result<()> {
        let DocumentRecord {
            id,
            metadata,
            embedding,
            ..
        } = record;

        let vector = embedding.ok_or_else(|| FolioError::MissingEmbedding(id.to_string()))?;
        if vector.dimension() == 0 {
            return Err(FolioError::invalid_argument(format!(
                "record {id} has an empty embedding"
            )));
        }
        if !vector.is_valid() {
            return Err(FolioError::invalid_argument(format!(
                "record {id} has non-finite embedding values"
            )));
        }
        if let Some(expected) = self.dimension {
            vector.validate_dimension(expected)?;
        }

        self.dimension = Some(vector.dimension());
        let entry = FlatEntry {
            id: id.clone(),
            vector,
            metadata,
        };
        match self.positions.get(&id) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.positions.insert(id, self.entries.len());
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Add or replace each record of a batch.
    ///
    /// Records that cannot be stored (wrong dimension, no embedding) are
    /// listed in the report and do not affect the rest of the batch.
    pub fn ingest<I>(&mut self, records: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        let records: Vec<DocumentRecord> = records.into_iter().collect();
        if records.is_empty() && self.require_non_empty {
            return Err(FolioError::EmptyBatch);
        }

        let mut report = IngestReport::default();
        for record in records {
            let id = record.id.clone();
            let filename = record.metadata.filename.clone();
            match self.insert(record) {
                Ok(()) => report.ingested += 1,
                Err(error) => {
                    warn!("Rejected record {id} ({filename}): {error}");
                    report.rejected.push(RejectedRecord {
                        id,
                        filename,
                        error,
                    });
                }
            }
        }

        debug!(
            "Ingested {} vectors ({} rejected), index size {}",
            report.ingested,
            report.rejected.len(),
            self.entries.len()
        );
        Ok(report)
    }

    /// Return the `k` records closest to `query`, ascending by distance.
    ///
    /// Returns every record when fewer than `k` are stored and an empty
    /// sequence when the index is empty.
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<VectorHit>> {
        if k == 0 {
            return Err(FolioError::invalid_argument("k must be positive"));
        }
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(expected) = self.dimension {
            if query.len() != expected {
                return Err(FolioError::dimension_mismatch(expected, query.len()));
            }
        }

        let vectors: Vec<&[f32]> = self
            .entries
            .iter()
            .map(|entry| entry.vector.data.as_slice())
            .collect();
        let distances = self.metric.batch_distance(query, &vectors)?;

        let compare = |a: &usize, b: &usize| -> Ordering {
            distances[*a]
                .total_cmp(&distances[*b])
                .then_with(|| self.entries[*a].id.cmp(&self.entries[*b].id))
        };

        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        if k < order.len() {
            order.select_nth_unstable_by(k - 1, compare);
            order.truncate(k);
        }
        order.sort_unstable_by(compare);

        debug!(
            "Scanned {} vectors for top-{} query",
            self.entries.len(),
            k
        );

        Ok(order
            .into_iter()
            .map(|pos| {
                let entry = &self.entries[pos];
                VectorHit {
                    id: entry.id.clone(),
                    metadata: entry.metadata.clone(),
                    distance: distances[pos],
                }
            })
            .collect())
    }
}
