//! Exact vector search over document embeddings.
//!
//! This module provides the similarity index used by the vector backends:
//! a flat (brute-force) store that scans every vector on each query and
//! returns the exact top-k under the configured distance metric.
//!
//! # Module Structure
//!
//! - `core`: Core data structures (vector, distance metric)
//! - `flat`: The flat similarity index

pub mod core;
pub mod flat;

pub use self::core::distance::DistanceMetric;
pub use self::core::vector::Vector;
pub use self::flat::{FlatIndex, IngestReport, RejectedRecord, VectorHit};
