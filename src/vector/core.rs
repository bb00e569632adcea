//! Core data structures for vector search.
//!
//! This module contains the vector representation and the distance metrics
//! used by the similarity index.

pub mod distance;
pub mod vector;
