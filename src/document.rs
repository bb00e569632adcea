//! Document records: the unit of data flowing through the retrieval pipeline.
//!
//! A [`DocumentRecord`] is produced by the extraction (and optionally
//! embedding) adapters, handed to exactly one index, and never mutated
//! afterwards except by full re-ingestion under the same [`DocId`].

pub mod metadata;
pub mod record;

pub use metadata::{Metadata, MetadataValue};
pub use record::{DocId, DocumentRecord};
