//! Remote vector-service backend.
//!
//! The retrieval façade can delegate vector storage and search to an
//! external service through the narrow [`VectorService`] contract. Record
//! metadata travels as an opaque serialized blob.

pub mod http;
pub mod memory;
pub mod service;

pub use http::HttpVectorService;
pub use memory::InMemoryVectorService;
pub use service::{RemoteMatch, VectorService, WriteMode};
