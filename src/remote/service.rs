//! Vector service contract.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// One match returned by a remote query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMatch {
    /// Identifier the vector was upserted under.
    pub id: String,
    /// Service-defined similarity; larger is better.
    pub score: f32,
    /// Metadata blob exactly as upserted.
    pub metadata_blob: String,
}

/// What a new build does with vectors already stored remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Delete every stored vector before upserting the new build.
    #[default]
    Replace,
    /// Upsert over the stored vectors; ids from earlier builds survive.
    Merge,
}

impl WriteMode {
    /// Parse a mode name (`replace` / `merge`, case-insensitive).
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(WriteMode::Replace),
            "merge" => Ok(WriteMode::Merge),
            _ => Err(FolioError::invalid_config(format!("Unknown write mode: {s}"))),
        }
    }
}

/// A vector store reached over some external boundary.
///
/// All methods block until the service answers.
pub trait VectorService: Send + Sync {
    /// Get the name of this service implementation.
    fn name(&self) -> &str;

    /// Create the index for vectors of `dimension` components if it does
    /// not exist yet; reuse it otherwise.
    fn ensure_index(&self, dimension: usize) -> Result<()>;

    /// Insert or replace one vector.
    fn upsert(&self, id: &str, vector: &[f32], metadata_blob: &str) -> Result<()>;

    /// Return up to `top_k` matches, best first.
    fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RemoteMatch>>;

    /// Remove every stored vector, keeping the index.
    fn delete_all(&self) -> Result<()>;
}
