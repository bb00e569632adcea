//! Vector service reached over JSON/HTTP.
//!
//! Endpoints, relative to the base URL:
//!
//! | Operation      | Request                                                             |
//! |----------------|---------------------------------------------------------------------|
//! | `ensure_index` | `POST /indexes` `{"name", "dimension"}` (409 = already exists)      |
//! | `upsert`       | `POST /vectors/upsert` `{"vectors": [{"id", "values", "metadata"}]}` |
//! | `query`        | `POST /query` `{"vector", "topK", "includeMetadata": true}`         |
//! | `delete_all`   | `POST /vectors/delete` `{"deleteAll": true}`                        |
//!
//! The metadata blob is stored under `metadata.metadata`.

use std::time::Duration;

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::remote::service::{RemoteMatch, VectorService};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default index name.
pub const DEFAULT_INDEX_NAME: &str = "document-index";

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlobMetadata {
    metadata: String,
}

#[derive(Debug, Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: BlobMetadata,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    metadata: Option<BlobMetadata>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest {
    delete_all: bool,
}

/// HTTP client for a remote vector store.
#[derive(Debug, Clone)]
pub struct HttpVectorService {
    client: Client,
    base_url: String,
    index_name: String,
    api_key: Option<String>,
}

impl HttpVectorService {
    /// Create a client for the service at `base_url`.
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(HttpVectorService {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            api_key: None,
        })
    }

    /// Use a different index name.
    pub fn with_index_name<S: Into<String>>(mut self, index_name: S) -> Self {
        self.index_name = index_name.into();
        self
    }

    /// Send an `Api-Key` header with every request.
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(api_key) = &self.api_key {
            request = request.header("Api-Key", api_key);
        }
        request
            .send()
            .map_err(|e| FolioError::remote(format!("request to {url} failed: {e}")))
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(FolioError::remote(format!(
            "service answered {status}: {}",
            body.trim()
        )))
    }
}

impl VectorService for HttpVectorService {
    fn name(&self) -> &str {
        "http"
    }

    fn ensure_index(&self, dimension: usize) -> Result<()> {
        let response = self.post(
            "/indexes",
            &CreateIndexRequest {
                name: &self.index_name,
                dimension,
            },
        )?;
        if response.status() == StatusCode::CONFLICT {
            debug!("Reusing remote index {}", self.index_name);
            return Ok(());
        }
        Self::check(response)?;
        debug!("Created remote index {} ({dimension} dimensions)", self.index_name);
        Ok(())
    }

    fn upsert(&self, id: &str, vector: &[f32], metadata_blob: &str) -> Result<()> {
        let body = UpsertRequest {
            vectors: vec![UpsertVector {
                id,
                values: vector,
                metadata: BlobMetadata {
                    metadata: metadata_blob.to_string(),
                },
            }],
        };
        Self::check(self.post("/vectors/upsert", &body)?)?;
        Ok(())
    }

    fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RemoteMatch>> {
        if top_k == 0 {
            return Err(FolioError::invalid_argument("top_k must be at least 1"));
        }
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };
        let response: QueryResponse = Self::check(self.post("/query", &body)?)?
            .json()
            .map_err(|e| FolioError::remote(format!("unreadable query response: {e}")))?;

        response
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.ok_or_else(|| {
                    FolioError::remote(format!("match {} carries no metadata", m.id))
                })?;
                Ok(RemoteMatch {
                    id: m.id,
                    score: m.score,
                    metadata_blob: metadata.metadata,
                })
            })
            .collect()
    }

    fn delete_all(&self) -> Result<()> {
        Self::check(self.post("/vectors/delete", &DeleteRequest { delete_all: true })?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shapes() {
        let query = QueryRequest {
            vector: &[1.0, 0.5],
            top_k: 5,
            include_metadata: true,
        };
        assert_eq!(
            serde_json::to_string(&query).unwrap(),
            r#"{"vector":[1.0,0.5],"topK":5,"includeMetadata":true}"#
        );

        let delete = DeleteRequest { delete_all: true };
        assert_eq!(serde_json::to_string(&delete).unwrap(), r#"{"deleteAll":true}"#);
    }

    #[test]
    fn test_query_response_parsing() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"matches":[{"id":"3","score":0.9,"metadata":{"metadata":"{\"filename\":\"a.txt\"}"}}]}"#,
        )
        .unwrap();
        let metadata = response.matches[0].metadata.as_ref().unwrap();
        assert_eq!(metadata.metadata, r#"{"filename":"a.txt"}"#);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let service = HttpVectorService::new("http://localhost:9000/").unwrap();
        assert_eq!(service.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_unreachable_service() {
        let service = HttpVectorService::new("http://127.0.0.1:1").unwrap();
        assert!(matches!(
            service.ensure_index(4),
            Err(FolioError::RemoteService(_))
        ));
    }
}
