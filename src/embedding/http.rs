//! Embedder backed by an OpenAI-compatible embeddings endpoint.
//!
//! The request body is `{"input": [...], "model": ...}` and the response is
//! read from `data[i].embedding`, in input order.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{FolioError, Result};
use crate::vector::core::vector::Vector;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Request structure for the embeddings endpoint.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    /// Input texts to embed (batch).
    input: &'a [&'a str],
    /// Optional model identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Response structure from the embeddings endpoint.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Remote text embedder speaking the OpenAI embeddings wire format.
///
/// # Examples
///
/// ```no_run
/// use folio::embedding::{HttpEmbedder, TextEmbedder};
///
/// # fn example() -> folio::error::Result<()> {
/// let embedder = HttpEmbedder::new("http://localhost:8080/v1/embeddings", 384)?
///     .with_model("all-MiniLM-L6-v2");
/// let vector = embedder.embed("Rust is awesome!")?;
/// assert_eq!(vector.dimension(), 384);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    model: Option<String>,
    api_key: Option<String>,
    dimension: usize,
}

impl HttpEmbedder {
    /// Create an embedder posting to `url` and expecting vectors of
    /// `dimension` components.
    pub fn new<S: Into<String>>(url: S, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(FolioError::invalid_config(
                "embedding dimension must be at least 1",
            ));
        }
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(HttpEmbedder {
            client,
            url: url.into(),
            model: None,
            api_key: None,
            dimension,
        })
    }

    /// Send a model name with every request.
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Send a bearer token with every request.
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TextEmbedder for HttpEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| FolioError::embedding("embedding service returned no vectors"))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = EmbeddingRequest {
            input: texts,
            model: self.model.as_deref(),
        };
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        debug!("Requesting {} embeddings from {}", texts.len(), self.url);
        let response: EmbeddingResponse = request
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|e| FolioError::embedding(format!("request to {} failed: {e}", self.url)))?;

        if response.data.len() != texts.len() {
            return Err(FolioError::embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        response
            .data
            .into_iter()
            .map(|item| {
                let vector = Vector::new(item.embedding);
                vector.validate_dimension(self.dimension)?;
                Ok(vector)
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "http"
    }
}
