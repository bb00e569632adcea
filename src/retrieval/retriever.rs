//! The retrieval façade: build an index from a folder, search it, export
//! the matching files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ahash::{AHashMap, AHashSet};
use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::Serialize;

use crate::document::{DocId, DocumentRecord};
use crate::embedding::TextEmbedder;
use crate::error::{FolioError, Result};
use crate::extraction::{ExtractionAdapter, ExtractorRegistry, FileKind};
use crate::lexical::LexicalIndex;
use crate::remote::{VectorService, WriteMode};
use crate::retrieval::backend::{Backend, RemoteCollection};
use crate::retrieval::config::{BackendKind, RetrievalConfig};
use crate::retrieval::export::copy_with_metadata;
use crate::retrieval::report::{BuildReport, ExportReport, FailedCopy, SearchHit};
use crate::vector::FlatIndex;

/// Lifecycle of the index handle owned by a [`Retriever`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleState {
    /// Nothing built yet.
    Uninitialized,
    /// Built and not searched since.
    Built,
    /// Built and searched at least once.
    Queryable,
}

#[derive(Debug, Default)]
struct Handle {
    backend: Option<Backend>,
    source_dir: Option<PathBuf>,
    sources: AHashMap<String, PathBuf>,
    queried: AtomicBool,
}

/// Single entry point for building, searching and exporting.
///
/// The handle sits behind a read/write lock: [`Retriever::build`] is the
/// only writer, searches and exports share read access.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use folio::retrieval::{RetrievalConfig, Retriever};
///
/// let retriever = Retriever::new(RetrievalConfig::default()).unwrap();
/// let report = retriever.build(Path::new("./documents")).unwrap();
/// println!("indexed {} files", report.ingested);
///
/// for hit in retriever.search("invoice").unwrap() {
///     println!("{} {}", hit.filename, hit.score);
/// }
/// ```
pub struct Retriever {
    config: RetrievalConfig,
    extractor: Arc<dyn ExtractionAdapter>,
    embedder: Option<Arc<dyn TextEmbedder>>,
    remote: Option<Arc<dyn VectorService>>,
    handle: RwLock<Handle>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("config", &self.config)
            .field("embedder", &self.embedder.as_ref().map(|e| e.name().to_string()))
            .field("remote", &self.remote.as_ref().map(|r| r.name().to_string()))
            .field("state", &self.state())
            .finish()
    }
}

impl Retriever {
    /// Create a retriever with the default extractor registry.
    pub fn new(config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Retriever {
            config,
            extractor: Arc::new(ExtractorRegistry::default()),
            embedder: None,
            remote: None,
            handle: RwLock::new(Handle::default()),
        })
    }

    /// Replace the extraction adapter.
    pub fn with_extractor(mut self, extractor: Arc<dyn ExtractionAdapter>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set the embedder used by the vector backends.
    pub fn with_embedder(mut self, embedder: Arc<dyn TextEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the service used by the remote backend.
    pub fn with_remote(mut self, remote: Arc<dyn VectorService>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Current state of the handle.
    pub fn state(&self) -> HandleState {
        let handle = self.handle.read();
        match handle.backend {
            None => HandleState::Uninitialized,
            Some(_) if handle.queried.load(Ordering::Relaxed) => HandleState::Queryable,
            Some(_) => HandleState::Built,
        }
    }

    /// Number of records in the built index.
    pub fn len(&self) -> usize {
        self.handle.read().backend.as_ref().map_or(0, Backend::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Directory of the last [`Retriever::build`], if any.
    pub fn source_dir(&self) -> Option<PathBuf> {
        self.handle.read().source_dir.clone()
    }

    /// Index every regular file directly inside `source_dir`, in file name
    /// order, replacing whatever the handle held before.
    pub fn build(&self, source_dir: &Path) -> Result<BuildReport> {
        if !source_dir.is_dir() {
            return Err(FolioError::invalid_config(format!(
                "source directory {} does not exist",
                source_dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(source_dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        self.build_inner(Some(source_dir.to_path_buf()), &paths)
    }

    /// Index an explicit list of files in the given order.
    pub fn build_files(&self, paths: &[PathBuf]) -> Result<BuildReport> {
        self.build_inner(None, paths)
    }

    fn build_inner(&self, source_dir: Option<PathBuf>, paths: &[PathBuf]) -> Result<BuildReport> {
        let backend_kind = self.config.backend;
        let embedder = self.required_embedder()?;
        if backend_kind == BackendKind::Remote && self.remote.is_none() {
            return Err(missing_service());
        }

        let mut handle = self.handle.write();
        info!(
            "Building {backend_kind} index over {} files{}",
            paths.len(),
            source_dir
                .as_ref()
                .map(|dir| format!(" in {}", dir.display()))
                .unwrap_or_default()
        );

        let mut report = BuildReport::new(backend_kind);
        let mut records = Vec::new();
        let mut sources = AHashMap::new();

        for path in paths {
            let filename = display_name(path);
            match self.extractor.classify(path) {
                FileKind::Unsupported => {
                    debug!("Skipping unsupported file {filename}");
                    report.unsupported.push(filename);
                    continue;
                }
                kind => debug!("Extracting {filename} as {kind}"),
            }
            if sources.contains_key(&filename) {
                warn!("Skipping {}: duplicate file name", path.display());
                report.skip(filename, "duplicate file name in this build");
                continue;
            }

            match self.extractor.extract(path) {
                Ok(extracted) => {
                    let id = DocId::sequential(records.len() + 1);
                    sources.insert(extracted.metadata.filename.clone(), path.clone());
                    records.push(DocumentRecord::new(id, extracted.text, extracted.metadata));
                }
                Err(e) => {
                    warn!("Skipping {filename}: {e}");
                    report.skip(filename, e.reason());
                }
            }
        }

        let backend = match backend_kind {
            BackendKind::Lexical => {
                let mut index = LexicalIndex::new(&self.config.lexical)?
                    .require_non_empty(self.config.require_non_empty);
                report.ingested = index.ingest(records)?;
                Backend::Lexical(index)
            }
            BackendKind::Similarity => {
                let embedder = embedder.ok_or_else(missing_embedder)?;
                let records = embed_records(embedder, records, &mut report);
                let mut index = match self.config.dimension {
                    Some(dimension) => FlatIndex::with_dimension(self.config.metric, dimension)?,
                    None => FlatIndex::new(self.config.metric),
                }
                .require_non_empty(self.config.require_non_empty);

                let ingest = index.ingest(records)?;
                report.ingested = ingest.ingested;
                for rejected in ingest.rejected {
                    report.skip(rejected.filename, rejected.error.reason());
                }
                Backend::Similarity(index)
            }
            BackendKind::Remote => {
                let embedder = embedder.ok_or_else(missing_embedder)?;
                let records = embed_records(embedder, records, &mut report);
                if records.is_empty() && self.config.require_non_empty {
                    return Err(FolioError::EmptyBatch);
                }

                // The stored vectors are only touched once the batch is ready.
                let mut collection = self.prepare_remote(embedder)?;
                for record in records {
                    match upsert_record(&collection, &record) {
                        Ok(()) => collection.upserted += 1,
                        Err(e) => {
                            warn!("Failed to upsert {}: {e}", record.filename());
                            report.skip(record.filename(), e.reason());
                        }
                    }
                }
                report.ingested = collection.upserted;
                Backend::Remote(collection)
            }
        };

        info!(
            "Built {backend_kind} index: {} ingested, {} skipped, {} unsupported",
            report.ingested,
            report.skipped.len(),
            report.unsupported.len()
        );

        *handle = Handle {
            backend: Some(backend),
            source_dir,
            sources,
            queried: AtomicBool::new(false),
        };
        Ok(report)
    }

    /// Search with the configured `top_k`.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.search_top_k(query, self.config.top_k)
    }

    /// Return at most `top_k` hits for `query`, best first.
    pub fn search_top_k(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        if top_k == 0 {
            return Err(FolioError::invalid_argument("top_k must be positive"));
        }

        let handle = self.handle.read();
        let backend = handle.backend.as_ref().ok_or_else(|| {
            FolioError::invalid_operation("search requires a built index; call build first")
        })?;

        let hits = backend.search(query, top_k, self.embedder.as_deref())?;
        handle.queried.store(true, Ordering::Relaxed);
        debug!("Query {query:?} returned {} hits", hits.len());
        Ok(hits)
    }

    /// Copy the files behind `hits` into `destination`.
    ///
    /// Files are looked up by name among the sources of the last build. A
    /// file that cannot be copied is listed in the report and the rest are
    /// still copied.
    pub fn export_matches(&self, hits: &[SearchHit], destination: &Path) -> Result<ExportReport> {
        if !destination.is_dir() {
            return Err(FolioError::invalid_config(format!(
                "destination directory {} does not exist",
                destination.display()
            )));
        }

        let handle = self.handle.read();
        if handle.backend.is_none() {
            return Err(FolioError::invalid_operation(
                "export requires a built index; call build first",
            ));
        }

        let mut report = ExportReport {
            destination: destination.to_path_buf(),
            copied: Vec::new(),
            failed: Vec::new(),
        };
        let mut seen = AHashSet::new();

        for hit in hits {
            if !seen.insert(hit.filename.as_str()) {
                continue;
            }
            let result = match handle.sources.get(&hit.filename) {
                Some(source) => {
                    copy_with_metadata(source, &destination.join(&hit.filename)).map(|_| ())
                }
                None => Err(FolioError::copy(
                    hit.filename.clone(),
                    "not part of the last build",
                )),
            };

            match result {
                Ok(()) => {
                    debug!("Copied {} to {}", hit.filename, destination.display());
                    report.copied.push(hit.filename.clone());
                }
                Err(e) => {
                    warn!("Failed to copy {}: {e}", hit.filename);
                    report.failed.push(FailedCopy {
                        filename: hit.filename.clone(),
                        reason: e.reason(),
                    });
                }
            }
        }

        info!(
            "Exported {} files to {} ({} failed)",
            report.copied.len(),
            destination.display(),
            report.failed.len()
        );
        Ok(report)
    }

    fn required_embedder(&self) -> Result<Option<&dyn TextEmbedder>> {
        let embedder = self.embedder.as_deref();
        if !self.config.backend.needs_embedder() {
            return Ok(embedder);
        }

        let embedder = embedder.ok_or_else(missing_embedder)?;
        if let Some(dimension) = self.config.dimension
            && dimension != embedder.dimension()
        {
            return Err(FolioError::invalid_config(format!(
                "configured dimension {dimension} does not match {} embedder dimension {}",
                embedder.name(),
                embedder.dimension()
            )));
        }
        Ok(Some(embedder))
    }

    fn prepare_remote(&self, embedder: &dyn TextEmbedder) -> Result<RemoteCollection> {
        let service = self.remote.clone().ok_or_else(missing_service)?;
        let dimension = embedder.dimension();

        service.ensure_index(dimension)?;
        if self.config.remote_write_mode == WriteMode::Replace {
            debug!("Clearing {} before upload", service.name());
            service.delete_all()?;
        }

        Ok(RemoteCollection {
            service,
            dimension,
            upserted: 0,
        })
    }
}

fn missing_embedder() -> FolioError {
    FolioError::invalid_config("vector backends require an embedder")
}

fn missing_service() -> FolioError {
    FolioError::invalid_config("remote backend requires a vector service")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Attach embeddings, moving records whose text cannot be embedded into the
/// report's skipped list.
fn embed_records(
    embedder: &dyn TextEmbedder,
    records: Vec<DocumentRecord>,
    report: &mut BuildReport,
) -> Vec<DocumentRecord> {
    records
        .into_iter()
        .filter_map(|record| match embedder.embed(&record.text) {
            Ok(vector) => Some(record.with_embedding(vector)),
            Err(e) => {
                warn!("Failed to embed {}: {e}", record.filename());
                report.skip(record.filename(), e.reason());
                None
            }
        })
        .collect()
}

fn upsert_record(collection: &RemoteCollection, record: &DocumentRecord) -> Result<()> {
    let vector = record
        .embedding
        .as_ref()
        .ok_or_else(|| FolioError::MissingEmbedding(record.id.to_string()))?;
    vector.validate_dimension(collection.dimension)?;
    let blob = record.metadata.to_blob()?;
    collection
        .service
        .upsert(record.id.as_str(), &vector.data, &blob)
}
