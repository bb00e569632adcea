//! Command implementations for the folio CLI.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::embedding::hashing::DEFAULT_DIMENSION;
use crate::embedding::{HashingEmbedder, HttpEmbedder, TextEmbedder};
use crate::error::{FolioError, Result};
use crate::extraction::ExtractorRegistry;
use crate::remote::{HttpVectorService, InMemoryVectorService, VectorService};
use crate::retrieval::{RetrievalConfig, Retriever};

/// Execute a CLI command.
pub fn execute_command(args: FolioArgs) -> Result<()> {
    match &args.command {
        Command::Index(index_args) => run_index(index_args, &args),
        Command::Search(search_args) => run_search(search_args, &args),
    }
}

/// Build an index and print the build report.
fn run_index(index_args: &IndexArgs, cli_args: &FolioArgs) -> Result<()> {
    let start = Instant::now();
    let retriever = create_retriever(&cli_args.settings)?;
    let report = retriever.build(&index_args.source)?;

    output_result(
        "Index built",
        &IndexResult {
            source: index_args.source.display().to_string(),
            backend: retriever.config().backend,
            report,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Build an index, search it and optionally export the matched files.
fn run_search(search_args: &SearchArgs, cli_args: &FolioArgs) -> Result<()> {
    let start = Instant::now();
    if let Some(dest) = &search_args.dest
        && !dest.is_dir()
    {
        return Err(FolioError::invalid_config(format!(
            "destination directory {} does not exist",
            dest.display()
        )));
    }
    let retriever = create_retriever(&cli_args.settings)?;
    let build = retriever.build(&search_args.source)?;

    let hits = match search_args.top_k {
        Some(top_k) => retriever.search_top_k(&search_args.query, top_k)?,
        None => retriever.search(&search_args.query)?,
    };

    let export = match &search_args.dest {
        Some(dest) => Some(retriever.export_matches(&hits, dest)?),
        None => None,
    };

    output_result(
        "Search complete",
        &SearchResults {
            query: search_args.query.clone(),
            backend: retriever.config().backend,
            hits,
            build,
            export,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Load the configuration file, if any, and apply flag overrides.
pub fn retrieval_config(settings: &SettingsArgs) -> Result<RetrievalConfig> {
    let mut config = match &settings.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            RetrievalConfig::from_json_file(path)?
        }
        None => RetrievalConfig::default(),
    };

    if let Some(backend) = settings.backend {
        config.backend = backend.into();
    }
    if let Some(metric) = settings.metric {
        config.metric = metric.into();
    }
    if let Some(dimension) = settings.dimension {
        config.dimension = Some(dimension);
    }
    if let Some(mode) = settings.remote_mode {
        config.remote_write_mode = mode.into();
    }

    config.validate()?;
    Ok(config)
}

/// Create the embedder selected by `--embedder`.
pub fn create_embedder(
    settings: &SettingsArgs,
    config: &RetrievalConfig,
) -> Result<Arc<dyn TextEmbedder>> {
    let dimension = config.dimension.unwrap_or(DEFAULT_DIMENSION);
    match settings.embedder {
        EmbedderArg::Hashing => Ok(Arc::new(HashingEmbedder::new(dimension)?)),
        EmbedderArg::Http => {
            let url = settings.embedding_url.as_deref().ok_or_else(|| {
                FolioError::invalid_config("--embedder http requires --embedding-url")
            })?;
            let mut embedder = HttpEmbedder::new(url, dimension)?;
            if let Some(model) = &settings.embedding_model {
                embedder = embedder.with_model(model.clone());
            }
            if let Some(api_key) = &settings.embedding_api_key {
                embedder = embedder.with_api_key(api_key.clone());
            }
            Ok(Arc::new(embedder))
        }
    }
}

/// Create the remote vector service: HTTP when `--remote-url` is given,
/// otherwise a process-local store.
pub fn create_vector_service(settings: &SettingsArgs) -> Result<Arc<dyn VectorService>> {
    match &settings.remote_url {
        Some(url) => {
            let mut service =
                HttpVectorService::new(url.clone())?.with_index_name(settings.remote_index.clone());
            if let Some(api_key) = &settings.remote_api_key {
                service = service.with_api_key(api_key.clone());
            }
            Ok(Arc::new(service))
        }
        None => {
            info!("No --remote-url given; using an in-memory vector service");
            Ok(Arc::new(InMemoryVectorService::new()))
        }
    }
}

/// Assemble a retriever from the command line settings.
pub fn create_retriever(settings: &SettingsArgs) -> Result<Retriever> {
    let config = retrieval_config(settings)?;
    let backend = config.backend;

    let embedder = if backend.needs_embedder() {
        Some(create_embedder(settings, &config)?)
    } else {
        None
    };

    let mut retriever = Retriever::new(config)?.with_extractor(Arc::new(
        ExtractorRegistry::with_ocr_program(settings.ocr_program.clone()),
    ));
    if let Some(embedder) = embedder {
        retriever = retriever.with_embedder(embedder);
    }
    if backend == crate::retrieval::BackendKind::Remote {
        retriever = retriever.with_remote(create_vector_service(settings)?);
    }
    Ok(retriever)
}
