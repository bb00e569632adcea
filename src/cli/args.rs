//! Command line argument parsing for the folio CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::extraction::image::DEFAULT_OCR_PROGRAM;
use crate::remote::WriteMode;
use crate::remote::http::DEFAULT_INDEX_NAME;
use crate::retrieval::BackendKind;
use crate::vector::DistanceMetric;

/// Folio - find documents in a folder by keyword or meaning
#[derive(Parser, Debug, Clone)]
#[command(name = "folio")]
#[command(about = "Index a folder of documents and search it by keyword or meaning")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FolioArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FolioArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Index and backend settings shared by every command. Flags override the
/// values loaded from `--config`.
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Retrieval configuration file (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Index backend
    #[arg(short, long, global = true)]
    pub backend: Option<BackendArg>,

    /// Distance metric of the similarity backend
    #[arg(long, global = true)]
    pub metric: Option<MetricArg>,

    /// Embedder for the vector backends
    #[arg(long, default_value = "hashing", global = true)]
    pub embedder: EmbedderArg,

    /// Embedding dimension
    #[arg(long, global = true)]
    pub dimension: Option<usize>,

    /// Endpoint of the HTTP embedder
    #[arg(long, env = "FOLIO_EMBEDDING_URL", global = true)]
    pub embedding_url: Option<String>,

    /// Model name sent to the HTTP embedder
    #[arg(long, global = true)]
    pub embedding_model: Option<String>,

    /// API key of the HTTP embedder
    #[arg(long, env = "FOLIO_EMBEDDING_API_KEY", hide_env_values = true, global = true)]
    pub embedding_api_key: Option<String>,

    /// Base URL of the remote vector service; in-memory when omitted
    #[arg(long, env = "FOLIO_REMOTE_URL", global = true)]
    pub remote_url: Option<String>,

    /// Index name on the remote vector service
    #[arg(long, default_value = DEFAULT_INDEX_NAME, global = true)]
    pub remote_index: String,

    /// API key of the remote vector service
    #[arg(long, env = "FOLIO_REMOTE_API_KEY", hide_env_values = true, global = true)]
    pub remote_api_key: Option<String>,

    /// Whether a build replaces or merges remote vectors
    #[arg(long, global = true)]
    pub remote_mode: Option<RemoteModeArg>,

    /// OCR program used for images
    #[arg(long, default_value = DEFAULT_OCR_PROGRAM, global = true)]
    pub ocr_program: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index over a folder and report what was indexed
    Index(IndexArgs),

    /// Build an index over a folder, search it and optionally export matches
    Search(SearchArgs),
}

/// Arguments for indexing
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Folder of documents
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Folder of documents
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results to return
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Copy the matched files into this folder
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Similarity,
    Lexical,
    Remote,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Similarity => BackendKind::Similarity,
            BackendArg::Lexical => BackendKind::Lexical,
            BackendArg::Remote => BackendKind::Remote,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricArg {
    SquaredEuclidean,
    Cosine,
}

impl From<MetricArg> for DistanceMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::SquaredEuclidean => DistanceMetric::SquaredEuclidean,
            MetricArg::Cosine => DistanceMetric::Cosine,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderArg {
    /// Offline feature-hashing embedder
    Hashing,
    /// OpenAI-compatible embedding endpoint
    Http,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteModeArg {
    Replace,
    Merge,
}

impl From<RemoteModeArg> for WriteMode {
    fn from(arg: RemoteModeArg) -> Self {
        match arg {
            RemoteModeArg::Replace => WriteMode::Replace,
            RemoteModeArg::Merge => WriteMode::Merge,
        }
    }
}
