//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::args::{FolioArgs, OutputFormat};
use crate::error::Result;
use crate::retrieval::{BackendKind, BuildReport, ExportReport, SearchHit};

/// Result structure for the `index` command.
#[derive(Debug, Serialize)]
pub struct IndexResult {
    pub source: String,
    pub backend: BackendKind,
    pub report: BuildReport,
    pub duration_ms: u64,
}

/// Result structure for the `search` command.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub backend: BackendKind,
    pub hits: Vec<SearchHit>,
    pub build: BuildReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportReport>,
    pub duration_ms: u64,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &FolioArgs,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                writeln!(out, "{message}")?;
                writeln!(out)?;
            }
            result.write_human(&mut out)?;
        }
        OutputFormat::Json => write_json(&mut out, result, args.pretty)?,
    }
    out.flush()?;
    Ok(())
}

/// Write `result` as a single JSON document.
pub fn write_json<T: Serialize>(out: &mut dyn Write, result: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    writeln!(out, "{json}")?;
    Ok(())
}

impl HumanOutput for IndexResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Index Summary:")?;
        writeln!(out, "══════════════")?;
        writeln!(out, "Source: {}", self.source)?;
        writeln!(out, "Backend: {}", self.backend)?;
        writeln!(out, "Build time: {}", format_duration(self.duration_ms))?;
        write_build_report(out, &self.report)
    }
}

impl HumanOutput for SearchResults {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Search Results:")?;
        writeln!(out, "═══════════════")?;
        writeln!(out, "Query: {:?} ({} backend)", self.query, self.backend)?;
        writeln!(out)?;

        if self.hits.is_empty() {
            writeln!(out, "No matching documents.")?;
        }
        for (i, hit) in self.hits.iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {}  [{}]  {} {:.4}",
                i + 1,
                hit.filename,
                hit.id,
                hit.score_kind.name(),
                hit.score
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Total time: {}", format_duration(self.duration_ms))?;
        write_build_report(out, &self.build)?;

        if let Some(export) = &self.export {
            writeln!(out)?;
            writeln!(out, "Exported to {}:", export.destination.display())?;
            writeln!(out, "────────────")?;
            for filename in &export.copied {
                writeln!(out, "  {filename}")?;
            }
            for failed in &export.failed {
                writeln!(out, "  {} (failed: {})", failed.filename, failed.reason)?;
            }
        }
        Ok(())
    }
}

fn write_build_report(out: &mut dyn Write, report: &BuildReport) -> io::Result<()> {
    writeln!(out, "Documents indexed: {}", report.ingested)?;

    if !report.skipped.is_empty() {
        writeln!(out)?;
        writeln!(out, "Skipped files ({}):", report.skipped.len())?;
        writeln!(out, "──────────────")?;
        for skipped in &report.skipped {
            writeln!(out, "  {}: {}", skipped.filename, skipped.reason)?;
        }
    }

    if !report.unsupported.is_empty() {
        writeln!(out)?;
        writeln!(out, "Unsupported files ignored: {}", report.unsupported.join(", "))?;
    }
    Ok(())
}

/// Format duration in milliseconds into human-readable string.
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{minutes}m {seconds}s")
    }
}
