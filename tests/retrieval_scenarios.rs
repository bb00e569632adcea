use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use folio::embedding::hashing::DEFAULT_DIMENSION;
use folio::embedding::{HashingEmbedder, PrecomputedEmbedder};
use folio::error::{FolioError, Result};
use folio::remote::{InMemoryVectorService, RemoteMatch, VectorService, WriteMode};
use folio::retrieval::{BackendKind, HandleState, RetrievalConfig, Retriever, ScoreKind};
use folio::vector::Vector;

fn write(dir: &Path, name: &str, contents: &[u8]) {
    fs::write(dir.join(name), contents).unwrap();
}

/// Five supported files, one of them a corrupt PDF, plus one unsupported file.
fn mixed_folder() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a_invoice.txt", b"Invoice #42 for consulting services");
    write(dir.path(), "b_invoices.txt", b"Overdue invoices from March");
    write(dir.path(), "c_receipt.txt", b"Lunch receipt");
    write(dir.path(), "d_contract.txt", b"Consulting agreement signed in March");
    write(dir.path(), "e_broken.pdf", b"this is not really a PDF document");
    write(dir.path(), "notes.docx", b"ignored");
    dir
}

fn retriever(backend: BackendKind) -> Retriever {
    let config = RetrievalConfig::builder().backend(backend).build().unwrap();
    Retriever::new(config)
        .unwrap()
        .with_embedder(Arc::new(HashingEmbedder::new(DEFAULT_DIMENSION).unwrap()))
}

#[test]
fn corrupt_pdf_is_skipped_and_reported() -> Result<()> {
    let dir = mixed_folder();

    for backend in [BackendKind::Lexical, BackendKind::Similarity] {
        let retriever = retriever(backend);
        let report = retriever.build(dir.path())?;

        assert_eq!(report.ingested, 4, "{backend}");
        assert_eq!(report.skipped.len(), 1, "{backend}");
        assert_eq!(report.skipped[0].filename, "e_broken.pdf");
        assert!(!report.skipped[0].reason.is_empty());
        assert_eq!(report.unsupported, vec!["notes.docx".to_string()]);
        assert_eq!(retriever.len(), 4);
    }
    Ok(())
}

#[test]
fn lexical_search_returns_stemmed_matches() -> Result<()> {
    let dir = mixed_folder();
    let retriever = retriever(BackendKind::Lexical);
    retriever.build(dir.path())?;

    let hits = retriever.search("invoice")?;
    let mut names: Vec<&str> = hits.iter().map(|hit| hit.filename.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["a_invoice.txt", "b_invoices.txt"]);
    assert!(hits.iter().all(|hit| hit.score_kind == ScoreKind::Relevance));
    assert_eq!(retriever.state(), HandleState::Queryable);
    Ok(())
}

#[test]
fn similarity_search_ranks_identical_text_first() -> Result<()> {
    let dir = mixed_folder();
    let retriever = retriever(BackendKind::Similarity);
    retriever.build(dir.path())?;

    let hits = retriever.search_top_k("lunch receipts", 2)?;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].filename, "c_receipt.txt");
    assert!(hits[0].score < 1e-6);
    assert!(hits[0].score <= hits[1].score);
    assert_eq!(hits[0].score_kind, ScoreKind::Distance);

    assert_eq!(retriever.search_top_k("lunch receipts", 2)?, hits);
    Ok(())
}

#[test]
fn rebuild_replaces_previous_contents() -> Result<()> {
    let first = mixed_folder();
    let second = TempDir::new().unwrap();
    write(second.path(), "memo.txt", b"Quarterly budget memo");

    let retriever = retriever(BackendKind::Lexical);
    retriever.build(first.path())?;
    assert_eq!(retriever.search("invoice")?.len(), 2);

    retriever.build(second.path())?;
    assert_eq!(retriever.len(), 1);
    assert!(retriever.search("invoice")?.is_empty());
    assert_eq!(retriever.search("budget")?[0].filename, "memo.txt");
    assert_eq!(retriever.source_dir().as_deref(), Some(second.path()));
    Ok(())
}

#[test]
fn remote_write_modes() -> Result<()> {
    let first = mixed_folder();
    let second = TempDir::new().unwrap();
    write(second.path(), "memo.txt", b"Quarterly budget memo");

    let service = Arc::new(InMemoryVectorService::new());
    let remote = |mode: WriteMode| {
        let config = RetrievalConfig::builder()
            .backend(BackendKind::Remote)
            .remote_write_mode(mode)
            .build()
            .unwrap();
        Retriever::new(config)
            .unwrap()
            .with_embedder(Arc::new(HashingEmbedder::new(DEFAULT_DIMENSION).unwrap()))
            .with_remote(service.clone())
    };

    let report = remote(WriteMode::Replace).build(first.path())?;
    assert_eq!(report.ingested, 4);
    assert_eq!(service.len(), 4);
    assert_eq!(service.dimension(), Some(DEFAULT_DIMENSION));

    // Merge upserts over the existing ids.
    remote(WriteMode::Merge).build(second.path())?;
    assert_eq!(service.len(), 4);

    let retriever = remote(WriteMode::Replace);
    retriever.build(second.path())?;
    assert_eq!(service.len(), 1);

    let hits = retriever.search("budget memo")?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].filename, "memo.txt");
    assert_eq!(hits[0].score_kind, ScoreKind::Similarity);
    assert!(hits[0].score > 0.0 && hits[0].score <= 1.0);
    Ok(())
}

#[test]
fn concurrent_searches_share_the_index() -> Result<()> {
    let dir = mixed_folder();
    let retriever = retriever(BackendKind::Lexical);
    retriever.build(dir.path())?;
    let expected = retriever.search("consulting")?;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| retriever.search("consulting")))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    });
    Ok(())
}

#[test]
fn export_copies_matches_and_reports_failures() -> Result<()> {
    let dir = mixed_folder();
    let dest = TempDir::new().unwrap();
    let retriever = retriever(BackendKind::Lexical);
    retriever.build(dir.path())?;

    let hits = retriever.search("consulting march")?;
    assert_eq!(hits.len(), 3);

    fs::remove_file(dir.path().join("b_invoices.txt")).unwrap();
    let report = retriever.export_matches(&hits, dest.path())?;

    assert_eq!(report.copied.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].filename, "b_invoices.txt");
    for name in &report.copied {
        assert_eq!(
            fs::read(dest.path().join(name)).unwrap(),
            fs::read(dir.path().join(name)).unwrap()
        );
    }

    let missing = dest.path().join("nope");
    assert!(matches!(
        retriever.export_matches(&hits, &missing),
        Err(FolioError::InvalidConfig(_))
    ));
    Ok(())
}

#[test]
fn build_files_keeps_caller_order() -> Result<()> {
    let dir = mixed_folder();
    let retriever = retriever(BackendKind::Lexical);
    let report = retriever.build_files(&[
        dir.path().join("d_contract.txt"),
        dir.path().join("a_invoice.txt"),
    ])?;
    assert_eq!(report.ingested, 2);

    let hits = retriever.search("consulting")?;
    let first = hits.iter().find(|hit| hit.filename == "d_contract.txt").unwrap();
    assert_eq!(first.id.as_str(), "doc-0000000001");
    Ok(())
}

/// In-memory service that refuses to upsert one id.
struct RejectingService {
    inner: InMemoryVectorService,
    rejected_id: &'static str,
}

impl VectorService for RejectingService {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn ensure_index(&self, dimension: usize) -> Result<()> {
        self.inner.ensure_index(dimension)
    }

    fn upsert(&self, id: &str, vector: &[f32], metadata_blob: &str) -> Result<()> {
        if id == self.rejected_id {
            return Err(FolioError::remote(format!("upsert of {id} refused")));
        }
        self.inner.upsert(id, vector, metadata_blob)
    }

    fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RemoteMatch>> {
        self.inner.query(vector, top_k)
    }

    fn delete_all(&self) -> Result<()> {
        self.inner.delete_all()
    }
}

fn remote_retriever(service: Arc<dyn VectorService>, require_non_empty: bool) -> Retriever {
    let config = RetrievalConfig::builder()
        .backend(BackendKind::Remote)
        .remote_write_mode(WriteMode::Replace)
        .require_non_empty(require_non_empty)
        .build()
        .unwrap();
    Retriever::new(config)
        .unwrap()
        .with_embedder(Arc::new(HashingEmbedder::new(DEFAULT_DIMENSION).unwrap()))
        .with_remote(service)
}

#[test]
fn failed_remote_rebuild_keeps_stored_vectors() -> Result<()> {
    let first = TempDir::new().unwrap();
    write(first.path(), "memo.txt", b"Quarterly budget memo");
    let empty = TempDir::new().unwrap();

    let service = Arc::new(InMemoryVectorService::new());
    let retriever = remote_retriever(service.clone(), true);
    retriever.build(first.path())?;
    assert_eq!(retriever.search("budget")?.len(), 1);

    assert!(matches!(
        retriever.build(empty.path()),
        Err(FolioError::EmptyBatch)
    ));
    assert_eq!(service.len(), 1);
    assert_eq!(retriever.len(), 1);

    let hits = retriever.search("budget")?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].filename, "memo.txt");
    Ok(())
}

#[test]
fn remote_upsert_failure_skips_only_that_file() -> Result<()> {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"alpha report");
    write(dir.path(), "b.txt", b"beta report");
    write(dir.path(), "c.txt", b"gamma report");

    let service = Arc::new(RejectingService {
        inner: InMemoryVectorService::new(),
        rejected_id: "doc-0000000002",
    });
    let retriever = remote_retriever(service.clone(), false);
    let report = retriever.build(dir.path())?;

    assert_eq!(report.ingested, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].filename, "b.txt");
    assert!(report.skipped[0].reason.contains("refused"));
    assert_eq!(service.inner.len(), 2);
    Ok(())
}

#[test]
fn embedding_failures_skip_at_build_and_fail_at_query() -> Result<()> {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "east.txt", b"east");
    write(dir.path(), "north.txt", b"north");
    write(dir.path(), "west.txt", b"west");

    let embedder = PrecomputedEmbedder::new(2)
        .with_vector("north", Vector::new(vec![0.0, 1.0]))?
        .with_vector("east", Vector::new(vec![1.0, 0.0]))?;
    let config = RetrievalConfig::builder()
        .backend(BackendKind::Similarity)
        .build()?;
    let retriever = Retriever::new(config)?.with_embedder(Arc::new(embedder));

    let report = retriever.build(dir.path())?;
    assert_eq!(report.ingested, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].filename, "west.txt");

    let hits = retriever.search_top_k("north", 1)?;
    assert_eq!(hits[0].filename, "north.txt");

    assert!(matches!(
        retriever.search("south"),
        Err(FolioError::Embedding(_))
    ));
    Ok(())
}

#[test]
fn build_files_skips_repeated_file_names() -> Result<()> {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write(first.path(), "report.txt", b"first quarterly report");
    write(second.path(), "report.txt", b"second quarterly report");
    let dest = TempDir::new().unwrap();

    let retriever = retriever(BackendKind::Lexical);
    let report = retriever.build_files(&[
        first.path().join("report.txt"),
        second.path().join("report.txt"),
    ])?;
    assert_eq!(report.ingested, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].filename, "report.txt");
    assert!(report.skipped[0].reason.contains("duplicate"));

    let hits = retriever.search("quarterly")?;
    let export = retriever.export_matches(&hits, dest.path())?;
    assert_eq!(export.copied, vec!["report.txt".to_string()]);
    assert_eq!(
        fs::read(dest.path().join("report.txt")).unwrap(),
        b"first quarterly report"
    );
    Ok(())
}

#[test]
fn export_reports_each_failed_file_once() -> Result<()> {
    let dir = mixed_folder();
    let dest = TempDir::new().unwrap();
    let retriever = retriever(BackendKind::Lexical);
    retriever.build(dir.path())?;

    let mut hits = retriever.search("invoice")?;
    hits.extend(hits.clone());
    assert_eq!(hits.len(), 4);

    fs::remove_file(dir.path().join("b_invoices.txt")).unwrap();
    let report = retriever.export_matches(&hits, dest.path())?;

    assert_eq!(report.copied, vec!["a_invoice.txt".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].filename, "b_invoices.txt");
    Ok(())
}
