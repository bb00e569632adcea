use chrono::{TimeZone, Utc};

use folio::document::{DocId, DocumentRecord, Metadata};
use folio::error::{FolioError, Result};
use folio::vector::{DistanceMetric, FlatIndex, Vector};

fn record(id: &str, vector: &[f32]) -> DocumentRecord {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    DocumentRecord::new(id, "", Metadata::new(format!("{id}.txt"), 0, created))
        .with_embedding(Vector::new(vector.to_vec()))
}

fn ids(hits: &[folio::vector::VectorHit]) -> Vec<&str> {
    hits.iter().map(|hit| hit.id.as_str()).collect()
}

/// Deterministic pseudo-random vectors.
fn synthetic(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..count)
        .map(|_| {
            (0..dimension)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state % 1000) as f32 / 100.0
                })
                .collect()
        })
        .collect()
}

#[test]
fn equal_distances_are_ordered_by_id() -> Result<()> {
    let mut index = FlatIndex::new(DistanceMetric::SquaredEuclidean);
    index.ingest(vec![
        record("c", &[10.0, 10.0]),
        record("b", &[0.0, 1.0]),
        record("a", &[1.0, 0.0]),
    ])?;

    let hits = index.query(&[1.0, 1.0], 2)?;
    assert_eq!(ids(&hits), vec!["a", "b"]);
    assert_eq!(hits[0].distance, 1.0);
    assert_eq!(hits[1].distance, 1.0);
    Ok(())
}

#[test]
fn query_returns_exact_top_k() -> Result<()> {
    let vectors = synthetic(300, 8);
    let mut index = FlatIndex::new(DistanceMetric::SquaredEuclidean);
    index.ingest(
        vectors
            .iter()
            .enumerate()
            .map(|(i, v)| record(DocId::sequential(i + 1).as_str(), v)),
    )?;

    let query = vec![5.0; 8];
    let hits = index.query(&query, 10)?;

    let mut expected: Vec<(f32, String)> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let distance = DistanceMetric::SquaredEuclidean.distance(&query, v).unwrap();
            (distance, DocId::sequential(i + 1).to_string())
        })
        .collect();
    expected.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let expected_ids: Vec<&str> = expected[..10].iter().map(|(_, id)| id.as_str()).collect();
    assert_eq!(ids(&hits), expected_ids);
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    Ok(())
}

#[test]
fn repeated_queries_are_identical() -> Result<()> {
    let mut index = FlatIndex::new(DistanceMetric::Cosine);
    index.ingest(
        synthetic(50, 4)
            .iter()
            .enumerate()
            .map(|(i, v)| record(&format!("r{i:02}"), v)),
    )?;

    let first = index.query(&[1.0, 2.0, 3.0, 4.0], 7)?;
    for _ in 0..5 {
        assert_eq!(index.query(&[1.0, 2.0, 3.0, 4.0], 7)?, first);
    }
    Ok(())
}

#[test]
fn mismatched_vector_leaves_index_untouched() -> Result<()> {
    let mut index = FlatIndex::new(DistanceMetric::SquaredEuclidean);
    index.ingest(vec![record("a", &[1.0, 0.0]), record("b", &[0.0, 1.0])])?;
    let before = index.query(&[0.0, 0.0], 5)?;

    let report = index.ingest(vec![record("c", &[1.0, 2.0, 3.0]), record("d", &[2.0, 2.0])])?;
    assert_eq!(report.ingested, 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].filename, "c.txt");
    assert!(matches!(
        report.rejected[0].error,
        FolioError::DimensionMismatch {
            expected: 2,
            actual: 3
        }
    ));

    assert_eq!(index.len(), 3);
    let after = index.query(&[0.0, 0.0], 2)?;
    assert_eq!(after, before);

    let err = index.insert(record("a", &[1.0])).unwrap_err();
    assert!(matches!(err, FolioError::DimensionMismatch { .. }));
    assert_eq!(index.get(&DocId::from("a")).map(|(v, _)| v.data.clone()), Some(vec![1.0, 0.0]));
    Ok(())
}

#[test]
fn small_and_empty_indexes() -> Result<()> {
    let mut index = FlatIndex::new(DistanceMetric::SquaredEuclidean);
    assert!(index.query(&[1.0, 1.0], 3)?.is_empty());

    index.ingest(vec![record("only", &[0.0, 0.0])])?;
    assert_eq!(ids(&index.query(&[1.0, 1.0], 3)?), vec!["only"]);

    assert!(matches!(
        index.query(&[1.0, 1.0], 0),
        Err(FolioError::InvalidArgument(_))
    ));
    assert!(matches!(
        index.query(&[1.0], 1),
        Err(FolioError::DimensionMismatch { .. })
    ));
    Ok(())
}

#[test]
fn empty_batches_follow_configuration() -> Result<()> {
    let mut tolerant = FlatIndex::new(DistanceMetric::SquaredEuclidean);
    assert_eq!(tolerant.ingest(Vec::new())?.ingested, 0);

    let mut strict = FlatIndex::new(DistanceMetric::SquaredEuclidean).require_non_empty(true);
    assert!(matches!(strict.ingest(Vec::new()), Err(FolioError::EmptyBatch)));
    Ok(())
}
