//! End-to-end integration tests for the complete retrieval pipeline.
//!
//! These tests exercise the full workflow:
//! 1. Indexing: corpus fetch → tokenization → sparse index build
//! 2. Retrieval: hybrid search → query expansion probes → dedup → re-rank
//!
//! Everything runs against in-memory fixtures; no external services.

use noticeboard_core::clock::FixedClock;
use noticeboard_core::dense::{DenseHit, DenseRetriever, NullDenseRetriever};
use noticeboard_core::engine::HybridSearchEngine;
use noticeboard_core::error::{DenseError, SourceError};
use noticeboard_core::expansion::{ExpansionTables, QueryExpansion};
use noticeboard_core::retrieval::RetrievalService;
use noticeboard_core::source::{
    Document, DocumentMetadata, DocumentSource, InMemoryDocumentSource,
};
use noticeboard_core::tokenizer::{SimpleSegmenter, Tokenizer};
use std::sync::Arc;

/// Helper to create a titled notice document.
fn notice(id: &str, title: &str, content: &str) -> Document {
    Document {
        id: id.to_string(),
        content: content.to_string(),
        metadata: DocumentMetadata {
            title: Some(title.to_string()),
            ..Default::default()
        },
    }
}

fn campus_corpus() -> Vec<Document> {
    vec![
        notice(
            "n1",
            "Course Registration Notice",
            "Course registration for the 1st semester runs March 2 to March 5 on the portal.",
        ),
        notice(
            "n2",
            "Merit Scholarship Notice",
            "Merit scholarship applications are open; submit documents to the student office.",
        ),
        notice(
            "n3",
            "Library Hours Notice",
            "Library hours change during the exam period; the reading room stays open late.",
        ),
        notice(
            "n4",
            "Shuttle Schedule Notice",
            "The campus shuttle follows a reduced schedule over the break.",
        ),
    ]
}

fn tokenizer() -> Arc<Tokenizer> {
    Arc::new(Tokenizer::new(Arc::new(SimpleSegmenter)))
}

fn expansion_fixed_march() -> Arc<QueryExpansion> {
    Arc::new(QueryExpansion::new(
        Arc::new(ExpansionTables::default()),
        Arc::new(FixedClock::from_ymd(2026, 3, 15)),
    ))
}

struct FailingSource;

#[async_trait::async_trait]
impl DocumentSource for FailingSource {
    async fn fetch_all(&self) -> Result<Vec<Document>, SourceError> {
        Err(SourceError::Unavailable("store offline".to_string()))
    }
}

struct FailingDense;

#[async_trait::async_trait]
impl DenseRetriever for FailingDense {
    async fn search(&self, _query: &str, _k: usize) -> Result<Vec<DenseHit>, DenseError> {
        Err(DenseError::Unavailable("vector service offline".to_string()))
    }
}

struct StaticDense(Vec<DenseHit>);

#[async_trait::async_trait]
impl DenseRetriever for StaticDense {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<DenseHit>, DenseError> {
        Ok(self.0.iter().take(k).cloned().collect())
    }
}

async fn service_over(
    dense: Arc<dyn DenseRetriever>,
    source: Arc<dyn DocumentSource>,
) -> RetrievalService {
    let t = tokenizer();
    let engine = Arc::new(HybridSearchEngine::new(dense, source, Arc::clone(&t)));
    let _ = engine.rebuild().await;
    RetrievalService::new(engine, expansion_fixed_march(), t)
}

#[tokio::test]
async fn test_registration_query_surfaces_registration_notice() {
    let service = service_over(
        Arc::new(NullDenseRetriever),
        Arc::new(InMemoryDocumentSource::new(campus_corpus())),
    )
    .await;

    let results = service.retrieve("registration period", 3).await;
    assert!(!results.is_empty());
    assert_eq!(
        results[0].metadata.title_or_empty(),
        "Course Registration Notice"
    );
}

#[tokio::test]
async fn test_scholarship_query_surfaces_scholarship_notice() {
    let service = service_over(
        Arc::new(NullDenseRetriever),
        Arc::new(InMemoryDocumentSource::new(campus_corpus())),
    )
    .await;

    let results = service.retrieve("scholarship application documents", 3).await;
    assert!(!results.is_empty());
    assert_eq!(
        results[0].metadata.title_or_empty(),
        "Merit Scholarship Notice"
    );
}

#[tokio::test]
async fn test_synonym_query_reaches_canonical_notice() {
    // "enrollment" never appears in the corpus; normalization inside the
    // re-ranker maps it to "registration".
    let service = service_over(
        Arc::new(NullDenseRetriever),
        Arc::new(InMemoryDocumentSource::new(campus_corpus())),
    )
    .await;

    let expanded = service.expand("enrollment deadline");
    assert!(expanded
        .variants()
        .iter()
        .any(|v| v.contains("enrollment")));

    let results = service.retrieve("registration deadline", 3).await;
    assert!(!results.is_empty());
    assert_eq!(
        results[0].metadata.title_or_empty(),
        "Course Registration Notice"
    );
}

#[tokio::test]
async fn test_march_clock_produces_first_semester_variant() {
    let service = service_over(
        Arc::new(NullDenseRetriever),
        Arc::new(InMemoryDocumentSource::new(campus_corpus())),
    )
    .await;

    let expanded = service.expand("semester timetable");
    assert!(expanded
        .variants()
        .iter()
        .any(|v| v == "semester timetable 1st semester"));
}

#[tokio::test]
async fn test_dense_probes_enrich_sparse_results() {
    let probe = DenseHit {
        content: "Dormitory move-in guide for the new semester.".to_string(),
        metadata: DocumentMetadata {
            title: Some("Dormitory Notice".to_string()),
            ..Default::default()
        },
    };
    let service = service_over(
        Arc::new(StaticDense(vec![probe])),
        Arc::new(InMemoryDocumentSource::new(campus_corpus())),
    )
    .await;

    let results = service.retrieve("dormitory move-in", 5).await;
    assert!(results
        .iter()
        .any(|r| r.metadata.title_or_empty() == "Dormitory Notice"));
    // The dense hit arrives via hybrid search and two probes; dedup must
    // collapse it to a single candidate.
    let count = results
        .iter()
        .filter(|r| r.metadata.title_or_empty() == "Dormitory Notice")
        .count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_failing_dense_falls_back_to_sparse() {
    let service = service_over(
        Arc::new(FailingDense),
        Arc::new(InMemoryDocumentSource::new(campus_corpus())),
    )
    .await;

    let results = service.retrieve("library exam period", 3).await;
    assert!(!results.is_empty());
    assert_eq!(
        results[0].metadata.title_or_empty(),
        "Library Hours Notice"
    );
}

#[tokio::test]
async fn test_failing_source_falls_back_to_dense() {
    let hit = DenseHit {
        content: "Tuition payment window closes Friday.".to_string(),
        metadata: DocumentMetadata {
            title: Some("Tuition Notice".to_string()),
            ..Default::default()
        },
    };
    let service = service_over(
        Arc::new(StaticDense(vec![hit])),
        Arc::new(FailingSource),
    )
    .await;

    let results = service.retrieve("tuition payment", 3).await;
    assert!(!results.is_empty());
    assert_eq!(results[0].metadata.title_or_empty(), "Tuition Notice");
}

#[tokio::test]
async fn test_total_failure_yields_empty_results() {
    let service = service_over(Arc::new(FailingDense), Arc::new(FailingSource)).await;
    assert!(service.retrieve("anything at all", 5).await.is_empty());
}

#[tokio::test]
async fn test_empty_corpus_retrieval_is_empty_not_error() {
    let service = service_over(
        Arc::new(NullDenseRetriever),
        Arc::new(InMemoryDocumentSource::new(Vec::new())),
    )
    .await;
    assert!(service.retrieve("registration", 5).await.is_empty());
}

#[tokio::test]
async fn test_results_respect_top_k() {
    let service = service_over(
        Arc::new(NullDenseRetriever),
        Arc::new(InMemoryDocumentSource::new(campus_corpus())),
    )
    .await;

    let results = service
        .retrieve("notice schedule period semester campus", 2)
        .await;
    assert!(results.len() <= 2);
}

#[tokio::test]
async fn test_metadata_passes_through_unchanged() {
    let mut corpus = campus_corpus();
    corpus[0].metadata.link = Some("https://example.edu/notices/1".to_string());
    corpus[0].metadata.expiry_date = Some("2026-03-05".to_string());

    let service = service_over(
        Arc::new(NullDenseRetriever),
        Arc::new(InMemoryDocumentSource::new(corpus)),
    )
    .await;

    let results = service.retrieve("registration period", 1).await;
    assert_eq!(
        results[0].metadata.link.as_deref(),
        Some("https://example.edu/notices/1")
    );
    assert_eq!(results[0].metadata.expiry_date.as_deref(), Some("2026-03-05"));
}
