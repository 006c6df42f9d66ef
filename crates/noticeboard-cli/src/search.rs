//! Search command implementation.
//!
//! Loads a JSON corpus file, builds the retrieval service over it, and
//! executes queries. The CLI runs sparse-only: no vector service is wired
//! in, which is the same degradation path the engine takes when a dense
//! retriever times out.

use anyhow::{anyhow, Context, Result};
use noticeboard_core::clock::SystemClock;
use noticeboard_core::dense::NullDenseRetriever;
use noticeboard_core::engine::{HybridSearchEngine, SearchResult};
use noticeboard_core::expansion::{ExpansionTables, QueryExpansion};
use noticeboard_core::retrieval::RetrievalService;
use noticeboard_core::source::{Document, InMemoryDocumentSource};
use noticeboard_core::tokenizer::{SimpleSegmenter, Tokenizer};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Builds the expansion engine with the built-in tables and wall clock.
pub fn build_expansion() -> QueryExpansion {
    QueryExpansion::new(Arc::new(ExpansionTables::default()), Arc::new(SystemClock))
}

/// Parses a JSON array of corpus documents.
pub fn parse_corpus(json: &str) -> Result<Vec<Document>> {
    serde_json::from_str(json).context("Corpus file is not a JSON array of documents")
}

fn load_corpus(path: &Path) -> Result<Vec<Document>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    parse_corpus(&raw)
}

/// Performs a retrieval run against a corpus file.
///
/// This function:
/// 1. Loads and parses the corpus file
/// 2. Builds the sparse index over it
/// 3. Runs the full retrieve pipeline (hybrid search, expansion probes,
///    dedup, re-rank)
pub async fn execute_search(
    query: &str,
    limit: usize,
    corpus_path: &Path,
) -> Result<Vec<SearchResult>> {
    let documents = load_corpus(corpus_path)?;
    if documents.is_empty() {
        return Err(anyhow!(
            "Corpus file {} holds no documents.",
            corpus_path.display()
        ));
    }
    info!("Loaded {} documents from {}", documents.len(), corpus_path.display());

    let tokenizer = Arc::new(Tokenizer::new(Arc::new(SimpleSegmenter)));
    let engine = Arc::new(HybridSearchEngine::new(
        Arc::new(NullDenseRetriever),
        Arc::new(InMemoryDocumentSource::new(documents)),
        Arc::clone(&tokenizer),
    ));
    engine
        .rebuild()
        .await
        .map_err(|e| anyhow!("Failed to build index: {e}"))?;
    info!("Indexed {} documents", engine.indexed_documents());

    let service = RetrievalService::new(engine, Arc::new(build_expansion()), tokenizer);

    info!("Searching for: \"{}\"", query);
    Ok(service.retrieve(query, limit).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_search_missing_corpus_file() {
        let result = execute_search("test", 5, &PathBuf::from("/nonexistent/notices.json")).await;
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read corpus file"));
    }

    #[test]
    fn test_parse_corpus_accepts_document_array() {
        let documents = parse_corpus(
            r#"[
                {"id": "n1", "content": "Registration period is March 2 to March 5",
                 "metadata": {"title": "Registration Notice"}},
                {"id": "n2", "content": "Merit scholarship application instructions"}
            ]"#,
        )
        .unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(
            documents[0].metadata.title_or_empty(),
            "Registration Notice"
        );
        assert_eq!(documents[1].metadata.title_or_empty(), "");
    }

    #[test]
    fn test_parse_corpus_rejects_non_array() {
        assert!(parse_corpus(r#"{"id": "n1"}"#).is_err());
    }
}
