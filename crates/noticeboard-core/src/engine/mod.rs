//! Hybrid search engine combining dense (semantic) and sparse (BM25) search.
//!
//! The engine orchestrates:
//! - an external [`DenseRetriever`] for semantic similarity,
//! - the in-memory [`SparseIndex`] for exact term matching,
//! - alpha-weighted score fusion with content-prefix deduplication.
//!
//! # Scoring
//!
//! Dense hits carry no raw similarity; each gets the rank-proxy score
//! `1.0 - 0.1 * rank` and contributes `alpha * score` to the fused total.
//! Sparse hits contribute `(1 - alpha) * bm25`. BM25 is unbounded while the
//! rank proxy lives in `(0, 1]`, so the two sides are not on a common scale;
//! `alpha` is the single tunable balancing them.
//!
//! # Index lifecycle
//!
//! The sparse index is an immutable snapshot behind a `RwLock<Arc<_>>`.
//! Searches clone the `Arc` under a read lock and never observe a partial
//! index; [`rebuild`](HybridSearchEngine::rebuild) builds a fresh index off
//! the request path and swaps it in under the only exclusive hold. A failed
//! rebuild keeps the previous snapshot serving.


use crate::config::{DENSE_TIMEOUT, RANK_PROXY_STEP, SOURCE_TIMEOUT};
use crate::dense::DenseRetriever;
use crate::error::SourceError;
use crate::source::{DocumentMetadata, DocumentSource};
use crate::sparse::SparseIndex;
use crate::tokenizer::Tokenizer;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A fused search result.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Passage text
    pub content: String,
    /// Pass-through metadata
    pub metadata: DocumentMetadata,
    /// Fused score: `alpha * vector_score + (1 - alpha) * bm25_score`
    pub score: f32,
    /// Rank-proxy score from the dense side, 0 if sparse-only
    pub vector_score: f32,
    /// BM25 score from the sparse side, 0 if dense-only
    pub bm25_score: f32,
}

/// Hybrid search engine over one corpus.
///
/// Construct once and share; `search` takes `&self` and is safe to call
/// concurrently with `rebuild`.
pub struct HybridSearchEngine {
    dense: Arc<dyn DenseRetriever>,
    source: Arc<dyn DocumentSource>,
    tokenizer: Arc<Tokenizer>,
    index: RwLock<Arc<SparseIndex>>,
}

impl HybridSearchEngine {
    /// Creates an engine with an empty sparse index.
    ///
    /// Call [`rebuild`](Self::rebuild) to load the corpus; until then sparse
    /// search returns nothing and results are dense-only.
    pub fn new(
        dense: Arc<dyn DenseRetriever>,
        source: Arc<dyn DocumentSource>,
        tokenizer: Arc<Tokenizer>,
    ) -> Self {
        Self {
            dense,
            source,
            tokenizer,
            index: RwLock::new(Arc::new(SparseIndex::empty())),
        }
    }

    /// Fetches the corpus and swaps in a freshly built sparse index.
    ///
    /// Time-bounded; on fetch failure or timeout the current snapshot keeps
    /// serving and the error is returned for the caller to schedule a retry.
    pub async fn rebuild(&self) -> Result<(), SourceError> {
        let documents = match timeout(SOURCE_TIMEOUT, self.source.fetch_all()).await {
            Ok(Ok(documents)) => documents,
            Ok(Err(e)) => {
                warn!(error = %e, "corpus fetch failed, keeping current index");
                return Err(e);
            }
            Err(_) => {
                warn!(timeout = ?SOURCE_TIMEOUT, "corpus fetch timed out, keeping current index");
                return Err(SourceError::Timeout(SOURCE_TIMEOUT));
            }
        };

        let fresh = Arc::new(SparseIndex::build(documents, &self.tokenizer));
        info!(documents = fresh.len(), "swapping in rebuilt sparse index");
        *self.write_lock() = fresh;
        Ok(())
    }

    /// Number of documents in the current index snapshot.
    pub fn indexed_documents(&self) -> usize {
        self.snapshot().len()
    }

    /// Hybrid search: dense and sparse results fused by `alpha`.
    ///
    /// Both sides over-fetch `2 * top_k` candidates before fusion. A dense
    /// failure or timeout degrades to sparse-only and vice versa; both
    /// failing yields an empty list, never an error.
    pub async fn search(&self, query: &str, top_k: usize, alpha: f32) -> Vec<SearchResult> {
        if top_k == 0 {
            return Vec::new();
        }

        let dense_hits = self.dense_hits(query, 2 * top_k).await;
        let snapshot = self.snapshot();
        let sparse_hits = snapshot.search(query, 2 * top_k, &self.tokenizer);
        debug!(
            query,
            dense = dense_hits.len(),
            sparse = sparse_hits.len(),
            "fusing result sides"
        );

        // Insertion-ordered fusion keyed by content prefix; dense entries
        // first, so stable sorting keeps them ahead on score ties.
        let mut fused: Vec<SearchResult> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for (rank, hit) in dense_hits.into_iter().enumerate() {
            let key = dedup_key(&hit.content);
            if by_key.contains_key(&key) {
                continue;
            }
            let vector_score = 1.0 - RANK_PROXY_STEP * rank as f32;
            by_key.insert(key, fused.len());
            fused.push(SearchResult {
                content: hit.content,
                metadata: hit.metadata,
                score: alpha * vector_score,
                vector_score,
                bm25_score: 0.0,
            });
        }

        for hit in sparse_hits {
            let Some(document) = snapshot.document(hit.doc_index) else {
                continue;
            };
            let key = dedup_key(&document.content);
            match by_key.get(&key) {
                Some(&pos) => {
                    let entry = &mut fused[pos];
                    entry.bm25_score = hit.score;
                    entry.score += (1.0 - alpha) * hit.score;
                }
                None => {
                    by_key.insert(key, fused.len());
                    fused.push(SearchResult {
                        content: document.content.clone(),
                        metadata: document.metadata.clone(),
                        score: (1.0 - alpha) * hit.score,
                        vector_score: 0.0,
                        bm25_score: hit.score,
                    });
                }
            }
        }

        fused.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        fused.truncate(top_k);
        fused
    }

    /// Dense-only search returning rank-proxy-scored results.
    ///
    /// Used by the retrieval facade to probe expanded query variants.
    /// Failure or timeout yields an empty list.
    pub async fn dense_search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        self.dense_hits(query, k)
            .await
            .into_iter()
            .enumerate()
            .map(|(rank, hit)| {
                let vector_score = 1.0 - RANK_PROXY_STEP * rank as f32;
                SearchResult {
                    content: hit.content,
                    metadata: hit.metadata,
                    score: vector_score,
                    vector_score,
                    bm25_score: 0.0,
                }
            })
            .collect()
    }

    async fn dense_hits(&self, query: &str, k: usize) -> Vec<crate::dense::DenseHit> {
        match timeout(DENSE_TIMEOUT, self.dense.search(query, k)).await {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                warn!(error = %e, "dense search failed, degrading to sparse-only");
                Vec::new()
            }
            Err(_) => {
                warn!(timeout = ?DENSE_TIMEOUT, "dense search timed out, degrading to sparse-only");
                Vec::new()
            }
        }
    }

    fn snapshot(&self) -> Arc<SparseIndex> {
        Arc::clone(&self.index.read().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Arc<SparseIndex>> {
        self.index.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fusion dedup key: the first 100 characters of content.
fn dedup_key(content: &str) -> String {
    content.chars().take(crate::config::DEDUP_KEY_CHARS).collect()
}
