//! Retrieval facade: the single entry point for answer-generation callers.
//!
//! Pools candidates from a hybrid search and from dense probes of the first
//! expanded query variants, then dedups and re-ranks the pool against the
//! original query. Every stage degrades instead of erroring: the worst case
//! is an empty result list.

use crate::config::{
    DEFAULT_ALPHA, EXPANSION_PROBE_COUNT, EXPANSION_PROBE_K, HYBRID_CANDIDATES,
};
use crate::engine::{HybridSearchEngine, SearchResult};
use crate::expansion::{ExpansionSet, QueryExpansion};
use crate::rerank::{dedup_candidates, rerank};
use crate::tokenizer::Tokenizer;
use std::sync::Arc;
use tracing::{debug, instrument};

/// High-level retrieval service.
pub struct RetrievalService {
    engine: Arc<HybridSearchEngine>,
    expansion: Arc<QueryExpansion>,
    tokenizer: Arc<Tokenizer>,
}

impl RetrievalService {
    pub fn new(
        engine: Arc<HybridSearchEngine>,
        expansion: Arc<QueryExpansion>,
        tokenizer: Arc<Tokenizer>,
    ) -> Self {
        Self {
            engine,
            expansion,
            tokenizer,
        }
    }

    /// Retrieves the `top_k` passages most relevant to `query`.
    ///
    /// Candidate pool: 8 hybrid results at the default alpha, plus dense
    /// probes (k = 5) of the first two expansion variants (the original
    /// query and the first generated variant). The pool is deduplicated and
    /// re-ranked against the original query before truncation.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        if top_k == 0 {
            return Vec::new();
        }

        let mut candidates = self
            .engine
            .search(query, HYBRID_CANDIDATES, DEFAULT_ALPHA)
            .await;

        let expansion = self.expansion.expand(query);
        for variant in expansion.variants().iter().take(EXPANSION_PROBE_COUNT) {
            let probe_hits = self.engine.dense_search(variant, EXPANSION_PROBE_K).await;
            candidates.extend(probe_hits);
        }

        debug!(
            query,
            pooled = candidates.len(),
            variants = expansion.len(),
            "pooled retrieval candidates"
        );

        let deduped = dedup_candidates(candidates);
        let mut ranked = rerank(&self.tokenizer, query, deduped);
        ranked.truncate(top_k);
        ranked
    }

    /// Expands a query without running retrieval.
    pub fn expand(&self, query: &str) -> ExpansionSet {
        self.expansion.expand(query)
    }
}
