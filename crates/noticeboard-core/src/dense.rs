//! Dense retriever trait: the external embedding + nearest-neighbor capability.
//!
//! Embedding models and the vector index live in an external service. The
//! hybrid engine only consumes an ordered result list; it discards the raw
//! similarity values and assigns a rank-proxy score instead, because raw
//! similarity and lexical scores live on different scales and only the dense
//! side's relative ordering is trusted.

use crate::error::DenseError;
use crate::source::DocumentMetadata;

/// A single dense search hit: content plus pass-through metadata.
///
/// No score field on purpose; see the module docs on rank-proxy scoring.
#[derive(Debug, Clone)]
pub struct DenseHit {
    /// Passage text
    pub content: String,
    /// Metadata from the external store
    pub metadata: DocumentMetadata,
}

/// External embedding + nearest-neighbor search capability.
///
/// Implementations must return hits in descending similarity order.
#[async_trait::async_trait]
pub trait DenseRetriever: Send + Sync {
    /// Searches for the `k` nearest passages to `query`.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<DenseHit>, DenseError>;
}

/// Dense retriever that always returns no results.
///
/// For sparse-only deployments (no vector service configured). The hybrid
/// engine then serves purely lexical results, which is the same degradation
/// path as a dense timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDenseRetriever;

#[async_trait::async_trait]
impl DenseRetriever for NullDenseRetriever {
    async fn search(&self, _query: &str, _k: usize) -> Result<Vec<DenseHit>, DenseError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Dense retriever returning a fixed hit list, truncated to `k`.
    #[derive(Debug, Clone, Default)]
    pub struct StaticDenseRetriever {
        pub hits: Vec<DenseHit>,
    }

    impl StaticDenseRetriever {
        pub fn new(hits: Vec<DenseHit>) -> Self {
            Self { hits }
        }
    }

    #[async_trait::async_trait]
    impl DenseRetriever for StaticDenseRetriever {
        async fn search(&self, _query: &str, k: usize) -> Result<Vec<DenseHit>, DenseError> {
            Ok(self.hits.iter().take(k).cloned().collect())
        }
    }

    /// Dense retriever that always fails, for degradation tests.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingDenseRetriever;

    #[async_trait::async_trait]
    impl DenseRetriever for FailingDenseRetriever {
        async fn search(&self, _query: &str, _k: usize) -> Result<Vec<DenseHit>, DenseError> {
            Err(DenseError::Unavailable("vector service offline".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_retriever_returns_empty() {
        let retriever = NullDenseRetriever;
        let hits = retriever.search("anything", 10).await.unwrap();
        assert!(hits.is_empty());
    }
}
