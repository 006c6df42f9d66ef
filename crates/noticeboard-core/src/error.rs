//! Error types for noticeboard-core.
//!
//! Errors are internal to the retrieval pipeline: the public `retrieve`
//! contract is best-effort and non-throwing. A failing modality is caught at
//! its call site and the engine degrades to the other modality, so these
//! types surface only through traits implemented by external collaborators
//! (document source, dense retriever).

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching the corpus from the document store.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Store unreachable or not configured
    #[error("Document source unavailable: {0}")]
    Unavailable(String),
    /// Store responded but the fetch failed
    #[error("Corpus fetch failed: {0}")]
    FetchFailed(String),
    /// Fetch exceeded its time bound
    #[error("Corpus fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors that can occur during dense (embedding + nearest-neighbor) search.
#[derive(Debug, Clone, Error)]
pub enum DenseError {
    /// Vector service unreachable or not configured
    #[error("Dense retriever unavailable: {0}")]
    Unavailable(String),
    /// Query was rejected or the search failed remotely
    #[error("Dense search failed: {0}")]
    SearchFailed(String),
    /// Search exceeded its time bound
    #[error("Dense search timed out after {0:?}")]
    Timeout(Duration),
}

impl From<SourceError> for String {
    fn from(err: SourceError) -> String {
        err.to_string()
    }
}

impl From<DenseError> for String {
    fn from(err: DenseError) -> String {
        err.to_string()
    }
}
