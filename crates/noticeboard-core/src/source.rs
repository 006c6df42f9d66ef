//! Document source trait and corpus document types.
//!
//! The corpus is owned by an external document store (vector database,
//! crawler output, upload pipeline). The core consumes it through the narrow
//! [`DocumentSource`] trait: one bulk fetch at sparse-index build time.
//! Persistence format and refresh scheduling are outside this crate.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A corpus document as fetched from the external store.
///
/// Read-only input to the retrieval core; never mutated or persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier
    pub id: String,
    /// Full text content (tokenized for sparse search)
    pub content: String,
    /// Associated metadata
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// Document metadata carried through search results unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Notice title, if the store provides one
    #[serde(default)]
    pub title: Option<String>,
    /// Canonical link back to the source page
    #[serde(default)]
    pub link: Option<String>,
    /// Expiry date of the notice (store-defined format)
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Any further store-specific fields, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    /// Returns the title, or an empty string if absent.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// External document store, accessed once per sparse-index rebuild.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches the entire corpus.
    ///
    /// Called off the request path at index build/rebuild time. An error
    /// here leaves the engine serving dense-only results over an empty
    /// sparse index; it never aborts query handling.
    async fn fetch_all(&self) -> Result<Vec<Document>, SourceError>;
}

/// In-memory document source.
///
/// Used by tests and by front-ends that load a corpus snapshot themselves
/// (e.g. the CLI reading a JSON file).
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentSource {
    documents: Vec<Document>,
}

impl InMemoryDocumentSource {
    /// Creates a source over the given documents.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Number of documents this source will return.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the source holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait::async_trait]
impl DocumentSource for InMemoryDocumentSource {
    async fn fetch_all(&self) -> Result<Vec<Document>, SourceError> {
        Ok(self.documents.clone())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Document source that always fails, for degradation tests.
    #[derive(Debug, Clone, Default)]
    pub struct FailingDocumentSource;

    #[async_trait::async_trait]
    impl DocumentSource for FailingDocumentSource {
        async fn fetch_all(&self) -> Result<Vec<Document>, SourceError> {
            Err(SourceError::Unavailable("store offline".to_string()))
        }
    }

    /// Builds a document with a title, in one line.
    pub fn doc(id: &str, title: &str, content: &str) -> Document {
        Document {
            id: id.to_string(),
            content: content.to_string(),
            metadata: DocumentMetadata {
                title: Some(title.to_string()),
                ..Default::default()
            },
        }
    }
}
