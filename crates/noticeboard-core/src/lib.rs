//! # Noticeboard Core
//!
//! Hybrid retrieval-and-ranking engine for campus notices, designed to feed
//! a downstream answer-generation step. Reusable across frontends (CLI,
//! HTTP services); embedding, crawling, and persistence stay behind traits.
//!
//! ## Modules
//!
//! - [`retrieval`] - High-level retrieval facade (`retrieve` / `expand`)
//! - [`engine`] - Hybrid search engine (dense + BM25 + alpha-weighted fusion)
//! - [`rerank`] - Candidate dedup and final re-ranking
//! - [`expansion`] - Nine-strategy query expansion plus context-aware layer
//! - [`tokenizer`] - Morphological tokenizer with memoized extraction
//! - [`sparse`] - BM25 sparse lexical index
//! - [`dense`] - External dense-retriever trait
//! - [`source`] - Document source trait and corpus types
//! - [`clock`] - Injectable clock for time-dependent strategies
//! - [`config`] - Production configuration constants
//! - [`error`] - Error types for source and dense-retriever operations

pub mod clock;
pub mod config;
pub mod dense;
pub mod engine;
pub mod error;
pub mod expansion;
pub mod rerank;
pub mod retrieval;
pub mod source;
pub mod sparse;
pub mod tokenizer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dense::{DenseHit, DenseRetriever, NullDenseRetriever};
pub use engine::{HybridSearchEngine, SearchResult};
pub use error::{DenseError, SourceError};
pub use expansion::{
    AdvancedQueryExpansion, ExpansionSet, ExpansionStats, ExpansionTables, QueryExpansion,
    UserContext,
};
pub use retrieval::RetrievalService;
pub use source::{Document, DocumentMetadata, DocumentSource, InMemoryDocumentSource};
pub use sparse::SparseIndex;
pub use tokenizer::{PosSegmenter, SimpleSegmenter, Tokenizer};
