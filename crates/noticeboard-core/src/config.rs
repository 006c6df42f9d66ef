//! Production configuration constants.
//!
//! This module contains the constants that define the production
//! configuration for noticeboard. They are referenced throughout the
//! codebase and in tests to ensure consistency.

use std::time::Duration;

// =============================================================================
// Tokenizer Configuration
// =============================================================================

/// Maximum number of memoized keyword extractions.
///
/// Repeated identical input (common for document titles and re-issued
/// queries) returns the cached token sequence without re-running
/// segmentation.
pub const TOKEN_CACHE_CAPACITY: u64 = 1000;

/// Freshness window for cached keyword extractions.
///
/// Entries older than this are recomputed on next access.
pub const TOKEN_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Minimum character length for a content-bearing token.
///
/// Tokens of this length or shorter are dropped during extraction.
pub const MIN_TOKEN_CHARS: usize = 1;

// =============================================================================
// Sparse Index (BM25) Configuration
// =============================================================================

/// BM25 term-frequency saturation parameter.
pub const BM25_K1: f32 = 1.5;

/// BM25 document-length normalization parameter.
pub const BM25_B: f32 = 0.75;

// =============================================================================
// Hybrid Fusion Configuration
// =============================================================================

/// Default weight of the dense (vector) modality in score fusion.
///
/// The sparse modality receives `1 - alpha`. This is the single tunable
/// trading recall style between the two modalities.
pub const DEFAULT_ALPHA: f32 = 0.6;

/// Rank-proxy decrement applied to dense results.
///
/// Dense hit at 0-based rank `r` is assigned `1.0 - RANK_PROXY_STEP * r`.
/// Raw similarity values are not trusted across score scales; only the
/// dense side's relative ordering is used.
pub const RANK_PROXY_STEP: f32 = 0.1;

/// Number of leading content characters forming the fusion dedup key.
pub const DEDUP_KEY_CHARS: usize = 100;

// =============================================================================
// Re-ranker Configuration
// =============================================================================

/// Weight of query/title semantic similarity in the re-rank score.
pub const RERANK_TITLE_WEIGHT: f32 = 0.35;

/// Weight of query/content semantic similarity in the re-rank score.
pub const RERANK_CONTENT_WEIGHT: f32 = 0.40;

/// Weight of exact keyword hits in the re-rank score.
///
/// Title hits count double relative to content hits.
pub const RERANK_EXACT_WEIGHT: f32 = 0.25;

// =============================================================================
// Retrieval Facade Configuration
// =============================================================================

/// Hybrid candidates fetched by the retrieval facade before re-ranking.
pub const HYBRID_CANDIDATES: usize = 8;

/// Number of expanded query variants probed against the dense retriever.
pub const EXPANSION_PROBE_COUNT: usize = 2;

/// Dense results fetched per expanded query variant.
pub const EXPANSION_PROBE_K: usize = 5;

// =============================================================================
// External Call Time Bounds
// =============================================================================

/// Time bound on a single dense retriever call.
///
/// A timeout degrades the hybrid engine to sparse-only results for that
/// query rather than failing it.
pub const DENSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Time bound on fetching the full corpus at index rebuild time.
pub const SOURCE_TIMEOUT: Duration = Duration::from_secs(30);
