//! Candidate deduplication and final re-ranking.
//!
//! Runs after fusion and expansion probing have pooled candidates from
//! several searches. Dedup collapses near-identical notices (same title and
//! content prefix) keeping the first occurrence; re-ranking rescores the
//! survivors against the original query with weighted token similarity plus
//! an exact-match bonus, replacing the retrieval-stage scores.

use crate::config::{RERANK_CONTENT_WEIGHT, RERANK_EXACT_WEIGHT, RERANK_TITLE_WEIGHT};
use crate::engine::SearchResult;
use crate::tokenizer::Tokenizer;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Removes duplicate candidates, keeping the first occurrence.
///
/// Identity is the hash of `(title, first 100 content chars)`: the same
/// notice surfaced by different probes, or re-crawled with a changed tail,
/// counts as one candidate.
pub fn dedup_candidates(candidates: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen: HashSet<u64> = HashSet::new();
    let before = candidates.len();

    let deduped: Vec<SearchResult> = candidates
        .into_iter()
        .filter(|candidate| {
            let mut hasher = DefaultHasher::new();
            candidate.metadata.title_or_empty().hash(&mut hasher);
            let prefix: String = candidate
                .content
                .chars()
                .take(crate::config::DEDUP_KEY_CHARS)
                .collect();
            prefix.hash(&mut hasher);
            seen.insert(hasher.finish())
        })
        .collect();

    if deduped.len() < before {
        debug!(before, after = deduped.len(), "dropped duplicate candidates");
    }
    deduped
}

/// Re-scores and re-orders candidates against the original query.
///
/// Per candidate:
///
/// ```text
/// score = 0.35 * sim(query, title)
///       + 0.40 * sim(query, content)
///       + 0.25 * (2 * exact_title_hits + exact_content_hits)
/// ```
///
/// where `sim` is the tokenizer's weighted token similarity and exact hits
/// count query tokens occurring case-insensitively as substrings. The query
/// is normalized before tokenization so synonym variants score against the
/// canonical form. Sort is stable: retrieval order breaks ties.
pub fn rerank(
    tokenizer: &Tokenizer,
    query: &str,
    candidates: Vec<SearchResult>,
) -> Vec<SearchResult> {
    let normalized = tokenizer.normalize_query(query);
    let query_tokens = tokenizer.extract_keywords(&normalized);

    let mut scored: Vec<SearchResult> = candidates
        .into_iter()
        .map(|mut candidate| {
            let title = candidate.metadata.title_or_empty().to_string();
            let title_tokens = tokenizer.extract_keywords(&title);
            let content_tokens = tokenizer.extract_keywords(&candidate.content);

            let title_sim = tokenizer.semantic_similarity(&query_tokens, &title_tokens);
            let content_sim = tokenizer.semantic_similarity(&query_tokens, &content_tokens);
            let exact_title = exact_hits(&query_tokens, &title);
            let exact_content = exact_hits(&query_tokens, &candidate.content);

            candidate.score = RERANK_TITLE_WEIGHT * title_sim
                + RERANK_CONTENT_WEIGHT * content_sim
                + RERANK_EXACT_WEIGHT * (2.0 * exact_title + exact_content);
            candidate
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

/// Number of query tokens occurring in `text`, case-insensitively.
///
/// Each token counts once regardless of how often it occurs.
fn exact_hits(query_tokens: &[String], text: &str) -> f32 {
    let lowered = text.to_lowercase();
    query_tokens
        .iter()
        .filter(|token| lowered.contains(token.to_lowercase().as_str()))
        .count() as f32
}
