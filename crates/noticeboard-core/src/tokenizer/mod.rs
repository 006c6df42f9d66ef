//! Morphological tokenizer: keyword extraction, query normalization, and
//! token-set semantic similarity.
//!
//! # Pipeline
//!
//! 1. Non-word punctuation is stripped to spaces.
//! 2. The pluggable [`PosSegmenter`] tags and normalizes each word.
//! 3. Only noun/verb/adjective tokens longer than one character survive.
//! 4. Stop-words are dropped.
//!
//! Extraction is memoized by exact input string in a bounded, thread-safe
//! cache (capacity 1000, 1-hour freshness window): repeated identical input
//! returns the same sequence without re-running segmentation. A cache miss
//! recomputes without blocking other readers.

mod segmenter;

pub use segmenter::{PartOfSpeech, PosSegmenter, SimpleSegmenter};

use crate::config::{MIN_TOKEN_CHARS, TOKEN_CACHE_CAPACITY, TOKEN_CACHE_TTL};
use moka::sync::Cache;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

/// Stop-words dropped during extraction.
///
/// Function words that pass the length filter but carry no retrieval signal
/// in notice text.
const STOP_WORDS: &[&str] = &[
    "an", "as", "at", "be", "by", "do", "he", "if", "in", "is", "it", "my", "no", "of", "on", "or",
    "so", "to", "up", "we", "all", "and", "any", "are", "but", "can", "did", "for", "had", "has",
    "her", "him", "his", "how", "its", "may", "not", "our", "out", "she", "the", "their", "them",
    "then", "there", "they", "this", "that", "was", "were", "what", "when", "where", "which",
    "while", "who", "why", "will", "with", "would", "you", "your", "been", "have", "into", "from",
    "than", "also", "such", "each", "must", "shall", "should", "could", "about",
];

/// Default many-synonym-to-one-canonical table for query normalization.
///
/// Keys are matched longest-first in a single pass; replaced spans are never
/// rescanned, so a key occurring inside another key's replacement cannot be
/// substituted again.
const DEFAULT_CANONICAL_SYNONYMS: &[(&str, &str)] = &[
    ("course registration", "registration"),
    ("degree completion", "graduation"),
    ("financial aid", "scholarship"),
    ("sign-up", "registration"),
    ("enrollment", "registration"),
    ("enrolment", "registration"),
    ("signup", "registration"),
    ("bursary", "scholarship"),
    ("commencement", "graduation"),
    ("examination", "exam"),
    ("summer session", "seasonal session"),
    ("winter session", "seasonal session"),
];

/// Morphological tokenizer with memoized extraction.
///
/// Construct once at process start and share by reference; the cache is
/// internally synchronized. See the module docs for the pipeline.
pub struct Tokenizer {
    segmenter: Arc<dyn PosSegmenter>,
    stop_words: HashSet<&'static str>,
    /// (key, canonical) pairs sorted by key length, longest first
    synonyms: Vec<(String, String)>,
    cache: Cache<String, Arc<Vec<String>>>,
}

impl Tokenizer {
    /// Creates a tokenizer with the default normalization table.
    pub fn new(segmenter: Arc<dyn PosSegmenter>) -> Self {
        let pairs = DEFAULT_CANONICAL_SYNONYMS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::with_synonyms(segmenter, pairs)
    }

    /// Creates a tokenizer with a custom many-to-one synonym table.
    pub fn with_synonyms(segmenter: Arc<dyn PosSegmenter>, mut synonyms: Vec<(String, String)>) -> Self {
        // Longest key first so the single normalization pass is longest-match
        synonyms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        synonyms.retain(|(key, _)| !key.is_empty());

        Self {
            segmenter,
            stop_words: STOP_WORDS.iter().copied().collect(),
            synonyms,
            cache: Cache::builder()
                .max_capacity(TOKEN_CACHE_CAPACITY)
                .time_to_live(TOKEN_CACHE_TTL)
                .build(),
        }
    }

    /// Extracts content-bearing keywords from `text`, in source order.
    ///
    /// Memoized by exact input string. The returned sequence is shared with
    /// the cache; identical inputs within the freshness window yield the
    /// same allocation.
    pub fn extract_keywords(&self, text: &str) -> Arc<Vec<String>> {
        if let Some(cached) = self.cache.get(text) {
            trace!(len = text.len(), "keyword extraction cache hit");
            return cached;
        }

        let cleaned: String = text
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let keywords: Vec<String> = self
            .segmenter
            .segment(&cleaned)
            .into_iter()
            .filter(|(word, tag)| {
                tag.is_content()
                    && word.chars().count() > MIN_TOKEN_CHARS
                    && !self.stop_words.contains(word.as_str())
            })
            .map(|(word, _)| word)
            .collect();

        let keywords = Arc::new(keywords);
        self.cache.insert(text.to_string(), Arc::clone(&keywords));
        keywords
    }

    /// Extracts keywords for each text in turn.
    pub fn extract_keywords_batch(&self, texts: &[String]) -> Vec<Arc<Vec<String>>> {
        texts.iter().map(|t| self.extract_keywords(t)).collect()
    }

    /// Normalizes a query by canonicalizing synonyms.
    ///
    /// Single deterministic pass, longest match wins at each position, and
    /// replacement output is never rescanned. This replaces the sequential
    /// whole-string substitution of earlier revisions, which could
    /// double-substitute when one key occurred inside a later key's
    /// replacement.
    pub fn normalize_query(&self, query: &str) -> String {
        let mut out = String::with_capacity(query.len());
        let mut rest = query;

        'scan: while !rest.is_empty() {
            for (key, canonical) in &self.synonyms {
                if rest.starts_with(key.as_str()) {
                    out.push_str(canonical);
                    rest = &rest[key.len()..];
                    continue 'scan;
                }
            }
            match rest.chars().next() {
                Some(c) => {
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
                None => break,
            }
        }

        out
    }

    /// Weighted token-set similarity between query and document keywords.
    ///
    /// `0.7 * exact + 0.3 * partial`, where exact is the set-intersection
    /// size over the query token count and partial is the fraction of query
    /// tokens that are a substring of, or contain, some document token.
    /// Returns 0 if either side is empty. Output is in `[0, 1]`.
    pub fn semantic_similarity(&self, query_tokens: &[String], doc_tokens: &[String]) -> f32 {
        if query_tokens.is_empty() || doc_tokens.is_empty() {
            return 0.0;
        }

        let query_set: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
        let doc_set: HashSet<&str> = doc_tokens.iter().map(String::as_str).collect();
        let matches = query_set.intersection(&doc_set).count();
        let match_score = matches as f32 / query_tokens.len() as f32;

        let partial_matches = query_tokens
            .iter()
            .filter(|q| doc_tokens.iter().any(|d| d.contains(q.as_str()) || q.contains(d.as_str())))
            .count();
        let partial_score = partial_matches as f32 / query_tokens.len() as f32;

        0.7 * match_score + 0.3 * partial_score
    }
}
