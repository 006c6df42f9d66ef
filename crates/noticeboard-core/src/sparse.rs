//! BM25 sparse lexical index.
//!
//! Scores documents by term frequency and inverse document frequency with
//! length normalization (Okapi BM25). Unlike off-the-shelf BM25 engines that
//! embed their own tokenization, this index scores the token sequences
//! produced by the morphological [`Tokenizer`], so sparse and re-rank
//! signals share one vocabulary.
//!
//! The index is immutable after [`build`](SparseIndex::build); the hybrid
//! engine swaps whole snapshots on rebuild rather than mutating in place.

use crate::config::{BM25_B, BM25_K1};
use crate::source::Document;
use crate::tokenizer::Tokenizer;
use std::collections::HashMap;
use tracing::{debug, info};

/// A sparse search hit: corpus position plus BM25 score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseHit {
    /// Index of the document in the corpus passed to `build`
    pub doc_index: usize,
    /// BM25 score, strictly positive
    pub score: f32,
}

/// Immutable BM25 index over a tokenized corpus.
///
/// Internally consistent by construction: one token sequence and one term
/// frequency map per document, always matching the document count.
pub struct SparseIndex {
    documents: Vec<Document>,
    token_sequences: Vec<Vec<String>>,
    term_frequencies: Vec<HashMap<String, usize>>,
    doc_frequencies: HashMap<String, usize>,
    avg_doc_len: f32,
}

impl SparseIndex {
    /// Creates an index over zero documents.
    ///
    /// The engine starts here and also lands here when the corpus cannot be
    /// fetched at build time; `search` then returns empty without erroring.
    pub fn empty() -> Self {
        Self {
            documents: Vec::new(),
            token_sequences: Vec::new(),
            term_frequencies: Vec::new(),
            doc_frequencies: HashMap::new(),
            avg_doc_len: 0.0,
        }
    }

    /// Builds the index by tokenizing every document's content.
    pub fn build(documents: Vec<Document>, tokenizer: &Tokenizer) -> Self {
        let token_sequences: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenizer.extract_keywords(&doc.content).as_ref().clone())
            .collect();

        let mut doc_frequencies: HashMap<String, usize> = HashMap::new();
        let mut term_frequencies: Vec<HashMap<String, usize>> =
            Vec::with_capacity(token_sequences.len());

        for tokens in &token_sequences {
            let mut freqs: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_frequencies.entry(term.clone()).or_insert(0) += 1;
            }
            term_frequencies.push(freqs);
        }

        let total_len: usize = token_sequences.iter().map(Vec::len).sum();
        let avg_doc_len = if token_sequences.is_empty() {
            0.0
        } else {
            total_len as f32 / token_sequences.len() as f32
        };

        info!(
            documents = documents.len(),
            vocabulary = doc_frequencies.len(),
            avg_doc_len,
            "built sparse index"
        );

        Self {
            documents,
            token_sequences,
            term_frequencies,
            doc_frequencies,
            avg_doc_len,
        }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no documents are indexed.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the document at a corpus position.
    pub fn document(&self, doc_index: usize) -> Option<&Document> {
        self.documents.get(doc_index)
    }

    /// BM25 score of every document against the given query tokens.
    ///
    /// The returned vector is parallel to the corpus: one score per
    /// document, zero where no query term matches.
    pub fn score_all(&self, query_tokens: &[String]) -> Vec<f32> {
        let n = self.documents.len();
        let mut scores = vec![0.0f32; n];
        if n == 0 {
            return scores;
        }

        for term in query_tokens {
            let Some(&df) = self.doc_frequencies.get(term) else {
                continue;
            };
            // Okapi idf with the +1 smoothing, never negative
            let idf = ((n as f32 - df as f32 + 0.5) / (df as f32 + 0.5) + 1.0).ln();

            for (doc_index, freqs) in self.term_frequencies.iter().enumerate() {
                let Some(&tf) = freqs.get(term) else {
                    continue;
                };
                let tf = tf as f32;
                let doc_len = self.token_sequences[doc_index].len() as f32;
                let norm = 1.0 - BM25_B + BM25_B * doc_len / self.avg_doc_len;
                scores[doc_index] += idf * (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * norm);
            }
        }

        scores
    }

    /// Searches the corpus, returning up to `k` positive-scoring hits.
    ///
    /// The query is tokenized with the same tokenizer the corpus was built
    /// with. No query tokens, or an empty index, yields an empty result —
    /// never an error. Ties are broken by original corpus order.
    pub fn search(&self, query: &str, k: usize, tokenizer: &Tokenizer) -> Vec<SparseHit> {
        if self.is_empty() || k == 0 {
            return Vec::new();
        }

        let query_tokens = tokenizer.extract_keywords(query);
        if query_tokens.is_empty() {
            debug!(query, "no content tokens in query, skipping sparse search");
            return Vec::new();
        }

        let scores = self.score_all(&query_tokens);
        let mut hits: Vec<SparseHit> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0.0)
            .map(|(doc_index, score)| SparseHit { doc_index, score })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.doc_index.cmp(&b.doc_index))
        });
        hits.truncate(k);
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::test_support::doc;
    use crate::tokenizer::SimpleSegmenter;
    use std::sync::Arc;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(Arc::new(SimpleSegmenter))
    }

    fn notice_corpus() -> Vec<Document> {
        vec![
            doc(
                "n1",
                "Registration Notice",
                "Registration period is March 2 to March 5",
            ),
            doc(
                "n2",
                "Scholarship Notice",
                "Merit scholarship application instructions",
            ),
            doc(
                "n3",
                "Library Notice",
                "Library hours change during exam period",
            ),
        ]
    }

    #[test]
    fn test_empty_corpus_search_returns_empty() {
        let t = tokenizer();
        let index = SparseIndex::build(Vec::new(), &t);

        assert!(index.is_empty());
        assert!(index.search("registration", 10, &t).is_empty());
    }

    #[test]
    fn test_search_ranks_matching_document_first() {
        let t = tokenizer();
        let index = SparseIndex::build(notice_corpus(), &t);

        let hits = index.search("registration period", 10, &t);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].doc_index, 0);
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn test_search_excludes_zero_scores() {
        let t = tokenizer();
        let index = SparseIndex::build(notice_corpus(), &t);

        let hits = index.search("scholarship", 10, &t);
        // Only the scholarship notice contains the term.
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_index, 1);
    }

    #[test]
    fn test_no_query_tokens_short_circuits() {
        let t = tokenizer();
        let index = SparseIndex::build(notice_corpus(), &t);

        // Stop-words and punctuation only: no content tokens survive.
        assert!(index.search("to the !!", 10, &t).is_empty());
    }

    #[test]
    fn test_ties_broken_by_corpus_order() {
        let t = tokenizer();
        let corpus = vec![
            doc("a", "First", "tuition payment deadline"),
            doc("b", "Second", "tuition payment deadline"),
        ];
        let index = SparseIndex::build(corpus, &t);

        let hits = index.search("tuition", 10, &t);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_index, 0);
        assert_eq!(hits[1].doc_index, 1);
    }

    #[test]
    fn test_term_frequency_increases_score() {
        let t = tokenizer();
        let corpus = vec![
            doc("a", "Once", "scholarship notice details inside"),
            doc("b", "Thrice", "scholarship scholarship scholarship notice"),
        ];
        let index = SparseIndex::build(corpus, &t);

        let hits = index.search("scholarship", 10, &t);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_index, 1, "higher tf should rank first");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_score_all_is_parallel_to_corpus() {
        let t = tokenizer();
        let corpus = notice_corpus();
        let n = corpus.len();
        let index = SparseIndex::build(corpus, &t);

        let scores = index.score_all(&["registration".to_string()]);
        assert_eq!(scores.len(), n);
        assert!(scores[0] > 0.0);
        assert_eq!(scores[1], 0.0);
    }

    #[test]
    fn test_truncates_to_k() {
        let t = tokenizer();
        let corpus: Vec<Document> = (0..10)
            .map(|i| doc(&format!("d{i}"), "Notice", "campus festival schedule"))
            .collect();
        let index = SparseIndex::build(corpus, &t);

        let hits = index.search("festival", 3, &t);
        assert_eq!(hits.len(), 3);
    }
}
