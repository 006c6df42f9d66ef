//! Multi-strategy query expansion.
//!
//! A query like "registration deadline" fans out into variants ("enrollment
//! deadline", "registration due date", ...) that are probed individually by
//! the retrieval facade. Nine stateless strategies run over the static
//! [`ExpansionTables`]; only the calendar strategy reads the injected
//! [`Clock`], so every output is deterministic under a fixed clock.
//!
//! Strategies 6-8 operate on lightweight whitespace terms rather than the
//! morphological tokenizer: expansion works on surface phrases that will be
//! re-tokenized at search time, so morphological filtering here would only
//! discard usable variants.

mod advanced;
pub mod tables;

pub use advanced::{AdvancedQueryExpansion, UserContext};
pub use tables::{ExpansionTables, SeasonalKeywords};

use crate::clock::Clock;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use tables::PhraseTable;

/// Function words excluded from lightweight term splitting.
///
/// Deliberately tiny; expansion terms only key into tables, they are not
/// retrieval tokens.
const FUNCTION_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "are", "was", "can", "how", "what",
];

/// An insertion-ordered, deduplicated set of query variants.
///
/// The original query is always first. Regenerated per call, never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionSet {
    variants: Vec<String>,
}

impl ExpansionSet {
    fn new(original: &str) -> Self {
        Self {
            variants: vec![original.to_string()],
        }
    }

    fn push(&mut self, variant: String) {
        if !self.variants.contains(&variant) {
            self.variants.push(variant);
        }
    }

    fn extend(&mut self, variants: Vec<String>) {
        for variant in variants {
            self.push(variant);
        }
    }

    /// The query the set was expanded from.
    pub fn original(&self) -> &str {
        &self.variants[0]
    }

    /// All variants in insertion order, original first.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Number of variants, counting the original.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always `false`: the original query is always present.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.variants
    }
}

/// Per-strategy variant counts, before cross-strategy deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrategyCounts {
    pub synonym: usize,
    pub category: usize,
    pub time: usize,
    pub year: usize,
    pub intent: usize,
    pub context: usize,
    pub semantic_group: usize,
    pub pairwise: usize,
    pub calendar: usize,
}

/// Diagnostic summary of one expansion run.
#[derive(Debug, Clone, Serialize)]
pub struct ExpansionStats {
    pub original_query: String,
    /// Deduplicated variant count, original included
    pub total_expanded: usize,
    /// Total over a constant baseline of 1. Kept as-is for continuity with
    /// existing dashboards even though it always equals `total_expanded`.
    pub expansion_ratio: f32,
    pub counts: StrategyCounts,
    pub generated_at: DateTime<Utc>,
}

/// Nine-strategy query expansion engine.
pub struct QueryExpansion {
    tables: Arc<ExpansionTables>,
    clock: Arc<dyn Clock>,
}

impl QueryExpansion {
    pub fn new(tables: Arc<ExpansionTables>, clock: Arc<dyn Clock>) -> Self {
        Self { tables, clock }
    }

    pub fn tables(&self) -> &Arc<ExpansionTables> {
        &self.tables
    }

    /// Expands a query into the original plus all strategy variants.
    pub fn expand(&self, query: &str) -> ExpansionSet {
        let mut set = ExpansionSet::new(query);
        set.extend(substitute(query, &self.tables.synonyms));
        set.extend(substitute(query, &self.tables.categories));
        set.extend(substitute(query, &self.tables.time_patterns));
        set.extend(substitute(query, &self.tables.year_patterns));
        set.extend(substitute(query, &self.tables.intent_patterns));
        set.extend(self.expand_context(query));
        set.extend(self.expand_semantic_groups(query));
        set.extend(self.expand_pairwise(query));
        set.extend(self.expand_calendar(query));

        debug!(query, variants = set.len(), "expanded query");
        set
    }

    /// Context augmentation: for each lightweight query term keyed in the
    /// context-association table, append `"<query> <associated>"`.
    fn expand_context(&self, query: &str) -> Vec<String> {
        let mut variants = Vec::new();
        for term in query_terms(query) {
            if let Some(associated) = self.tables.context_rules.get(&term) {
                for companion in associated {
                    variants.push(format!("{query} {companion}"));
                }
            }
        }
        variants
    }

    /// Semantic-group augmentation: substitute each query term found inside a
    /// group with every other member of that group.
    fn expand_semantic_groups(&self, query: &str) -> Vec<String> {
        let terms = query_terms(query);
        let mut variants = Vec::new();
        for members in self.tables.semantic_groups.values() {
            for term in &terms {
                if !members.contains(term) {
                    continue;
                }
                for member in members {
                    if member != term {
                        variants.push(query.replace(term.as_str(), member));
                    }
                }
            }
        }
        variants
    }

    /// Pairwise keyword combination: every unordered pair of lightweight
    /// terms joined as a short query.
    fn expand_pairwise(&self, query: &str) -> Vec<String> {
        let terms = query_terms(query);
        let mut variants = Vec::new();
        for (i, first) in terms.iter().enumerate() {
            for second in &terms[i + 1..] {
                variants.push(format!("{first} {second}"));
            }
        }
        variants
    }

    /// Calendar-aware augmentation, driven by the injected clock.
    ///
    /// Appends the current semester label to semester-bearing queries that
    /// lack it, and the current year to queries mentioning a historical year
    /// but not the current one.
    fn expand_calendar(&self, query: &str) -> Vec<String> {
        let now = self.clock.now();
        let semester = semester_label(now.month());
        let year = now.year().to_string();

        let mut variants = Vec::new();
        let mentions_semester = self
            .tables
            .semester_terms
            .iter()
            .any(|term| query.contains(term.as_str()));
        if mentions_semester && !query.contains(semester) {
            variants.push(format!("{query} {semester}"));
        }

        let mentions_historical_year = self
            .tables
            .historical_years
            .iter()
            .any(|y| query.contains(y.as_str()));
        if mentions_historical_year && !query.contains(&year) {
            variants.push(format!("{query} {year}"));
        }

        variants
    }

    /// Union, across every table whose key appears in the query, of all
    /// associated values, plus the query's own lightweight terms.
    pub fn related_terms(&self, query: &str) -> BTreeSet<String> {
        let mut related: BTreeSet<String> = query_terms(query).into_iter().collect();

        let tables: [&PhraseTable; 7] = [
            &self.tables.synonyms,
            &self.tables.categories,
            &self.tables.time_patterns,
            &self.tables.year_patterns,
            &self.tables.intent_patterns,
            &self.tables.context_rules,
            &self.tables.semantic_groups,
        ];
        for table in tables {
            for (key, values) in table {
                if query.contains(key.as_str()) {
                    related.extend(values.iter().cloned());
                }
            }
        }

        related
    }

    /// Runs every strategy and reports per-strategy and total counts.
    pub fn expansion_statistics(&self, query: &str) -> ExpansionStats {
        let counts = StrategyCounts {
            synonym: substitute(query, &self.tables.synonyms).len(),
            category: substitute(query, &self.tables.categories).len(),
            time: substitute(query, &self.tables.time_patterns).len(),
            year: substitute(query, &self.tables.year_patterns).len(),
            intent: substitute(query, &self.tables.intent_patterns).len(),
            context: self.expand_context(query).len(),
            semantic_group: self.expand_semantic_groups(query).len(),
            pairwise: self.expand_pairwise(query).len(),
            calendar: self.expand_calendar(query).len(),
        };
        let total_expanded = self.expand(query).len();

        ExpansionStats {
            original_query: query.to_string(),
            total_expanded,
            expansion_ratio: total_expanded as f32 / 1.0,
            counts,
            generated_at: self.clock.now(),
        }
    }
}

/// Semester label for a calendar month.
fn semester_label(month: u32) -> &'static str {
    if (3..=7).contains(&month) {
        "1st semester"
    } else {
        "2nd semester"
    }
}

/// Lightweight whitespace term splitter used by strategies 6-8.
///
/// Lowercases, drops single-character terms and a small function-word list.
fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|term| term.chars().count() > 1 && !FUNCTION_WORDS.contains(&term.as_str()))
        .collect()
}

/// Substitution over one phrase table: for each key occurring in the query,
/// one variant per associated value with the key replaced.
fn substitute(query: &str, table: &PhraseTable) -> Vec<String> {
    let mut variants = Vec::new();
    for (key, values) in table {
        if !query.contains(key.as_str()) {
            continue;
        }
        for value in values {
            variants.push(query.replace(key.as_str(), value));
        }
    }
    variants
}
