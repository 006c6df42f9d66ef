//! Pluggable part-of-speech segmentation.
//!
//! Morphological analysis is an external language capability, not something
//! this crate reimplements. The ranking core depends only on the
//! [`PosSegmenter`] trait: deployments plug in a real analyzer (a KoNLPy-style
//! morpheme tagger, a spaCy pipeline behind FFI, a service call), while
//! [`SimpleSegmenter`] provides a deterministic baseline good enough for
//! English notices and for tests.

/// Coarse part-of-speech tag.
///
/// Only the three content-bearing classes are kept by the tokenizer;
/// everything else maps to `Other` and is filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    /// Nouns, including proper nouns and numbers-as-names
    Noun,
    /// Verbs, stemmed to their base form by the segmenter
    Verb,
    /// Adjectives
    Adjective,
    /// Particles, punctuation remnants, numerals, anything non-content
    Other,
}

impl PartOfSpeech {
    /// Whether tokens of this class survive tokenization.
    pub fn is_content(self) -> bool {
        matches!(self, Self::Noun | Self::Verb | Self::Adjective)
    }
}

/// Segments raw text into `(token, part_of_speech)` pairs.
///
/// Implementations own normalization and stemming: the tokenizer passes the
/// segmenter output through its filters without further transformation.
/// Must be cheap to call concurrently.
pub trait PosSegmenter: Send + Sync {
    /// Segments `text` into tagged tokens, in source order.
    fn segment(&self, text: &str) -> Vec<(String, PartOfSpeech)>;
}

/// Baseline whitespace segmenter with light normalization.
///
/// Lowercases each word, strips possessive suffixes, and applies a coarse
/// tag heuristic: alphabetic words are nouns (the dominant content class in
/// notice text), purely numeric words are `Other` so that dates and
/// ordinals don't pollute the lexical index.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSegmenter;

impl PosSegmenter for SimpleSegmenter {
    fn segment(&self, text: &str) -> Vec<(String, PartOfSpeech)> {
        text.split_whitespace()
            .map(|word| {
                let mut normalized = word.to_lowercase();
                if let Some(stripped) = normalized
                    .strip_suffix("'s")
                    .or_else(|| normalized.strip_suffix("\u{2019}s"))
                {
                    normalized = stripped.to_string();
                }

                let tag = if normalized.chars().any(|c| c.is_alphabetic()) {
                    PartOfSpeech::Noun
                } else {
                    PartOfSpeech::Other
                };
                (normalized, tag)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segmenter_lowercases_and_tags() {
        let segmenter = SimpleSegmenter;
        let tagged = segmenter.segment("Registration Period");

        assert_eq!(
            tagged,
            vec![
                ("registration".to_string(), PartOfSpeech::Noun),
                ("period".to_string(), PartOfSpeech::Noun),
            ]
        );
    }

    #[test]
    fn test_numerals_are_not_content() {
        let segmenter = SimpleSegmenter;
        let tagged = segmenter.segment("March 2 to March 5");

        let numeral_tags: Vec<_> = tagged
            .iter()
            .filter(|(w, _)| w.chars().all(|c| c.is_ascii_digit()))
            .map(|(_, tag)| *tag)
            .collect();
        assert!(numeral_tags.iter().all(|t| !t.is_content()));
    }

    #[test]
    fn test_possessive_stripped() {
        let segmenter = SimpleSegmenter;
        let tagged = segmenter.segment("Registrar's office");
        assert_eq!(tagged[0].0, "registrar");
    }

    #[test]
    fn test_empty_input() {
        let segmenter = SimpleSegmenter;
        assert!(segmenter.segment("   ").is_empty());
    }
}
