//! Immutable lookup tables driving query expansion.
//!
//! Tables are structured configuration, decoupled from strategy logic: they
//! can be loaded from JSON at startup and tested or extended without
//! touching algorithm code. `Default` carries the built-in academic-domain
//! tables. Never mutated at runtime.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Association table: key phrase to related phrases.
///
/// `BTreeMap` keeps iteration order deterministic, which keeps expansion
/// output deterministic.
pub type PhraseTable = BTreeMap<String, Vec<String>>;

/// Seasonal keyword lists, bucketed by meteorological season.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeasonalKeywords {
    /// Months 3-5
    pub spring: Vec<String>,
    /// Months 6-8
    pub summer: Vec<String>,
    /// Months 9-11
    pub fall: Vec<String>,
    /// Remaining months
    pub winter: Vec<String>,
}

impl Default for SeasonalKeywords {
    fn default() -> Self {
        Self {
            spring: phrases(&["spring semester", "course registration", "orientation"]),
            summer: phrases(&["summer session", "internship", "re-enrollment"]),
            fall: phrases(&["fall semester", "campus festival", "midterms"]),
            winter: phrases(&["winter session", "graduation", "spring preparation"]),
        }
    }
}

/// All expansion tables, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpansionTables {
    /// Term to synonyms (strategy 1)
    pub synonyms: PhraseTable,
    /// Department/category term to variants (strategy 2)
    pub categories: PhraseTable,
    /// Temporal phrase to variants (strategy 3)
    pub time_patterns: PhraseTable,
    /// Year phrase to variants (strategy 4)
    pub year_patterns: PhraseTable,
    /// Intent keyword to variants (strategy 5)
    pub intent_patterns: PhraseTable,
    /// Query term to contextual companions (strategy 6, appended)
    pub context_rules: PhraseTable,
    /// Group name to members substituted for each other (strategy 7)
    pub semantic_groups: PhraseTable,
    /// Terms marking a query as semester-bearing (strategy 9)
    pub semester_terms: Vec<String>,
    /// Year tokens treated as historical references (strategy 9)
    pub historical_years: Vec<String>,
    /// Student type to specific keywords (advanced)
    pub student_types: PhraseTable,
    /// Document type keyword to variants (advanced)
    pub document_types: PhraseTable,
    /// Operations that trigger urgency expansion (advanced)
    pub urgent_operations: Vec<String>,
    /// Keywords appended for urgent operations (advanced)
    pub urgent_keywords: Vec<String>,
    /// Question word to frequently-asked follow-ups (advanced)
    pub faq_patterns: PhraseTable,
    /// Calendar month (1-12) to academic-calendar keywords (advanced)
    pub academic_calendar: BTreeMap<u32, Vec<String>>,
    /// Season-bucketed keywords (advanced)
    pub seasonal_keywords: SeasonalKeywords,
}

impl ExpansionTables {
    /// Loads tables from a JSON document.
    ///
    /// Absent sections fall back to the built-in defaults of that section's
    /// type, so a partial override file is valid.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn table(entries: &[(&str, &[&str])]) -> PhraseTable {
    entries
        .iter()
        .map(|(key, values)| (key.to_string(), phrases(values)))
        .collect()
}

impl Default for ExpansionTables {
    fn default() -> Self {
        Self {
            synonyms: table(&[
                ("registration", &["enrollment", "course registration", "sign-up"]),
                ("scholarship", &["financial aid", "grant", "bursary"]),
                ("graduation", &["degree completion", "commencement"]),
                ("tuition", &["tuition fee", "payment"]),
                ("dormitory", &["housing", "residence hall"]),
                ("exam", &["examination", "final"]),
                ("internship", &["work placement", "field practice"]),
                ("withdrawal", &["leave of absence", "deferral"]),
            ]),
            categories: table(&[
                ("computer science", &["software track", "computing department"]),
                ("engineering", &["school of engineering"]),
                ("business", &["business administration", "management school"]),
                ("design", &["visual design", "media design track"]),
                ("nursing", &["school of nursing"]),
            ]),
            time_patterns: table(&[
                ("deadline", &["due date", "closing date", "cutoff"]),
                ("period", &["schedule", "dates", "timeline"]),
                ("today", &["current date"]),
                ("this week", &["current week"]),
                ("start", &["beginning", "opening"]),
            ]),
            year_patterns: table(&[
                ("2024", &["2024 academic year", "ay 2024"]),
                ("2025", &["2025 academic year", "ay 2025"]),
                ("this year", &["current academic year"]),
            ]),
            intent_patterns: table(&[
                ("how", &["method", "procedure", "guide"]),
                ("when", &["date", "schedule"]),
                ("where", &["location", "office"]),
                ("requirements", &["eligibility", "criteria", "qualification"]),
                ("apply", &["application", "submit"]),
            ]),
            context_rules: table(&[
                ("registration", &["deadline", "timetable"]),
                ("scholarship", &["application", "eligibility"]),
                ("graduation", &["requirements", "audit"]),
                ("exam", &["schedule", "room"]),
                ("tuition", &["payment", "installment"]),
                ("dormitory", &["move-in", "application"]),
            ]),
            semantic_groups: table(&[
                ("enrollment", &["registration", "enrollment", "sign-up"]),
                ("funding", &["scholarship", "grant", "stipend"]),
                ("assessment", &["exam", "midterm", "final"]),
                ("completion", &["graduation", "commencement", "degree"]),
                ("housing", &["dormitory", "residence", "housing"]),
            ]),
            semester_terms: phrases(&["semester"]),
            historical_years: phrases(&["2023", "2024", "2025"]),
            student_types: table(&[
                ("freshman", &["first year", "new student", "orientation"]),
                ("transfer", &["transfer student", "credit transfer"]),
                ("graduate", &["graduate student", "thesis"]),
                ("international", &["international student", "exchange", "visa"]),
            ]),
            document_types: table(&[
                ("notice", &["announcement", "bulletin"]),
                ("form", &["application form", "document"]),
                ("guide", &["handbook", "manual"]),
            ]),
            urgent_operations: phrases(&["registration", "application", "payment", "submission"]),
            urgent_keywords: phrases(&["deadline", "due date", "closing soon"]),
            faq_patterns: table(&[
                ("how", &["procedure", "step by step"]),
                ("when", &["schedule", "timetable"]),
                ("who", &["contact", "office"]),
            ]),
            academic_calendar: [
                (1u32, &["winter session", "spring registration"][..]),
                (2, &["spring preparation", "tuition payment"]),
                (3, &["semester start", "course add drop"]),
                (4, &["midterm exams"]),
                (5, &["final exam preparation"]),
                (6, &["final exams", "summer session"]),
                (7, &["summer session", "grade posting"]),
                (8, &["fall registration", "tuition payment"]),
                (9, &["semester start", "course add drop"]),
                (10, &["midterm exams"]),
                (11, &["final exam preparation"]),
                (12, &["final exams", "winter session"]),
            ]
            .into_iter()
            .map(|(month, terms)| (month, phrases(terms)))
            .collect(),
            seasonal_keywords: SeasonalKeywords::default(),
        }
    }
}
