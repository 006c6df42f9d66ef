//! Context-parameterized expansion layer.
//!
//! Where the base strategies rewrite the query text, every strategy here
//! appends an associated term when it is absent from the query, driven by
//! caller-supplied [`UserContext`] and the clock. Used by personalized
//! surfaces; the retrieval facade runs the base strategies only.

use super::tables::ExpansionTables;
use super::ExpansionSet;
use crate::clock::Clock;
use chrono::Datelike;
use serde::Deserialize;
use std::sync::Arc;

/// Keywords appended for first-year students.
const FIRST_YEAR_TERMS: &[&str] = &["freshman", "first year"];
/// Keywords appended for final-year students.
const FINAL_YEAR_TERMS: &[&str] = &["graduating", "senior"];

/// Optional caller context steering personalized expansion.
///
/// Every field is optional; an empty context disables the department, grade,
/// and student-type strategies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserContext {
    /// Department or major, matched against the category table
    pub department: Option<String>,
    /// Year of study, 1-based
    pub grade: Option<u8>,
    /// Student type, matched against the student-type table
    pub student_type: Option<String>,
}

/// Append-style expansion strategies parameterized by user context and time.
pub struct AdvancedQueryExpansion {
    tables: Arc<ExpansionTables>,
    clock: Arc<dyn Clock>,
}

impl AdvancedQueryExpansion {
    pub fn new(tables: Arc<ExpansionTables>, clock: Arc<dyn Clock>) -> Self {
        Self { tables, clock }
    }

    /// Runs every append strategy applicable to `context`.
    pub fn expand_with_context(&self, query: &str, context: &UserContext) -> ExpansionSet {
        let mut set = ExpansionSet::new(query);

        if let Some(department) = &context.department {
            set.extend(self.expand_by_department(query, department));
        }
        if let Some(grade) = context.grade {
            set.extend(self.expand_by_grade(query, grade));
        }
        if let Some(student_type) = &context.student_type {
            set.extend(self.expand_by_student_type(query, student_type));
        }
        set.extend(self.expand_by_urgency(query));
        set.extend(self.expand_by_faq(query));
        set.extend(self.expand_by_academic_calendar(query));
        set.extend(self.expand_by_season(query));
        set.extend(self.expand_by_document_type(query));

        set
    }

    /// Appends department-associated terms from the category table.
    pub fn expand_by_department(&self, query: &str, department: &str) -> Vec<String> {
        let key = department.to_lowercase();
        match self.tables.categories.get(&key) {
            Some(terms) => append_absent(query, terms.iter().map(String::as_str)),
            None => Vec::new(),
        }
    }

    /// Appends year-of-study terms; only the first and final year carry
    /// distinct vocabulary in notice text.
    pub fn expand_by_grade(&self, query: &str, grade: u8) -> Vec<String> {
        let terms: &[&str] = match grade {
            1 => FIRST_YEAR_TERMS,
            4 => FINAL_YEAR_TERMS,
            _ => return Vec::new(),
        };
        append_absent(query, terms.iter().copied())
    }

    /// Appends student-type keywords for a known student type.
    pub fn expand_by_student_type(&self, query: &str, student_type: &str) -> Vec<String> {
        let key = student_type.to_lowercase();
        match self.tables.student_types.get(&key) {
            Some(terms) => append_absent(query, terms.iter().map(String::as_str)),
            None => Vec::new(),
        }
    }

    /// Appends urgency keywords when the query names an urgent operation.
    pub fn expand_by_urgency(&self, query: &str) -> Vec<String> {
        let urgent = self
            .tables
            .urgent_operations
            .iter()
            .any(|op| query.contains(op.as_str()));
        if !urgent {
            return Vec::new();
        }
        append_absent(query, self.tables.urgent_keywords.iter().map(String::as_str))
    }

    /// Appends frequently-asked follow-ups keyed by question words.
    pub fn expand_by_faq(&self, query: &str) -> Vec<String> {
        let mut variants = Vec::new();
        for (question_word, follow_ups) in &self.tables.faq_patterns {
            if query.contains(question_word.as_str()) {
                variants.extend(append_absent(query, follow_ups.iter().map(String::as_str)));
            }
        }
        variants
    }

    /// Appends the current month's academic-calendar keywords.
    pub fn expand_by_academic_calendar(&self, query: &str) -> Vec<String> {
        let month = self.clock.now().month();
        match self.tables.academic_calendar.get(&month) {
            Some(terms) => append_absent(query, terms.iter().map(String::as_str)),
            None => Vec::new(),
        }
    }

    /// Appends the current season's keywords.
    ///
    /// Buckets: spring = months 3-5, summer = 6-8, fall = 9-11, winter = rest.
    pub fn expand_by_season(&self, query: &str) -> Vec<String> {
        let seasonal = &self.tables.seasonal_keywords;
        let terms = match self.clock.now().month() {
            3..=5 => &seasonal.spring,
            6..=8 => &seasonal.summer,
            9..=11 => &seasonal.fall,
            _ => &seasonal.winter,
        };
        append_absent(query, terms.iter().map(String::as_str))
    }

    /// Appends document-type variants for document-type keywords in the query.
    pub fn expand_by_document_type(&self, query: &str) -> Vec<String> {
        let mut variants = Vec::new();
        for (doc_type, associated) in &self.tables.document_types {
            if query.contains(doc_type.as_str()) {
                variants.extend(append_absent(query, associated.iter().map(String::as_str)));
            }
        }
        variants
    }
}

/// One `"<query> <term>"` variant per term not already in the query.
fn append_absent<'a>(query: &str, terms: impl Iterator<Item = &'a str>) -> Vec<String> {
    terms
        .filter(|term| !query.contains(term))
        .map(|term| format!("{query} {term}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn advanced_at(month: u32) -> AdvancedQueryExpansion {
        AdvancedQueryExpansion::new(
            Arc::new(ExpansionTables::default()),
            Arc::new(FixedClock::from_ymd(2026, month, 15)),
        )
    }

    #[test]
    fn test_department_append_uses_category_table() {
        let variants = advanced_at(3).expand_by_department("course timetable", "Nursing");
        assert_eq!(variants, vec!["course timetable school of nursing"]);
    }

    #[test]
    fn test_unknown_department_appends_nothing() {
        assert!(advanced_at(3)
            .expand_by_department("course timetable", "astrology")
            .is_empty());
    }

    #[test]
    fn test_grade_one_and_four_have_vocabulary() {
        let adv = advanced_at(3);
        assert_eq!(
            adv.expand_by_grade("orientation schedule", 1),
            vec![
                "orientation schedule freshman",
                "orientation schedule first year"
            ]
        );
        assert!(!adv.expand_by_grade("audit", 4).is_empty());
        assert!(adv.expand_by_grade("audit", 2).is_empty());
        assert!(adv.expand_by_grade("audit", 3).is_empty());
    }

    #[test]
    fn test_urgency_fires_only_for_urgent_operations() {
        let adv = advanced_at(3);
        let variants = adv.expand_by_urgency("tuition payment");
        assert!(variants.iter().any(|v| v == "tuition payment deadline"));
        assert!(adv.expand_by_urgency("library hours").is_empty());
    }

    #[test]
    fn test_seasonal_buckets() {
        let spring = advanced_at(5).expand_by_season("campus news");
        assert!(spring.iter().any(|v| v.contains("spring semester")));

        let summer = advanced_at(6).expand_by_season("campus news");
        assert!(summer.iter().any(|v| v.contains("summer session")));

        let fall = advanced_at(11).expand_by_season("campus news");
        assert!(fall.iter().any(|v| v.contains("fall semester")));

        let winter = advanced_at(12).expand_by_season("campus news");
        assert!(winter.iter().any(|v| v.contains("winter session")));
    }

    #[test]
    fn test_academic_calendar_append_follows_month() {
        let variants = advanced_at(4).expand_by_academic_calendar("exam info");
        assert_eq!(variants, vec!["exam info midterm exams"]);
    }

    #[test]
    fn test_terms_already_present_are_not_appended() {
        let variants = advanced_at(4).expand_by_academic_calendar("midterm exams info");
        assert!(variants.is_empty());
    }

    #[test]
    fn test_faq_append_keys_on_question_words() {
        let variants = advanced_at(3).expand_by_faq("how do i submit the form");
        assert!(variants.iter().any(|v| v.ends_with(" procedure")));
    }

    #[test]
    fn test_context_expansion_combines_strategies() {
        let context = UserContext {
            department: Some("nursing".to_string()),
            grade: Some(1),
            student_type: Some("transfer".to_string()),
        };
        let set = advanced_at(3).expand_with_context("registration notice", &context);

        assert_eq!(set.original(), "registration notice");
        let variants = set.variants();
        assert!(variants.iter().any(|v| v.contains("school of nursing")));
        assert!(variants.iter().any(|v| v.contains("freshman")));
        assert!(variants.iter().any(|v| v.contains("transfer student")));
        // "registration" is an urgent operation
        assert!(variants.iter().any(|v| v.contains("deadline")));
        // "notice" keys the document-type table
        assert!(variants.iter().any(|v| v.contains("announcement")));
    }

    #[test]
    fn test_empty_context_still_runs_time_strategies() {
        let set = advanced_at(9).expand_with_context("campus update", &UserContext::default());
        assert!(set.len() > 1, "calendar and season appends should fire");
    }
}
