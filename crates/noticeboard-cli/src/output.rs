//! Output formatting for search results and expansion output.
//!
//! Supports both human-readable terminal output and JSON for scripting.

use noticeboard_core::engine::SearchResult;
use noticeboard_core::expansion::{ExpansionSet, ExpansionStats};
use serde::Serialize;

/// Maximum characters to show in a content snippet
const SNIPPET_MAX_LEN: usize = 200;

/// JSON output structure for search results
#[derive(Serialize)]
pub struct JsonOutput {
    pub query: String,
    pub results: Vec<JsonResult>,
}

/// Single result in JSON format
#[derive(Serialize)]
pub struct JsonResult {
    pub title: String,
    pub score: f32,
    pub vector_score: f32,
    pub bm25_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub snippet: String,
}

impl From<&SearchResult> for JsonResult {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.metadata.title_or_empty().to_string(),
            score: result.score,
            vector_score: result.vector_score,
            bm25_score: result.bm25_score,
            link: result.metadata.link.clone(),
            snippet: truncate_text(&result.content, SNIPPET_MAX_LEN),
        }
    }
}

/// Formats search results as JSON.
pub fn format_json(query: &str, results: &[SearchResult]) -> String {
    let output = JsonOutput {
        query: query.to_string(),
        results: results.iter().map(JsonResult::from).collect(),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats search results for human-readable terminal output.
pub fn format_human(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{}\"", query);
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Found {} notice{} for \"{}\":\n\n",
        results.len(),
        if results.len() == 1 { "" } else { "s" },
        query
    ));

    for (i, result) in results.iter().enumerate() {
        let title = result.metadata.title_or_empty();
        let title = if title.is_empty() { "(untitled)" } else { title };
        output.push_str(&format!("{}. {} (score: {:.2})\n", i + 1, title, result.score));

        if result.vector_score > 0.0 || result.bm25_score > 0.0 {
            output.push_str(&format!(
                "   [semantic: {:.2}, keyword: {:.2}]\n",
                result.vector_score, result.bm25_score
            ));
        }
        if let Some(link) = &result.metadata.link {
            output.push_str(&format!("   Link: {}\n", link));
        }

        let snippet = truncate_text(&result.content, SNIPPET_MAX_LEN);
        output.push_str(&format!("   {}\n\n", snippet));
    }

    output.trim_end().to_string()
}

/// Formats an expansion set, one variant per line or as a JSON array.
pub fn format_expansion(set: &ExpansionSet, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(set.variants()).unwrap_or_else(|_| "[]".to_string());
    }

    let mut output = format!(
        "{} variant{} for \"{}\":\n",
        set.len(),
        if set.len() == 1 { "" } else { "s" },
        set.original()
    );
    for variant in set.variants() {
        output.push_str(&format!("  {}\n", variant));
    }
    output.trim_end().to_string()
}

/// Formats expansion statistics.
pub fn format_stats(stats: &ExpansionStats, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(stats).unwrap_or_else(|_| "{}".to_string());
    }

    format!(
        "Expansion of \"{}\": {} variants (ratio {:.1})\n\
         synonym: {}, category: {}, time: {}, year: {}, intent: {},\n\
         context: {}, semantic group: {}, pairwise: {}, calendar: {}",
        stats.original_query,
        stats.total_expanded,
        stats.expansion_ratio,
        stats.counts.synonym,
        stats.counts.category,
        stats.counts.time,
        stats.counts.year,
        stats.counts.intent,
        stats.counts.context,
        stats.counts.semantic_group,
        stats.counts.pairwise,
        stats.counts.calendar,
    )
}

/// Truncates text to a maximum character count, adding ellipsis if needed.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    // Prefer a word boundary
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{}...", truncated),
    }
}
