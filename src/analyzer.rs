//! Lexical task analysis.
//!
//! Turns a raw task description (plus optional caller context) into a
//! structured [`TaskAnalysis`]. Pure functions over the static tables in
//! [`crate::keywords`]; never fails, empty input yields the documented
//! defaults.

use std::collections::BTreeSet;

use crate::keywords::{
    AUDIENCE_MARKERS, CATEGORY_KEYWORDS, DOMAIN_KEYWORDS, HIGH_COMPLEXITY_MARKERS,
    HIGH_URGENCY_MARKERS, LOW_COMPLEXITY_MARKERS, LOW_URGENCY_MARKERS, OUTPUT_FORMAT_MARKERS,
    STOPWORDS,
};
use crate::models::{
    Audience, Complexity, Domain, OutputFormat, TaskAnalysis, TaskCategory, Urgency,
};

/// Analyze a task description into its structured characteristics.
pub fn analyze(description: &str, context: Option<&str>) -> TaskAnalysis {
    let full_text = match context {
        Some(ctx) if !ctx.trim().is_empty() => {
            format!("{} {}", description, ctx).to_lowercase()
        }
        _ => description.to_lowercase(),
    };

    TaskAnalysis {
        domain: identify_domain(&full_text),
        category: classify_category(&full_text),
        complexity: assess_complexity(&full_text),
        urgency: assess_urgency(&full_text),
        audience: identify_audience(&full_text),
        output_format: identify_output_format(&full_text),
        keywords: extract_keywords(&full_text),
    }
}

/// Extract lowercase keyword tokens: alphanumeric runs longer than three
/// characters, stopword-filtered and deduplicated.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 3 && !STOPWORDS.contains(token))
        .map(str::to_owned)
        .collect()
}

fn identify_domain(text: &str) -> Domain {
    best_match(DOMAIN_KEYWORDS, text).unwrap_or(Domain::General)
}

fn classify_category(text: &str) -> TaskCategory {
    best_match(CATEGORY_KEYWORDS, text).unwrap_or(TaskCategory::General)
}

/// Highest substring-match count wins; declaration order breaks ties. A zero
/// count for every entry yields `None` so the caller can fall back.
fn best_match<T: Copy>(table: &[(T, &[&str])], text: &str) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for (value, words) in table {
        let count = words.iter().filter(|word| text.contains(*word)).count();
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((*value, count));
        }
    }
    best.map(|(value, _)| value)
}

fn assess_complexity(text: &str) -> Complexity {
    if HIGH_COMPLEXITY_MARKERS.iter().any(|m| text.contains(m)) {
        Complexity::High
    } else if LOW_COMPLEXITY_MARKERS.iter().any(|m| text.contains(m)) {
        Complexity::Low
    } else {
        Complexity::Medium
    }
}

fn assess_urgency(text: &str) -> Urgency {
    if HIGH_URGENCY_MARKERS.iter().any(|m| text.contains(m)) {
        Urgency::High
    } else if LOW_URGENCY_MARKERS.iter().any(|m| text.contains(m)) {
        Urgency::Low
    } else {
        Urgency::Normal
    }
}

fn identify_audience(text: &str) -> Audience {
    AUDIENCE_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| text.contains(m)))
        .map(|(audience, _)| *audience)
        .unwrap_or(Audience::General)
}

fn identify_output_format(text: &str) -> OutputFormat {
    OUTPUT_FORMAT_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| text.contains(m)))
        .map(|(format, _)| *format)
        .unwrap_or(OutputFormat::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        let analysis = analyze("", None);
        assert_eq!(analysis.domain, Domain::General);
        assert_eq!(analysis.category, TaskCategory::General);
        assert_eq!(analysis.complexity, Complexity::Medium);
        assert_eq!(analysis.urgency, Urgency::Normal);
        assert_eq!(analysis.audience, Audience::General);
        assert_eq!(analysis.output_format, OutputFormat::Text);
        assert!(analysis.keywords.is_empty());
    }

    #[test]
    fn debugging_task_is_technical() {
        let analysis = analyze("debug Python code with machine learning algorithms", None);
        assert_eq!(analysis.domain, Domain::Technology);
        assert_eq!(analysis.category, TaskCategory::Technical);
        assert_eq!(analysis.output_format, OutputFormat::Code);
        assert!(analysis.keywords.contains("python"));
        assert!(analysis.keywords.contains("machine"));
    }

    #[test]
    fn crypto_task_lands_in_finance_domain() {
        let analysis = analyze("analyze cryptocurrency market trends", None);
        assert_eq!(analysis.domain, Domain::Finance);
        assert!(analysis.keywords.contains("cryptocurrency"));
    }

    #[test]
    fn urgency_and_complexity_markers_are_detected() {
        let analysis = analyze("urgent: simple fix for the login page", None);
        assert_eq!(analysis.urgency, Urgency::High);
        assert_eq!(analysis.complexity, Complexity::Low);

        let relaxed = analyze("no rush, a comprehensive review of our architecture", None);
        assert_eq!(relaxed.urgency, Urgency::Low);
        assert_eq!(relaxed.complexity, Complexity::High);
    }

    #[test]
    fn audience_markers_pick_the_first_matching_set() {
        let analysis = analyze("prepare a summary for the executive board", None);
        assert_eq!(analysis.audience, Audience::Business);

        let technical = analyze("notes for the developer team", None);
        assert_eq!(technical.audience, Audience::Technical);
    }

    #[test]
    fn context_participates_in_classification() {
        let without = analyze("review this document", None);
        assert_eq!(without.domain, Domain::General);

        let with = analyze("review this document", Some("it is a software licensing contract"));
        assert_ne!(with.domain, Domain::General);
    }

    #[test]
    fn keywords_are_filtered_and_deduplicated() {
        let keywords = extract_keywords("the quick database and the slow database");
        assert!(keywords.contains("database"));
        assert!(keywords.contains("quick"));
        assert!(!keywords.contains("the"));
        assert!(!keywords.contains("and"));
        assert_eq!(keywords.iter().filter(|k| *k == "database").count(), 1);
    }

    #[test]
    fn analysis_is_deterministic() {
        let a = analyze("design a marketing campaign", Some("for a new brand"));
        let b = analyze("design a marketing campaign", Some("for a new brand"));
        assert_eq!(a.domain, b.domain);
        assert_eq!(a.category, b.category);
        assert_eq!(a.keywords, b.keywords);
    }
}
