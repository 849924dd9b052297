//! Static classification tables used by the task analyzer and scorer.
//!
//! Everything that decides how a task is classified lives here as plain data,
//! so the tie-break order is auditable: slices are iterated in declaration
//! order, and the first entry wins a tie.

use lazy_static::lazy_static;
use std::collections::HashSet;

use crate::models::{Audience, Complexity, Domain, OutputFormat, TaskCategory, Urgency};

/// Domain keyword lists in priority order. Ties on match count resolve to the
/// earlier entry.
pub static DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::Technology,
        &[
            "tech",
            "software",
            "programming",
            "code",
            "system",
            "api",
            "database",
            "server",
            "deployment",
            "debug",
        ],
    ),
    (
        Domain::Business,
        &[
            "business",
            "market",
            "strategy",
            "process",
            "management",
            "roi",
            "stakeholder",
        ],
    ),
    (
        Domain::Creative,
        &["creative", "art", "design", "content", "story", "narrative"],
    ),
    (
        Domain::Education,
        &[
            "education",
            "teaching",
            "learning",
            "training",
            "how to",
            "tutorial",
            "guide",
            "instruct",
            "explain",
            "demonstrate",
        ],
    ),
    (
        Domain::Science,
        &[
            "science",
            "research",
            "analysis",
            "data",
            "experiment",
            "hypothesis",
        ],
    ),
    (
        Domain::Legal,
        &["legal", "law", "contract", "compliance", "regulation"],
    ),
    (
        Domain::Finance,
        &[
            "finance",
            "investment",
            "money",
            "budget",
            "financial",
            "cryptocurrency",
            "crypto",
            "trading",
            "portfolio",
        ],
    ),
    (
        Domain::Healthcare,
        &["health", "medical", "patient", "clinical", "diagnosis"],
    ),
];

/// Category keyword lists in priority order.
pub static CATEGORY_KEYWORDS: &[(TaskCategory, &[&str])] = &[
    (
        TaskCategory::Technical,
        &[
            "debug",
            "code",
            "programming",
            "software",
            "technical",
            "implementation",
            "algorithm",
            "system",
            "architecture",
            "development",
            "engineering",
            "python",
            "javascript",
            "api",
            "database",
            "server",
            "deployment",
        ],
    ),
    (
        TaskCategory::Creative,
        &[
            "write",
            "story",
            "creative",
            "narrative",
            "content",
            "marketing",
            "copy",
            "brand",
            "imaginative",
            "artistic",
            "expressive",
            "engaging",
            "storytelling",
        ],
    ),
    (
        TaskCategory::Business,
        &[
            "business",
            "analysis",
            "strategy",
            "market",
            "process",
            "optimization",
            "insights",
            "planning",
            "management",
            "roi",
            "efficiency",
        ],
    ),
    (
        TaskCategory::Educational,
        &[
            "teach",
            "explain",
            "educate",
            "learn",
            "training",
            "curriculum",
            "instructional",
            "pedagogy",
            "tutorial",
            "guide",
            "educational",
            "lesson",
            "course",
            "walkthrough",
            "step by step",
            "demonstrate",
        ],
    ),
    (
        TaskCategory::Design,
        &[
            "design",
            "ui",
            "ux",
            "visual",
            "graphic",
            "aesthetic",
            "interface",
            "branding",
            "layout",
            "prototype",
            "wireframe",
        ],
    ),
    (
        TaskCategory::Scientific,
        &[
            "research",
            "scientific",
            "methodology",
            "evidence",
            "experiment",
            "hypothesis",
            "statistics",
            "empirical",
            "study",
        ],
    ),
    (
        TaskCategory::Consulting,
        &[
            "consult",
            "advise",
            "advisory",
            "recommendation",
            "solution",
            "organizational",
            "change management",
            "best practices",
        ],
    ),
    (
        TaskCategory::Mentoring,
        &[
            "mentor",
            "coach",
            "guidance",
            "career",
            "leadership",
            "personal development",
            "growth",
            "mentoring",
            "coaching",
        ],
    ),
];

pub static HIGH_COMPLEXITY_MARKERS: &[&str] = &[
    "complex",
    "advanced",
    "sophisticated",
    "intricate",
    "detailed",
    "comprehensive",
];

pub static LOW_COMPLEXITY_MARKERS: &[&str] =
    &["simple", "basic", "easy", "straightforward", "quick"];

pub static HIGH_URGENCY_MARKERS: &[&str] = &[
    "urgent",
    "asap",
    "emergency",
    "critical",
    "immediate",
    "quickly",
];

pub static LOW_URGENCY_MARKERS: &[&str] =
    &["when convenient", "no rush", "take your time", "leisurely"];

/// Audience marker sets in detection order. The first audience with any
/// marker present wins; no marker means a general audience.
pub static AUDIENCE_MARKERS: &[(Audience, &[&str])] = &[
    (
        Audience::Technical,
        &[
            "developer",
            "engineer",
            "technical",
            "programmer",
            "architect",
        ],
    ),
    (
        Audience::Business,
        &[
            "executive",
            "manager",
            "board",
            "stakeholder",
            "client",
        ],
    ),
    (
        Audience::Expert,
        &["expert", "specialist", "professional", "advanced"],
    ),
    (
        Audience::General,
        &["user", "customer", "general", "public", "beginner"],
    ),
];

pub static OUTPUT_FORMAT_MARKERS: &[(OutputFormat, &[&str])] = &[
    (
        OutputFormat::Code,
        &["code", "script", "program", "function", "class", "implementation"],
    ),
    (
        OutputFormat::Analysis,
        &["analysis", "report", "insights", "findings", "evaluation"],
    ),
    (
        OutputFormat::Creative,
        &["story", "narrative", "creative", "artistic", "imaginative"],
    ),
    (
        OutputFormat::Documentation,
        &["documentation", "guide", "manual", "tutorial", "instructions"],
    ),
];

/// Register words expected for each audience, matched against a persona's
/// declared communication style.
pub static AUDIENCE_REGISTER: &[(Audience, &[&str])] = &[
    (
        Audience::Technical,
        &["technical", "precise", "analytical", "professional"],
    ),
    (
        Audience::Business,
        &["strategic", "data-driven", "professional", "analytical"],
    ),
    (
        Audience::General,
        &["accessible", "clear", "patient", "engaging", "explanatory"],
    ),
    (
        Audience::Expert,
        &["authoritative", "deep", "advanced", "technical"],
    ),
];

/// Style qualifier appended when the generation engine tailors a template's
/// communication style to the detected audience.
pub static AUDIENCE_STYLE_SUFFIX: &[(Audience, &str)] = &[
    (Audience::Technical, "precise for a technical audience"),
    (Audience::Business, "framed for business stakeholders"),
    (Audience::General, "accessible to a general audience"),
    (Audience::Expert, "assuming deep prior expertise"),
];

/// Affinity words tying a persona's name, expertise and context to a task
/// category.
pub static CATEGORY_AFFINITY: &[(TaskCategory, &[&str])] = &[
    (
        TaskCategory::Technical,
        &[
            "tech",
            "engineer",
            "developer",
            "software",
            "programmer",
            "architect",
            "devops",
        ],
    ),
    (
        TaskCategory::Creative,
        &["writer", "creative", "artist", "storyteller", "content"],
    ),
    (
        TaskCategory::Business,
        &["business", "analyst", "strategist", "market"],
    ),
    (
        TaskCategory::Educational,
        &["educator", "teacher", "instructor", "tutor", "trainer"],
    ),
    (
        TaskCategory::Design,
        &["designer", "ux", "ui", "visual"],
    ),
    (
        TaskCategory::Scientific,
        &["scientist", "researcher", "research"],
    ),
    (
        TaskCategory::Consulting,
        &["consultant", "advisor", "advisory"],
    ),
    (TaskCategory::Mentoring, &["mentor", "coach"]),
];

lazy_static! {
    pub static ref STOPWORDS: HashSet<&'static str> = [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "may", "might", "can", "this", "that", "these",
        "those", "from", "into", "about", "then", "than", "them", "they", "their", "what", "when",
        "where", "which", "while", "using", "some", "more", "most", "very", "just", "like", "need",
        "want", "make", "please", "help",
    ]
    .into_iter()
    .collect();
}

pub fn complexity_markers(level: Complexity) -> &'static [&'static str] {
    match level {
        Complexity::High => HIGH_COMPLEXITY_MARKERS,
        Complexity::Low => LOW_COMPLEXITY_MARKERS,
        Complexity::Medium => &[],
    }
}

pub fn urgency_markers(level: Urgency) -> &'static [&'static str] {
    match level {
        Urgency::High => HIGH_URGENCY_MARKERS,
        Urgency::Low => LOW_URGENCY_MARKERS,
        Urgency::Normal => &[],
    }
}

/// Register words for the given audience.
pub fn audience_register(audience: Audience) -> &'static [&'static str] {
    AUDIENCE_REGISTER
        .iter()
        .find(|(a, _)| *a == audience)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

/// Style qualifier for the given audience.
pub fn audience_style_suffix(audience: Audience) -> &'static str {
    AUDIENCE_STYLE_SUFFIX
        .iter()
        .find(|(a, _)| *a == audience)
        .map(|(_, suffix)| *suffix)
        .unwrap_or("appropriate for the audience")
}

/// Affinity words for the given category.
pub fn category_affinity(category: TaskCategory) -> &'static [&'static str] {
    CATEGORY_AFFINITY
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_priority_starts_with_technology() {
        assert_eq!(DOMAIN_KEYWORDS[0].0, Domain::Technology);
        assert_eq!(DOMAIN_KEYWORDS.last().map(|(d, _)| *d), Some(Domain::Healthcare));
    }

    #[test]
    fn every_category_has_affinity_words() {
        for (category, _) in CATEGORY_KEYWORDS {
            assert!(
                !category_affinity(*category).is_empty(),
                "missing affinity words for {category}"
            );
        }
    }

    #[test]
    fn finance_keywords_cover_crypto_tasks() {
        let (_, words) = DOMAIN_KEYWORDS
            .iter()
            .find(|(d, _)| *d == Domain::Finance)
            .unwrap();
        assert!(words.contains(&"cryptocurrency"));
        assert!(words.contains(&"trading"));
    }

    #[test]
    fn stopwords_filter_function_words() {
        assert!(STOPWORDS.contains("the"));
        assert!(STOPWORDS.contains("with"));
        assert!(!STOPWORDS.contains("cryptocurrency"));
    }
}
