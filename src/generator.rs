//! Template-driven persona synthesis.
//!
//! When the dispatcher's best candidate falls under the confidence
//! threshold, this engine picks the best-fitting template for the analyzed
//! task, customizes it into a full persona and persists it. Generation never
//! comes back empty: a generic fallback template always applies.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::{PersonaError, PersonaResult};
use crate::models::{Complexity, Domain, Persona, TaskAnalysis, Urgency};
use crate::repository::{slugify, PersonaRepository};
use crate::templates::{
    domain_description_suffix, domain_expertise, templates_for_domain, Template, GENERIC_TEMPLATES,
};
use crate::keywords::audience_style_suffix;

const MAX_KEYWORD_EXPERTISE: usize = 5;
const MAX_CREATE_ATTEMPTS: usize = 5;

pub struct AutoGenerationEngine {
    repository: Arc<dyn PersonaRepository>,
    counter: AtomicU64,
}

impl AutoGenerationEngine {
    pub fn new(repository: Arc<dyn PersonaRepository>) -> Self {
        Self {
            repository,
            counter: AtomicU64::new(1),
        }
    }

    /// Synthesize and persist a persona for the analyzed task.
    /// `trigger_confidence` is the best score that failed the threshold; it
    /// is recorded in the generation reason.
    pub fn generate(
        &self,
        analysis: &TaskAnalysis,
        original_task: &str,
        trigger_confidence: f64,
    ) -> PersonaResult<Persona> {
        let template = select_template(analysis, original_task);
        let persona = self.customize(template, analysis, original_task, trigger_confidence);
        self.create_with_retry(persona)
    }

    fn customize(
        &self,
        template: &Template,
        analysis: &TaskAnalysis,
        original_task: &str,
        trigger_confidence: f64,
    ) -> Persona {
        let name = customize_name(template.name_pattern, analysis.domain, original_task);
        let description = match domain_description_suffix(analysis.domain) {
            Some(suffix) => format!("{} {}", template.description, suffix),
            None => template.description.to_string(),
        };
        let expertise = expand_expertise(template, analysis);
        let communication_style = format!(
            "{}, {}",
            template.base_communication_style,
            audience_style_suffix(analysis.audience)
        );
        let context = customize_context(template.context, analysis);

        let id = format!(
            "{}_{}",
            slugify(&name),
            self.counter.fetch_add(1, Ordering::Relaxed)
        );
        let now = Utc::now();

        Persona {
            id,
            name,
            description,
            expertise,
            communication_style,
            context: Some(context),
            personality_traits: Some(
                template
                    .base_personality_traits
                    .iter()
                    .map(|t| t.to_string())
                    .collect(),
            ),
            task_templates: None,
            expertise_details: None,
            communication_guidelines: None,
            created_at: now,
            updated_at: now,
            auto_generated: true,
            generation_reason: Some(format!(
                "Low confidence ({trigger_confidence:.2}) for task: {original_task}"
            )),
            original_task: Some(original_task.to_string()),
            task_category: Some(analysis.category),
        }
    }

    /// Persist the persona, re-suffixing the id on collision.
    fn create_with_retry(&self, mut persona: Persona) -> PersonaResult<Persona> {
        let slug = slugify(&persona.name);
        for attempt in 0..MAX_CREATE_ATTEMPTS {
            match self.repository.create(persona.clone()) {
                Ok(created) => {
                    info!(id = %created.id, name = %created.name, "generated persona");
                    return Ok(created);
                }
                Err(PersonaError::DuplicateId(taken)) => {
                    let suffix: String = rand::thread_rng()
                        .sample_iter(&Alphanumeric)
                        .take(6)
                        .map(|c| (c as char).to_ascii_lowercase())
                        .collect();
                    warn!(%taken, attempt, "generated id collision, retrying");
                    persona.id = format!("{slug}_{suffix}");
                }
                Err(other) => return Err(other),
            }
        }
        Err(PersonaError::DuplicateId(persona.id))
    }
}

/// Score the analysis domain's templates; fall back to the generic ones when
/// the domain has no template scoring above zero. Declaration order breaks
/// ties.
fn select_template(analysis: &TaskAnalysis, original_task: &str) -> &'static Template {
    let task_lower = original_task.to_lowercase();

    let mut best: Option<(&Template, u32)> = None;
    for template in templates_for_domain(analysis.domain) {
        let score = template_score(template, analysis, &task_lower);
        if score > 0 && best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((template, score));
        }
    }
    if let Some((template, _)) = best {
        return template;
    }

    GENERIC_TEMPLATES
        .iter()
        .find(|t| t.category == analysis.category)
        .unwrap_or(&GENERIC_TEMPLATES[0])
}

fn template_score(template: &Template, analysis: &TaskAnalysis, task_lower: &str) -> u32 {
    let mut score = 0;
    if template.category == analysis.category {
        score += 3;
    }
    score += analysis
        .keywords
        .iter()
        .filter(|keyword| {
            template
                .base_expertise
                .iter()
                .any(|tag| tag.to_lowercase().contains(keyword.as_str()))
        })
        .count() as u32;
    let name_hit = template
        .name_pattern
        .to_lowercase()
        .split_whitespace()
        .any(|token| task_lower.contains(token));
    if name_hit {
        score += 1;
    }
    score
}

fn customize_name(base_name: &str, domain: Domain, original_task: &str) -> String {
    let task_lower = original_task.to_lowercase();
    let tokens: BTreeSet<&str> = task_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let any = |words: &[&str]| words.iter().any(|w| tokens.contains(w));

    match domain {
        Domain::Technology if any(&["ai", "machine", "learning"]) => format!("AI {base_name}"),
        Domain::Science if any(&["medical", "health", "clinical"]) => {
            format!("Medical {base_name}")
        }
        Domain::Business if any(&["financial", "investment", "trading"]) => {
            format!("Financial {base_name}")
        }
        Domain::Creative if any(&["digital", "online", "web"]) => format!("Digital {base_name}"),
        _ => base_name.to_string(),
    }
}

/// Template expertise, the domain's standing additions, and up to five task
/// keywords. Order-preserving dedup.
fn expand_expertise(template: &Template, analysis: &TaskAnalysis) -> Vec<String> {
    let mut expertise: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut push = |tag: String, expertise: &mut Vec<String>| {
        if seen.insert(tag.to_lowercase()) {
            expertise.push(tag);
        }
    };

    for tag in template.base_expertise {
        push(tag.to_string(), &mut expertise);
    }
    for tag in domain_expertise(analysis.domain) {
        push(tag.to_string(), &mut expertise);
    }
    for keyword in analysis.keywords.iter().take(MAX_KEYWORD_EXPERTISE) {
        push(title_case(keyword), &mut expertise);
    }
    expertise
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn customize_context(base_context: &str, analysis: &TaskAnalysis) -> String {
    let complexity = match analysis.complexity {
        Complexity::High => "complex and advanced",
        Complexity::Medium => "moderate complexity",
        Complexity::Low => "straightforward and simple",
    };
    let urgency = match analysis.urgency {
        Urgency::High => "urgent and time-sensitive",
        Urgency::Normal => "standard timeline",
        Urgency::Low => "flexible timeline",
    };
    format!("{base_context} for {complexity} tasks with {urgency} requirements")
}
