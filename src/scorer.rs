//! Weighted persona-to-task scoring.
//!
//! Each factor contributes units scaled by a fixed weight; the weighted sum
//! is divided by [`NORMALIZATION`] and clamped into [0, 1] to produce the
//! confidence. Zero matches on every axis yield exactly 0.0 so "no match"
//! stays distinguishable from "weak match".

use crate::analyzer::extract_keywords;
use crate::keywords::{audience_register, category_affinity};
use crate::models::{Persona, ScoredCandidate, TaskAnalysis};

const EXPERTISE_WEIGHT: f64 = 0.40;
const STYLE_WEIGHT: f64 = 0.20;
const CONTEXT_WEIGHT: f64 = 0.20;
const CATEGORY_WEIGHT: f64 = 0.15;
const TRAIT_WEIGHT: f64 = 0.05;

/// Divisor mapping summed weighted units into [0, 1]. Chosen so a full
/// verbatim overlap on a four-tag expertise list lands at 0.8 rather than
/// saturating, leaving headroom for context boosts.
pub const NORMALIZATION: f64 = 2.0;

/// Ceiling for match-derived confidence. Expertise units are uncapped, so a
/// broad enough tag overlap can push the normalized score past 1.0; clamping
/// here keeps 1.0 reserved for purpose-built personas, which in turn keeps a
/// maximal threshold guaranteed to trigger synthesis.
pub const MAX_MATCH_CONFIDENCE: f64 = 0.99;

/// Score one persona against one analyzed task.
pub fn score(analysis: &TaskAnalysis, persona: &Persona, raw_task_text: &str) -> ScoredCandidate {
    let task_text = raw_task_text.to_lowercase();
    let mut reasoning = Vec::new();

    let (expertise_units, matching_expertise) = expertise_match(analysis, persona, &task_text);
    if expertise_units > 0.0 {
        reasoning.push(format!("Expertise match: {expertise_units:.1}"));
    }

    let style_units = style_match(analysis, persona);
    if style_units > 0.0 {
        reasoning.push("Style fits audience".to_string());
    }

    let context_units = context_match(analysis, persona);
    if context_units > 0.0 {
        reasoning.push("Context alignment".to_string());
    }

    let category_units = category_match(analysis, persona);
    if category_units > 0.0 {
        reasoning.push(format!("Category match: {}", analysis.category));
    }

    let trait_units = trait_match(persona, &task_text);
    if trait_units > 0.0 {
        reasoning.push("Trait relevance".to_string());
    }

    let raw_score = expertise_units * EXPERTISE_WEIGHT
        + style_units * STYLE_WEIGHT
        + context_units * CONTEXT_WEIGHT
        + category_units * CATEGORY_WEIGHT
        + trait_units * TRAIT_WEIGHT;
    let confidence = (raw_score / NORMALIZATION).min(MAX_MATCH_CONFIDENCE);

    let reasoning = if reasoning.is_empty() {
        "No matching signals".to_string()
    } else {
        reasoning.join("; ")
    };

    ScoredCandidate {
        persona_id: persona.id.clone(),
        raw_score,
        confidence,
        matching_expertise,
        reasoning,
    }
}

/// One unit per expertise tag found verbatim in the task text, half a unit
/// when only a token of the tag shows up among the analysis keywords.
/// Uncapped: broader verbatim overlap keeps raising the score.
fn expertise_match(
    analysis: &TaskAnalysis,
    persona: &Persona,
    task_text: &str,
) -> (f64, Vec<String>) {
    let mut units = 0.0;
    let mut matching = Vec::new();

    for tag in &persona.expertise {
        let tag_lower = tag.to_lowercase();
        if tag_lower.trim().is_empty() {
            continue;
        }
        if task_text.contains(&tag_lower) {
            units += 1.0;
            matching.push(tag.clone());
        } else if tag_lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| token.len() >= 4 && analysis.keywords.contains(token))
        {
            units += 0.5;
            matching.push(tag.clone());
        }
    }

    (units, matching)
}

fn style_match(analysis: &TaskAnalysis, persona: &Persona) -> f64 {
    let style = persona.communication_style.to_lowercase();
    if style.is_empty() {
        return 0.0;
    }
    let matched = audience_register(analysis.audience)
        .iter()
        .any(|word| style.contains(word));
    if matched { 1.0 } else { 0.0 }
}

fn context_match(analysis: &TaskAnalysis, persona: &Persona) -> f64 {
    let Some(context) = &persona.context else {
        return 0.0;
    };
    let overlap = extract_keywords(context)
        .iter()
        .any(|word| analysis.keywords.contains(word));
    if overlap { 1.0 } else { 0.0 }
}

fn category_match(analysis: &TaskAnalysis, persona: &Persona) -> f64 {
    let mut haystack = persona.name.to_lowercase();
    haystack.push(' ');
    for tag in &persona.expertise {
        haystack.push_str(&tag.to_lowercase());
        haystack.push(' ');
    }
    if let Some(context) = &persona.context {
        haystack.push_str(&context.to_lowercase());
    }

    let matched = category_affinity(analysis.category)
        .iter()
        .any(|word| haystack.contains(word));
    if matched { 1.0 } else { 0.0 }
}

fn trait_match(persona: &Persona, task_text: &str) -> f64 {
    let Some(traits) = &persona.personality_traits else {
        return 0.0;
    };
    let matches = traits
        .iter()
        .filter(|t| !t.trim().is_empty() && task_text.contains(&t.to_lowercase()))
        .count();
    (matches as f64).min(1.0)
}
