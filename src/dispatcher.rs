//! Selection orchestration.
//!
//! Runs the analyzer once per request, scores every persona in the
//! catalogue, applies the optional context boost, ranks deterministically
//! and decides whether the result is confident enough or a persona must be
//! synthesized. Also owns the single current-persona slot.

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analyzer;
use crate::context_adapter::ContextAdapter;
use crate::errors::{PersonaError, PersonaResult};
use crate::generator::AutoGenerationEngine;
use crate::models::{
    Complexity, CurrentPersona, Domain, Persona, RankedPersona, Selection, TaskAnalysis,
    TaskCategory,
};
use crate::repository::PersonaRepository;
use crate::scorer;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.3;
const MAX_ALTERNATIVES: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct AutoGenerationSettings {
    pub enabled: bool,
    pub confidence_threshold: f64,
}

impl Default for AutoGenerationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Analysis overrides a caller may force on a recommendation request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendOverrides {
    pub category: Option<TaskCategory>,
    pub complexity: Option<Complexity>,
    pub domain: Option<Domain>,
}

pub struct Dispatcher {
    repository: Arc<dyn PersonaRepository>,
    generator: AutoGenerationEngine,
    context: Option<Arc<ContextAdapter>>,
    project: Option<String>,
    settings: RwLock<AutoGenerationSettings>,
    current: RwLock<Option<CurrentPersona>>,
}

impl Dispatcher {
    pub fn new(
        repository: Arc<dyn PersonaRepository>,
        context: Option<Arc<ContextAdapter>>,
        project: Option<String>,
    ) -> Self {
        Self {
            generator: AutoGenerationEngine::new(repository.clone()),
            repository,
            context,
            project,
            settings: RwLock::new(AutoGenerationSettings::default()),
            current: RwLock::new(None),
        }
    }

    /// Select the best persona for a task. Always returns a usable result:
    /// context failures degrade to no boost, an empty catalogue yields an
    /// empty low-confidence selection or a generated persona.
    pub async fn select(&self, task_description: &str, context: Option<&str>) -> PersonaResult<Selection> {
        let analysis = analyzer::analyze(task_description, context);
        let personas = self.repository.list_all()?;
        let settings = *self.settings.read();

        if personas.is_empty() {
            return self.select_from_empty_catalog(&analysis, task_description, settings);
        }

        let boost = match (&self.context, &self.project) {
            (Some(adapter), Some(project)) => {
                adapter.boost(project, &personas).await.unwrap_or_default()
            }
            _ => HashMap::new(),
        };

        let raw_text = match context {
            Some(ctx) => format!("{} {}", task_description, ctx),
            None => task_description.to_string(),
        };
        let mut ranked = rank(&analysis, &personas, &raw_text, &boost);

        let best = ranked.remove(0);
        let alternatives: Vec<RankedPersona> =
            ranked.into_iter().take(MAX_ALTERNATIVES).collect();

        let selection = if settings.enabled && best.confidence < settings.confidence_threshold {
            match self
                .generator
                .generate(&analysis, task_description, best.confidence)
            {
                Ok(generated) => {
                    let mut alternatives = alternatives;
                    alternatives.insert(0, best);
                    alternatives.truncate(MAX_ALTERNATIVES);
                    Selection {
                        selected: Some(RankedPersona {
                            persona: generated,
                            confidence: 1.0,
                            matching_expertise: Vec::new(),
                            reasoning: "Purpose-built for this task".to_string(),
                        }),
                        alternatives,
                        confidence: 1.0,
                        auto_generated: true,
                        category: analysis.category,
                    }
                }
                Err(err) => {
                    warn!(%err, "auto-generation failed, keeping best match");
                    Selection {
                        confidence: best.confidence,
                        selected: Some(best),
                        alternatives,
                        auto_generated: false,
                        category: analysis.category,
                    }
                }
            }
        } else {
            Selection {
                confidence: best.confidence,
                selected: Some(best),
                alternatives,
                auto_generated: false,
                category: analysis.category,
            }
        };

        self.record_selection(&selection);
        Ok(selection)
    }

    fn select_from_empty_catalog(
        &self,
        analysis: &TaskAnalysis,
        task_description: &str,
        settings: AutoGenerationSettings,
    ) -> PersonaResult<Selection> {
        let selection = if settings.enabled {
            let generated = self.generator.generate(analysis, task_description, 0.0)?;
            Selection {
                selected: Some(RankedPersona {
                    persona: generated,
                    confidence: 1.0,
                    matching_expertise: Vec::new(),
                    reasoning: "Purpose-built for this task".to_string(),
                }),
                alternatives: Vec::new(),
                confidence: 1.0,
                auto_generated: true,
                category: analysis.category,
            }
        } else {
            info!("selection requested against an empty catalogue");
            Selection {
                selected: None,
                alternatives: Vec::new(),
                confidence: 0.0,
                auto_generated: false,
                category: analysis.category,
            }
        };
        self.record_selection(&selection);
        Ok(selection)
    }

    fn record_selection(&self, selection: &Selection) {
        let mut current = self.current.write();
        *current = selection.selected.as_ref().map(|ranked| CurrentPersona {
            id: ranked.persona.id.clone(),
            name: ranked.persona.name.clone(),
            confidence: ranked.confidence,
            selected_at: Utc::now(),
        });
        if let Some(slot) = current.as_ref() {
            info!(id = %slot.id, confidence = slot.confidence, "selected persona");
        }
    }

    /// Score the catalogue without the context boost, for explicit
    /// recommendation requests. Returns the (possibly overridden) analysis
    /// and the top three candidates.
    pub fn recommend(
        &self,
        task_description: &str,
        context: Option<&str>,
        overrides: RecommendOverrides,
    ) -> PersonaResult<(TaskAnalysis, Vec<RankedPersona>)> {
        let mut analysis = analyzer::analyze(task_description, context);
        if let Some(category) = overrides.category {
            analysis.category = category;
        }
        if let Some(complexity) = overrides.complexity {
            analysis.complexity = complexity;
        }
        if let Some(domain) = overrides.domain {
            analysis.domain = domain;
        }

        let personas = self.repository.list_all()?;
        let raw_text = match context {
            Some(ctx) => format!("{} {}", task_description, ctx),
            None => task_description.to_string(),
        };
        let ranked = rank(&analysis, &personas, &raw_text, &HashMap::new());
        Ok((analysis, ranked.into_iter().take(3).collect()))
    }

    pub fn enable_auto_generation(&self, enabled: bool) {
        self.settings.write().enabled = enabled;
        info!(enabled, "auto-generation toggled");
    }

    pub fn set_confidence_threshold(&self, threshold: f64) -> PersonaResult<()> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PersonaError::Validation(
                "confidence threshold must be between 0.0 and 1.0".into(),
            ));
        }
        self.settings.write().confidence_threshold = threshold;
        info!(threshold, "confidence threshold updated");
        Ok(())
    }

    pub fn settings(&self) -> AutoGenerationSettings {
        *self.settings.read()
    }

    pub fn list_generated(&self) -> PersonaResult<Vec<Persona>> {
        Ok(self
            .repository
            .list_all()?
            .into_iter()
            .filter(|p| p.auto_generated)
            .collect())
    }

    pub fn current_persona(&self) -> Option<CurrentPersona> {
        self.current.read().clone()
    }

    /// Clear the slot when it names the given persona. Called on delete.
    pub fn clear_if_current(&self, persona_id: &str) {
        let mut current = self.current.write();
        if current.as_ref().is_some_and(|c| c.id == persona_id) {
            *current = None;
            info!(persona_id, "cleared current persona slot");
        }
    }
}

/// Score and rank every persona: boosted confidence descending, persona id
/// ascending on ties.
fn rank(
    analysis: &TaskAnalysis,
    personas: &[Persona],
    raw_text: &str,
    boost: &HashMap<String, f64>,
) -> Vec<RankedPersona> {
    let mut ranked: Vec<RankedPersona> = personas
        .iter()
        .map(|persona| {
            let candidate = scorer::score(analysis, persona, raw_text);
            let multiplier = boost.get(&persona.id).copied().unwrap_or(1.0);
            let confidence = (candidate.confidence * multiplier).min(scorer::MAX_MATCH_CONFIDENCE);
            let reasoning = if multiplier > 1.0 {
                format!("{} (context-boosted)", candidate.reasoning)
            } else {
                candidate.reasoning
            };
            RankedPersona {
                persona: persona.clone(),
                confidence,
                matching_expertise: candidate.matching_expertise,
                reasoning,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.persona.id.cmp(&b.persona.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FilePersonaRepository;
    use chrono::Utc;
    use tempfile::TempDir;

    fn dispatcher() -> (TempDir, Dispatcher) {
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(FilePersonaRepository::open(dir.path()).unwrap());
        (dir, Dispatcher::new(repo, None, None))
    }

    fn plain_persona(id: &str, expertise: &[&str]) -> Persona {
        let now = Utc::now();
        Persona {
            id: id.into(),
            name: id.replace('_', " "),
            description: format!("{id} description"),
            expertise: expertise.iter().map(|e| e.to_string()).collect(),
            communication_style: String::new(),
            context: None,
            personality_traits: None,
            task_templates: None,
            expertise_details: None,
            communication_guidelines: None,
            created_at: now,
            updated_at: now,
            auto_generated: false,
            generation_reason: None,
            original_task: None,
            task_category: None,
        }
    }

    #[tokio::test]
    async fn selection_is_deterministic() {
        let (_dir, dispatcher) = dispatcher();
        let task = "debug Python code with machine learning algorithms";

        let first = dispatcher.select(task, None).await.unwrap();
        let second = dispatcher.select(task, None).await.unwrap();

        let a = first.selected.unwrap();
        let b = second.selected.unwrap();
        assert_eq!(a.persona.id, b.persona.id);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.persona.id, "tech_expert");
    }

    #[tokio::test]
    async fn ties_break_by_persona_id() {
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(FilePersonaRepository::open(dir.path()).unwrap());
        for default in crate::repository::default_personas() {
            repo.delete(&default.id).unwrap();
        }
        repo.create(plain_persona("b_twin", &["kubernetes"])).unwrap();
        repo.create(plain_persona("a_twin", &["kubernetes"])).unwrap();
        let dispatcher = Dispatcher::new(repo, None, None);
        dispatcher.enable_auto_generation(false);

        let selection = dispatcher
            .select("migrate the kubernetes cluster", None)
            .await
            .unwrap();
        assert_eq!(selection.selected.unwrap().persona.id, "a_twin");
    }

    #[tokio::test]
    async fn maximal_threshold_always_generates() {
        let (_dir, dispatcher) = dispatcher();
        dispatcher.set_confidence_threshold(1.0).unwrap();

        let selection = dispatcher
            .select("debug Python code with machine learning algorithms", None)
            .await
            .unwrap();
        assert!(selection.auto_generated);
        assert_eq!(selection.confidence, 1.0);
        assert!(selection.selected.unwrap().persona.auto_generated);
    }

    #[tokio::test]
    async fn maximal_threshold_generates_even_for_a_saturating_match() {
        let (_dir, dispatcher) = dispatcher();
        let task = "debug python code with machine learning algorithms";

        // A persona matching on every factor; its normalized score exceeds
        // 1.0 before clamping.
        let mut saturated = plain_persona("wall_to_wall", &["debug", "python", "code", "machine"]);
        saturated.communication_style = "Clear and engaging".into();
        saturated.context = Some("debugging python code".into());
        saturated.personality_traits = Some(vec!["code".into()]);
        dispatcher.repository.create(saturated).unwrap();

        dispatcher.set_confidence_threshold(1.0).unwrap();
        let selection = dispatcher.select(task, None).await.unwrap();
        assert!(selection.auto_generated);
        assert!(selection.selected.unwrap().persona.auto_generated);
        assert!(
            selection
                .alternatives
                .first()
                .is_some_and(|a| a.confidence < 1.0)
        );
    }

    #[tokio::test]
    async fn disabled_auto_generation_never_synthesizes() {
        let (_dir, dispatcher) = dispatcher();
        dispatcher.enable_auto_generation(false);
        dispatcher.set_confidence_threshold(1.0).unwrap();

        let selection = dispatcher
            .select("count migratory bird sightings", None)
            .await
            .unwrap();
        assert!(!selection.auto_generated);
        assert!(dispatcher.list_generated().unwrap().is_empty());
    }

    #[tokio::test]
    async fn generation_triggers_below_threshold_and_records_metadata() {
        let (_dir, dispatcher) = dispatcher();
        let task = "analyze cryptocurrency market trends";

        let selection = dispatcher.select(task, None).await.unwrap();
        assert!(selection.auto_generated);

        let generated = dispatcher.list_generated().unwrap();
        assert_eq!(generated.len(), 1);
        let reason = generated[0].generation_reason.clone().unwrap();
        assert!(reason.contains(task));
    }

    #[tokio::test]
    async fn slot_tracks_the_latest_selection() {
        let (_dir, dispatcher) = dispatcher();
        assert!(dispatcher.current_persona().is_none());

        dispatcher
            .select("debug Python code with machine learning algorithms", None)
            .await
            .unwrap();
        let slot = dispatcher.current_persona().unwrap();
        assert_eq!(slot.id, "tech_expert");

        dispatcher.clear_if_current("someone_else");
        assert!(dispatcher.current_persona().is_some());
        dispatcher.clear_if_current("tech_expert");
        assert!(dispatcher.current_persona().is_none());
    }

    #[tokio::test]
    async fn empty_catalog_without_generation_yields_empty_selection() {
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(FilePersonaRepository::open(dir.path()).unwrap());
        for default in crate::repository::default_personas() {
            repo.delete(&default.id).unwrap();
        }
        let dispatcher = Dispatcher::new(repo, None, None);
        dispatcher.enable_auto_generation(false);

        let selection = dispatcher.select("anything at all", None).await.unwrap();
        assert!(selection.selected.is_none());
        assert_eq!(selection.confidence, 0.0);
        assert!(dispatcher.current_persona().is_none());
    }

    #[tokio::test]
    async fn empty_catalog_with_generation_synthesizes_a_fallback() {
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(FilePersonaRepository::open(dir.path()).unwrap());
        for default in crate::repository::default_personas() {
            repo.delete(&default.id).unwrap();
        }
        let dispatcher = Dispatcher::new(repo, None, None);

        let selection = dispatcher.select("anything at all", None).await.unwrap();
        let selected = selection.selected.unwrap();
        assert!(selected.persona.auto_generated);
        assert!(selection.auto_generated);
    }

    #[tokio::test]
    async fn recommend_returns_ranked_candidates_with_analysis() {
        let (_dir, dispatcher) = dispatcher();
        let (analysis, ranked) = dispatcher
            .recommend(
                "debug Python code with machine learning algorithms",
                None,
                RecommendOverrides::default(),
            )
            .unwrap();

        assert_eq!(analysis.category, TaskCategory::Technical);
        assert!(ranked.len() <= 3);
        assert_eq!(ranked[0].persona.id, "tech_expert");
    }

    #[test]
    fn threshold_validation_rejects_out_of_range_values() {
        let (_dir, dispatcher) = dispatcher();
        assert!(dispatcher.set_confidence_threshold(1.5).is_err());
        assert!(dispatcher.set_confidence_threshold(-0.1).is_err());
        assert!(dispatcher.set_confidence_threshold(0.0).is_ok());
        assert!(dispatcher.set_confidence_threshold(1.0).is_ok());
    }
}
