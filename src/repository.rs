//! Persona persistence.
//!
//! [`PersonaRepository`] is the seam between the selection core and storage.
//! The shipped implementation keeps the whole catalogue in a single JSON file
//! and an in-memory map guarded by a lock; every mutation is validated,
//! applied to the map, and flushed to disk before the call returns.

use chrono::Utc;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{PersonaError, PersonaResult};
use crate::models::{Persona, PersonaUpdate};

/// Catalogue-wide statistics returned by the statistics tool.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaStatistics {
    pub total_personas: usize,
    pub auto_generated: usize,
    pub expertise_distribution: BTreeMap<String, usize>,
    pub communication_style_distribution: BTreeMap<String, usize>,
}

/// CRUD and search over persona records.
pub trait PersonaRepository: Send + Sync {
    fn list_all(&self) -> PersonaResult<Vec<Persona>>;
    fn get(&self, id: &str) -> PersonaResult<Option<Persona>>;
    /// Fails with [`PersonaError::DuplicateId`] when the id is taken.
    fn create(&self, persona: Persona) -> PersonaResult<Persona>;
    fn update(&self, id: &str, updates: PersonaUpdate) -> PersonaResult<Persona>;
    fn delete(&self, id: &str) -> PersonaResult<()>;
    /// Case-insensitive substring search over name, description and expertise.
    fn search(&self, query: &str) -> PersonaResult<Vec<Persona>>;
    fn statistics(&self) -> PersonaResult<PersonaStatistics>;
}

lazy_static! {
    static ref NON_SLUG: Regex = Regex::new(r"[^a-z0-9\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Derive a stable id slug from a persona name.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let cleaned = NON_SLUG.replace_all(&lowered, "");
    WHITESPACE
        .replace_all(cleaned.trim(), "_")
        .trim_matches('_')
        .to_string()
}

/// File-backed repository: one `personas.json` holding an id-keyed map.
pub struct FilePersonaRepository {
    path: PathBuf,
    personas: RwLock<BTreeMap<String, Persona>>,
}

impl FilePersonaRepository {
    /// Open (or initialize) the store under `dir`. An empty store is seeded
    /// with the default catalogue so a fresh install can always select
    /// something.
    pub fn open(dir: &Path) -> PersonaResult<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join("personas.json");

        let personas = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeMap<String, Persona>>(&raw) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), %err, "unreadable persona store, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        let repo = Self {
            path,
            personas: RwLock::new(personas),
        };

        if repo.personas.read().is_empty() {
            repo.seed_defaults()?;
        }

        Ok(repo)
    }

    fn flush(&self, personas: &BTreeMap<String, Persona>) -> PersonaResult<()> {
        let raw = serde_json::to_string_pretty(personas)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn seed_defaults(&self) -> PersonaResult<()> {
        let mut personas = self.personas.write();
        for persona in default_personas() {
            personas.insert(persona.id.clone(), persona);
        }
        self.flush(&personas)?;
        info!("seeded default persona catalogue");
        Ok(())
    }
}

impl PersonaRepository for FilePersonaRepository {
    fn list_all(&self) -> PersonaResult<Vec<Persona>> {
        Ok(self.personas.read().values().cloned().collect())
    }

    fn get(&self, id: &str) -> PersonaResult<Option<Persona>> {
        Ok(self.personas.read().get(id).cloned())
    }

    fn create(&self, persona: Persona) -> PersonaResult<Persona> {
        persona.validate()?;
        let mut personas = self.personas.write();
        if personas.contains_key(&persona.id) {
            return Err(PersonaError::DuplicateId(persona.id));
        }
        personas.insert(persona.id.clone(), persona.clone());
        self.flush(&personas)?;
        debug!(id = %persona.id, "created persona");
        Ok(persona)
    }

    fn update(&self, id: &str, updates: PersonaUpdate) -> PersonaResult<Persona> {
        let mut personas = self.personas.write();
        let existing = personas
            .get(id)
            .cloned()
            .ok_or_else(|| PersonaError::NotFound(id.to_string()))?;

        let mut updated = existing;
        if let Some(name) = updates.name {
            updated.name = name;
        }
        if let Some(description) = updates.description {
            updated.description = description;
        }
        if let Some(expertise) = updates.expertise {
            updated.expertise = expertise;
        }
        if let Some(style) = updates.communication_style {
            updated.communication_style = style;
        }
        if let Some(context) = updates.context {
            updated.context = Some(context);
        }
        if let Some(traits) = updates.personality_traits {
            updated.personality_traits = Some(traits);
        }
        updated.updated_at = Utc::now();
        updated.validate()?;

        personas.insert(id.to_string(), updated.clone());
        self.flush(&personas)?;
        debug!(id, "updated persona");
        Ok(updated)
    }

    fn delete(&self, id: &str) -> PersonaResult<()> {
        let mut personas = self.personas.write();
        if personas.remove(id).is_none() {
            return Err(PersonaError::NotFound(id.to_string()));
        }
        self.flush(&personas)?;
        debug!(id, "deleted persona");
        Ok(())
    }

    fn search(&self, query: &str) -> PersonaResult<Vec<Persona>> {
        let needle = query.to_lowercase();
        Ok(self
            .personas
            .read()
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.expertise
                        .iter()
                        .any(|e| e.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    fn statistics(&self) -> PersonaResult<PersonaStatistics> {
        let personas = self.personas.read();
        let mut expertise_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut communication_style_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut auto_generated = 0;

        for persona in personas.values() {
            for tag in &persona.expertise {
                *expertise_distribution.entry(tag.clone()).or_default() += 1;
            }
            let style = if persona.communication_style.is_empty() {
                "Unknown".to_string()
            } else {
                persona.communication_style.clone()
            };
            *communication_style_distribution.entry(style).or_default() += 1;
            if persona.auto_generated {
                auto_generated += 1;
            }
        }

        Ok(PersonaStatistics {
            total_personas: personas.len(),
            auto_generated,
            expertise_distribution,
            communication_style_distribution,
        })
    }
}

fn seed(
    id: &str,
    name: &str,
    description: &str,
    expertise: &[&str],
    style: &str,
    context: &str,
    traits: &[&str],
) -> Persona {
    let now = Utc::now();
    Persona {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        expertise: expertise.iter().map(|e| e.to_string()).collect(),
        communication_style: style.to_string(),
        context: Some(context.to_string()),
        personality_traits: Some(traits.iter().map(|t| t.to_string()).collect()),
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

/// The catalogue a fresh store starts with.
pub fn default_personas() -> Vec<Persona> {
    vec![
        seed(
            "tech_expert",
            "Tech Expert",
            "A knowledgeable software engineer with expertise in Python, AI, and system architecture",
            &["Python", "Machine Learning", "Software Architecture", "API Design"],
            "Professional and technical",
            "Use when discussing technical implementation details, code reviews, or system design",
            &["analytical", "detail-oriented", "problem-solver"],
        ),
        seed(
            "creative_writer",
            "Creative Writer",
            "An imaginative storyteller with a flair for engaging narratives and creative content",
            &["Creative Writing", "Storytelling", "Content Creation", "Marketing Copy"],
            "Engaging and imaginative",
            "Use when creating stories, marketing content, or creative writing projects",
            &["creative", "imaginative", "expressive"],
        ),
        seed(
            "business_analyst",
            "Business Analyst",
            "A strategic thinker focused on business processes, data analysis, and market insights",
            &["Business Analysis", "Data Analysis", "Process Optimization", "Market Research"],
            "Strategic and analytical",
            "Use when analyzing business processes, market trends, or strategic planning",
            &["strategic", "analytical", "business-focused"],
        ),
        seed(
            "educator",
            "Educator",
            "A patient teacher who excels at explaining complex concepts in simple terms",
            &["Education", "Curriculum Design", "Instructional Design", "Learning Theory"],
            "Patient and explanatory",
            "Use when teaching concepts, creating educational content, or explaining complex topics",
            &["patient", "explanatory", "encouraging"],
        ),
    ]
}
