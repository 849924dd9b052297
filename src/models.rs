use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::PersonaError;

/// A persona record: a named bundle of expertise, communication style and
/// behavioral metadata. This is the fully-validated shape the core operates
/// on; raw JSON is only ever converted into it at the repository boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub description: String,
    pub expertise: Vec<String>,
    #[serde(default)]
    pub communication_style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality_traits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_templates: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise_details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication_guidelines: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_category: Option<TaskCategory>,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl Persona {
    /// Validate the structural invariants of a persona payload.
    ///
    /// Called at the repository boundary on every create and update so that
    /// the scoring pipeline never sees a malformed record.
    pub fn validate(&self) -> Result<(), PersonaError> {
        if self.id.trim().is_empty() {
            return Err(PersonaError::Validation("id must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(PersonaError::Validation("name must not be empty".into()));
        }
        if self.description.trim().is_empty() {
            return Err(PersonaError::Validation(
                "description must not be empty".into(),
            ));
        }
        if self.expertise.is_empty() {
            return Err(PersonaError::Validation(
                "expertise must contain at least one entry".into(),
            ));
        }
        if self.expertise.iter().any(|e| e.trim().is_empty()) {
            return Err(PersonaError::Validation(
                "expertise entries must be non-empty strings".into(),
            ));
        }
        if let Some(traits) = &self.personality_traits {
            if traits.iter().any(|t| t.trim().is_empty()) {
                return Err(PersonaError::Validation(
                    "personality traits must be non-empty strings".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Partial update applied to an existing persona. Identity fields (`id`,
/// `created_at`, generation metadata) are never touched by an update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub communication_style: Option<String>,
    pub context: Option<String>,
    pub personality_traits: Option<Vec<String>>,
}

/// High-level domain a task belongs to. Priority order for tie-breaking is
/// defined by the table in `keywords.rs`, not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Technology,
    Business,
    Creative,
    Education,
    Science,
    Legal,
    Finance,
    Healthcare,
    General,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Technology => "technology",
            Domain::Business => "business",
            Domain::Creative => "creative",
            Domain::Education => "education",
            Domain::Science => "science",
            Domain::Legal => "legal",
            Domain::Finance => "finance",
            Domain::Healthcare => "healthcare",
            Domain::General => "general",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Domain {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technology" => Ok(Domain::Technology),
            "business" => Ok(Domain::Business),
            "creative" => Ok(Domain::Creative),
            "education" => Ok(Domain::Education),
            "science" => Ok(Domain::Science),
            "legal" => Ok(Domain::Legal),
            "finance" => Ok(Domain::Finance),
            "healthcare" => Ok(Domain::Healthcare),
            "general" => Ok(Domain::General),
            other => Err(PersonaError::Validation(format!("unknown domain: {other}"))),
        }
    }
}

/// The eight fixed task categories, plus a general fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Technical,
    Creative,
    Business,
    Educational,
    Design,
    Scientific,
    Consulting,
    Mentoring,
    General,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Technical => "technical",
            TaskCategory::Creative => "creative",
            TaskCategory::Business => "business",
            TaskCategory::Educational => "educational",
            TaskCategory::Design => "design",
            TaskCategory::Scientific => "scientific",
            TaskCategory::Consulting => "consulting",
            TaskCategory::Mentoring => "mentoring",
            TaskCategory::General => "general",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technical" => Ok(TaskCategory::Technical),
            "creative" => Ok(TaskCategory::Creative),
            "business" => Ok(TaskCategory::Business),
            "educational" => Ok(TaskCategory::Educational),
            "design" => Ok(TaskCategory::Design),
            "scientific" => Ok(TaskCategory::Scientific),
            "consulting" => Ok(TaskCategory::Consulting),
            "mentoring" => Ok(TaskCategory::Mentoring),
            "general" => Ok(TaskCategory::General),
            other => Err(PersonaError::Validation(format!(
                "unknown task category: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

impl FromStr for Complexity {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Complexity::Low),
            "medium" => Ok(Complexity::Medium),
            "high" => Ok(Complexity::High),
            other => Err(PersonaError::Validation(format!(
                "unknown complexity level: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Technical,
    Business,
    General,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Code,
    Analysis,
    Creative,
    Documentation,
}

/// Structured analysis of a raw task description. Ephemeral: recomputed per
/// request and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct TaskAnalysis {
    pub domain: Domain,
    pub category: TaskCategory,
    pub complexity: Complexity,
    pub urgency: Urgency,
    pub audience: Audience,
    pub output_format: OutputFormat,
    pub keywords: BTreeSet<String>,
}

/// A persona scored against one task. Produced fresh each dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub persona_id: String,
    pub raw_score: f64,
    pub confidence: f64,
    pub matching_expertise: Vec<String>,
    pub reasoning: String,
}

/// A candidate paired with its full persona record, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct RankedPersona {
    pub persona: Persona,
    pub confidence: f64,
    pub matching_expertise: Vec<String>,
    pub reasoning: String,
}

/// Outcome of a dispatch: the chosen persona, up to two runners-up, and
/// whether the winner was synthesized on the spot.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub selected: Option<RankedPersona>,
    pub alternatives: Vec<RankedPersona>,
    pub confidence: f64,
    pub auto_generated: bool,
    pub category: TaskCategory,
}

/// The single-slot record of the most recent selection. Overwritten on every
/// successful select; cleared when the persona it names is deleted.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentPersona {
    pub id: String,
    pub name: String,
    pub confidence: f64,
    pub selected_at: DateTime<Utc>,
}
