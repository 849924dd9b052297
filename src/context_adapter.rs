//! Project-context integration.
//!
//! Fetches a snapshot of external project state over HTTP and turns it into
//! a score-boost signal for the dispatcher. Isolated by design: every
//! failure path (network, timeout, malformed body) yields `None`, which the
//! dispatcher treats exactly like "no context available".

use dashmap::DashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::analyzer::extract_keywords;
use crate::errors::{PersonaError, PersonaResult};
use crate::keywords::category_affinity;
use crate::models::{Domain, Persona};

/// Multiplier applied to context-recommended personas.
pub const CONTEXT_BOOST: f64 = 1.5;

const SNAPSHOT_TTL: Duration = Duration::from_secs(300);
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote project snapshot, as served by `GET {base}/project/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextSnapshot {
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub recommended_domains: Vec<String>,
}

struct CachedSnapshot {
    snapshot: ContextSnapshot,
    fetched_at: Instant,
}

pub struct ContextAdapter {
    client: reqwest::Client,
    base_url: String,
    cache: DashMap<String, CachedSnapshot>,
    ttl: Duration,
}

impl ContextAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            cache: DashMap::new(),
            ttl: SNAPSHOT_TTL,
        }
    }

    #[cfg(test)]
    fn with_ttl(base_url: impl Into<String>, ttl: Duration) -> Self {
        let mut adapter = Self::new(base_url);
        adapter.ttl = ttl;
        adapter
    }

    /// Boost multipliers for the given catalogue, or `None` when no usable
    /// context exists. Absent ids carry an implicit 1.0.
    pub async fn boost(&self, project: &str, personas: &[Persona]) -> Option<HashMap<String, f64>> {
        let snapshot = self.snapshot(project).await?;
        let recommended = recommended_ids(&snapshot, personas);
        if recommended.is_empty() {
            return Some(HashMap::new());
        }
        info!(project, count = recommended.len(), "context-recommended personas");
        Some(
            recommended
                .into_iter()
                .map(|id| (id, CONTEXT_BOOST))
                .collect(),
        )
    }

    /// Cached-or-fetched snapshot for a project. Fetch failures are logged
    /// and swallowed here; callers only ever see "no context".
    async fn snapshot(&self, project: &str) -> Option<ContextSnapshot> {
        if let Some(cached) = self.cache.get(project) {
            if cached.fetched_at.elapsed() < self.ttl {
                return Some(cached.snapshot.clone());
            }
        }

        let snapshot = match self.fetch(project).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                debug!(project, %err, "context fetch failed");
                return None;
            }
        };

        self.cache.insert(
            project.to_string(),
            CachedSnapshot {
                snapshot: snapshot.clone(),
                fetched_at: Instant::now(),
            },
        );
        Some(snapshot)
    }

    async fn fetch(&self, project: &str) -> PersonaResult<ContextSnapshot> {
        let url = format!("{}/project/{}", self.base_url.trim_end_matches('/'), project);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| PersonaError::ContextUnavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PersonaError::ContextUnavailable(format!(
                "{url} answered {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|err| PersonaError::ContextUnavailable(err.to_string()))
    }
}

/// Personas the snapshot recommends: their expertise, name or context
/// overlaps a recommended domain's vocabulary, or shares at least two
/// keywords with the project's goal, issues and next steps.
pub fn recommended_ids(snapshot: &ContextSnapshot, personas: &[Persona]) -> Vec<String> {
    let mut snapshot_text = snapshot.goal.clone();
    for line in snapshot.issues.iter().chain(&snapshot.next_steps) {
        snapshot_text.push(' ');
        snapshot_text.push_str(line);
    }
    let snapshot_keywords = extract_keywords(&snapshot_text);

    let domains: Vec<Domain> = snapshot
        .recommended_domains
        .iter()
        .filter_map(|d| d.parse().ok())
        .collect();

    let mut recommended = Vec::new();
    for persona in personas {
        let mut haystack = persona.name.to_lowercase();
        for tag in &persona.expertise {
            haystack.push(' ');
            haystack.push_str(&tag.to_lowercase());
        }
        if let Some(context) = &persona.context {
            haystack.push(' ');
            haystack.push_str(&context.to_lowercase());
        }

        let domain_hit = domains.iter().any(|domain| {
            haystack.contains(domain.as_str())
                || crate::keywords::DOMAIN_KEYWORDS
                    .iter()
                    .find(|(d, _)| d == domain)
                    .map(|(_, words)| words.iter().any(|w| haystack.contains(w)))
                    .unwrap_or(false)
        }) || snapshot
            .recommended_domains
            .iter()
            .any(|d| haystack.contains(&d.to_lowercase()));

        let category_hit = domains.iter().any(|domain| {
            domain_categories(*domain)
                .iter()
                .any(|c| category_affinity(*c).iter().any(|w| haystack.contains(w)))
        });

        let keyword_overlap = extract_keywords(&haystack)
            .intersection(&snapshot_keywords)
            .count();

        if domain_hit || category_hit || keyword_overlap >= 2 {
            recommended.push(persona.id.clone());
        }
    }
    recommended
}

/// Categories a recommended domain speaks for when matching affinity words.
fn domain_categories(domain: Domain) -> &'static [crate::models::TaskCategory] {
    use crate::models::TaskCategory::*;
    match domain {
        Domain::Technology => &[Technical],
        Domain::Business | Domain::Finance => &[Business, Consulting],
        Domain::Creative => &[Creative, Design],
        Domain::Education => &[Educational, Mentoring],
        Domain::Science | Domain::Healthcare => &[Scientific],
        Domain::Legal => &[Consulting],
        Domain::General => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::default_personas;

    fn snapshot(goal: &str, domains: &[&str]) -> ContextSnapshot {
        ContextSnapshot {
            goal: goal.into(),
            issues: vec![],
            next_steps: vec![],
            recommended_domains: domains.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn technology_recommendation_selects_the_tech_expert() {
        let personas = default_personas();
        let ids = recommended_ids(&snapshot("ship the release", &["technology"]), &personas);
        assert!(ids.contains(&"tech_expert".to_string()));
        assert!(!ids.contains(&"creative_writer".to_string()));
    }

    #[test]
    fn goal_keyword_overlap_recommends_matching_personas() {
        let personas = default_personas();
        let focused = snapshot(
            "improve curriculum design and learning theory coverage",
            &[],
        );
        let ids = recommended_ids(&focused, &personas);
        assert!(ids.contains(&"educator".to_string()));
        assert!(!ids.contains(&"creative_writer".to_string()));
    }

    #[test]
    fn empty_snapshot_recommends_nobody() {
        let personas = default_personas();
        let ids = recommended_ids(&snapshot("", &[]), &personas);
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn unreachable_service_degrades_to_none() {
        let adapter = ContextAdapter::new("http://127.0.0.1:9");
        let personas = default_personas();
        assert!(adapter.boost("demo", &personas).await.is_none());
    }

    #[tokio::test]
    async fn fetch_failure_is_a_context_unavailable_error() {
        let adapter = ContextAdapter::new("http://127.0.0.1:9");
        assert!(matches!(
            adapter.fetch("demo").await,
            Err(PersonaError::ContextUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn cache_entry_expires_after_ttl() {
        let adapter = ContextAdapter::with_ttl("http://127.0.0.1:9", Duration::from_millis(10));
        adapter.cache.insert(
            "demo".into(),
            CachedSnapshot {
                snapshot: snapshot("build the parser", &["technology"]),
                fetched_at: Instant::now(),
            },
        );

        // Fresh entry is served from cache without touching the network.
        assert!(adapter.snapshot("demo").await.is_some());

        tokio::time::sleep(Duration::from_millis(20)).await;
        // Stale entry forces a refetch, which fails against the dead port.
        assert!(adapter.snapshot("demo").await.is_none());
    }
}
