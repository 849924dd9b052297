//! Catalogue CRUD tools.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::errors::PersonaError;
use crate::mcp::errors::ToolError;
use crate::mcp::tools::{
    optional_str, optional_string_list, required_str, McpTool, ToolContext, ToolResult,
};
use crate::models::{Persona, PersonaUpdate};
use crate::repository::slugify;

fn domain_error(err: PersonaError) -> ToolError {
    match err {
        PersonaError::Validation(_) | PersonaError::DuplicateId(_) | PersonaError::NotFound(_) => {
            ToolError::InvalidParams(err.to_string())
        }
        other => ToolError::ExecutionFailed(other.to_string()),
    }
}

pub struct ListPersonasTool;

#[async_trait]
impl McpTool for ListPersonasTool {
    fn name(&self) -> &str {
        "list_personas"
    }

    fn description(&self) -> &str {
        "List every persona in the catalogue; summaries by default, full records with include_metadata"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "include_metadata": {
                    "type": "boolean",
                    "description": "Return full records with timestamps and generation metadata"
                }
            }
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let include_metadata = params
            .get("include_metadata")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let personas = context.repository.list_all().map_err(domain_error)?;

        if include_metadata {
            return ToolResult::json(&json!({
                "count": personas.len(),
                "personas": personas,
            }));
        }

        let summaries: Vec<Value> = personas
            .iter()
            .map(|p| {
                json!({
                    "id": p.id,
                    "name": p.name,
                    "description": p.description,
                    "expertise": p.expertise,
                    "communication_style": p.communication_style,
                    "auto_generated": p.auto_generated,
                })
            })
            .collect();
        ToolResult::json(&json!({
            "count": summaries.len(),
            "personas": summaries,
        }))
    }
}

pub struct GetPersonaTool;

#[async_trait]
impl McpTool for GetPersonaTool {
    fn name(&self) -> &str {
        "get_persona"
    }

    fn description(&self) -> &str {
        "Fetch a single persona by id"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "persona_id": {
                    "type": "string",
                    "description": "Id of the persona to fetch"
                }
            },
            "required": ["persona_id"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let id = required_str(&params, "persona_id")?;
        let persona = context
            .repository
            .get(id)
            .map_err(domain_error)?
            .ok_or_else(|| ToolError::InvalidParams(format!("Persona not found: {id}")))?;
        ToolResult::json(&persona)
    }
}

pub struct CreatePersonaTool;

#[async_trait]
impl McpTool for CreatePersonaTool {
    fn name(&self) -> &str {
        "create_persona"
    }

    fn description(&self) -> &str {
        "Create a persona; the id is derived from the name"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Display name; also the source of the id"
                },
                "description": {
                    "type": "string",
                    "description": "What this persona is for"
                },
                "expertise": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Expertise tags, at least one"
                },
                "communication_style": {
                    "type": "string",
                    "description": "How the persona communicates"
                },
                "context": {
                    "type": "string",
                    "description": "When to use this persona"
                },
                "personality_traits": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Optional personality traits"
                }
            },
            "required": ["name", "description", "expertise"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let name = required_str(&params, "name")?;
        let description = required_str(&params, "description")?;
        let expertise = optional_string_list(&params, "expertise")?
            .ok_or_else(|| ToolError::InvalidParams("missing required argument: expertise".into()))?;
        let personality_traits = optional_string_list(&params, "personality_traits")?;

        let now = Utc::now();
        let persona = Persona {
            id: slugify(name),
            name: name.to_string(),
            description: description.to_string(),
            expertise,
            communication_style: optional_str(&params, "communication_style")
                .unwrap_or_default()
                .to_string(),
            context: optional_str(&params, "context").map(str::to_string),
            personality_traits,
            task_templates: None,
            expertise_details: None,
            communication_guidelines: None,
            created_at: now,
            updated_at: now,
            auto_generated: false,
            generation_reason: None,
            original_task: None,
            task_category: None,
        };

        let created = context.repository.create(persona).map_err(domain_error)?;
        ToolResult::json(&created)
    }
}

pub struct UpdatePersonaTool;

#[async_trait]
impl McpTool for UpdatePersonaTool {
    fn name(&self) -> &str {
        "update_persona"
    }

    fn description(&self) -> &str {
        "Update fields of an existing persona; omitted fields are left alone"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "persona_id": {
                    "type": "string",
                    "description": "Id of the persona to update"
                },
                "name": { "type": "string" },
                "description": { "type": "string" },
                "expertise": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "communication_style": { "type": "string" },
                "context": { "type": "string" },
                "personality_traits": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["persona_id"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let id = required_str(&params, "persona_id")?;
        let updates = PersonaUpdate {
            name: optional_str(&params, "name").map(str::to_string),
            description: optional_str(&params, "description").map(str::to_string),
            expertise: optional_string_list(&params, "expertise")?,
            communication_style: optional_str(&params, "communication_style").map(str::to_string),
            context: optional_str(&params, "context").map(str::to_string),
            personality_traits: optional_string_list(&params, "personality_traits")?,
        };

        let updated = context.repository.update(id, updates).map_err(domain_error)?;
        ToolResult::json(&updated)
    }
}

pub struct DeletePersonaTool;

#[async_trait]
impl McpTool for DeletePersonaTool {
    fn name(&self) -> &str {
        "delete_persona"
    }

    fn description(&self) -> &str {
        "Delete a persona; clears the current-persona slot if it names it"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "persona_id": {
                    "type": "string",
                    "description": "Id of the persona to delete"
                }
            },
            "required": ["persona_id"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let id = required_str(&params, "persona_id")?;
        context.repository.delete(id).map_err(domain_error)?;
        context.dispatcher.clear_if_current(id);
        Ok(ToolResult::text(format!("Deleted persona: {id}")))
    }
}

pub struct SearchPersonasTool;

#[async_trait]
impl McpTool for SearchPersonasTool {
    fn name(&self) -> &str {
        "search_personas"
    }

    fn description(&self) -> &str {
        "Case-insensitive substring search over persona names, descriptions and expertise"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search text"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let query = required_str(&params, "query")?;
        let matches = context.repository.search(query).map_err(domain_error)?;
        ToolResult::json(&json!({
            "query": query,
            "count": matches.len(),
            "personas": matches,
        }))
    }
}

pub struct GetPersonaStatisticsTool;

#[async_trait]
impl McpTool for GetPersonaStatisticsTool {
    fn name(&self) -> &str {
        "get_persona_statistics"
    }

    fn description(&self) -> &str {
        "Catalogue-wide statistics: totals, generated count and distributions"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let statistics = context.repository.statistics().map_err(domain_error)?;
        ToolResult::json(&statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::{test_context, ToolContent};

    fn text_of(result: &ToolResult) -> &str {
        let ToolContent::Text { text } = &result.content[0];
        text
    }

    #[tokio::test]
    async fn listing_shows_the_seeded_catalogue() {
        let (_dir, context) = test_context();
        let result = ListPersonasTool.execute(json!({}), &context).await.unwrap();
        let payload: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(payload["count"], 4);
        // Summaries omit timestamps until metadata is asked for.
        assert!(payload["personas"][0].get("created_at").is_none());

        let full = ListPersonasTool
            .execute(json!({"include_metadata": true}), &context)
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(text_of(&full)).unwrap();
        assert!(payload["personas"][0].get("created_at").is_some());
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (_dir, context) = test_context();

        let created = CreatePersonaTool
            .execute(
                json!({
                    "name": "Rust Mentor",
                    "description": "Guides developers through ownership and lifetimes",
                    "expertise": ["Rust", "Systems Programming"],
                    "communication_style": "Patient and precise"
                }),
                &context,
            )
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(text_of(&created)).unwrap();
        assert_eq!(payload["id"], "rust_mentor");

        let fetched = GetPersonaTool
            .execute(json!({"persona_id": "rust_mentor"}), &context)
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(text_of(&fetched)).unwrap();
        assert_eq!(payload["name"], "Rust Mentor");
    }

    #[tokio::test]
    async fn create_rejects_duplicates_and_missing_expertise() {
        let (_dir, context) = test_context();

        let duplicate = CreatePersonaTool
            .execute(
                json!({
                    "name": "Tech Expert",
                    "description": "shadowing the seeded persona",
                    "expertise": ["Anything"]
                }),
                &context,
            )
            .await;
        assert!(matches!(duplicate, Err(ToolError::InvalidParams(_))));

        let incomplete = CreatePersonaTool
            .execute(
                json!({"name": "Nameless", "description": "no expertise"}),
                &context,
            )
            .await;
        assert!(matches!(incomplete, Err(ToolError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn update_merges_and_unknown_id_fails() {
        let (_dir, context) = test_context();

        let updated = UpdatePersonaTool
            .execute(
                json!({"persona_id": "educator", "description": "A patient mentor"}),
                &context,
            )
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(text_of(&updated)).unwrap();
        assert_eq!(payload["description"], "A patient mentor");
        assert_eq!(payload["name"], "Educator");

        let missing = UpdatePersonaTool
            .execute(json!({"persona_id": "ghost"}), &context)
            .await;
        assert!(matches!(missing, Err(ToolError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn delete_clears_the_current_slot() {
        let (_dir, context) = test_context();

        context
            .dispatcher
            .select("debug Python code with machine learning algorithms", None)
            .await
            .unwrap();
        assert!(context.dispatcher.current_persona().is_some());

        DeletePersonaTool
            .execute(json!({"persona_id": "tech_expert"}), &context)
            .await
            .unwrap();
        assert!(context.dispatcher.current_persona().is_none());
        assert!(context.repository.get("tech_expert").unwrap().is_none());
    }

    #[tokio::test]
    async fn search_finds_by_expertise() {
        let (_dir, context) = test_context();
        let result = SearchPersonasTool
            .execute(json!({"query": "machine learning"}), &context)
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(payload["count"], 1);
        assert_eq!(payload["personas"][0]["id"], "tech_expert");
    }

    #[tokio::test]
    async fn statistics_cover_the_seeded_catalogue() {
        let (_dir, context) = test_context();
        let result = GetPersonaStatisticsTool
            .execute(json!({}), &context)
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(payload["total_personas"], 4);
        assert_eq!(payload["auto_generated"], 0);
        assert!(payload["expertise_distribution"]["Python"].is_number());
    }
}
