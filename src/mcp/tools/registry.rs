use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::mcp::errors::{McpError, McpResult, ToolError};
use crate::mcp::tools::{McpTool, ToolContext, ToolResult};

/// Tool description returned by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Holds every registered tool and routes `tools/call` to it. Registration
/// happens once at startup; after that the registry is read-only.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, tool: Box<dyn McpTool>) -> McpResult<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(McpError::Tool(ToolError::InvalidParams(format!(
                "tool '{name}' is already registered"
            ))));
        }
        debug!(%name, "registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools
            .values()
            .map(|tool| ToolInfo {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn call(
        &self,
        name: &str,
        params: Value,
        context: &ToolContext,
    ) -> McpResult<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| McpError::Tool(ToolError::NotFound(name.to_string())))?;
        info!(tool = name, "executing tool");
        tool.execute(params, context).await.map_err(McpError::Tool)
    }
}

/// Build the registry with the full persona tool set.
pub fn default_registry() -> McpResult<ToolRegistry> {
    use crate::mcp::tools::{dispatch, generation, personas};

    let mut registry = ToolRegistry::new();

    registry.register(Box::new(dispatch::SelectPersonaTool))?;
    registry.register(Box::new(dispatch::RecommendPersonaTool))?;
    registry.register(Box::new(dispatch::AnalyzeTaskTool))?;
    registry.register(Box::new(dispatch::EchoCurrentPersonaTool))?;

    registry.register(Box::new(generation::EnableAutoGenerationTool))?;
    registry.register(Box::new(generation::SetConfidenceThresholdTool))?;
    registry.register(Box::new(generation::GetAutoGenerationStatusTool))?;
    registry.register(Box::new(generation::ListGeneratedPersonasTool))?;

    registry.register(Box::new(personas::ListPersonasTool))?;
    registry.register(Box::new(personas::GetPersonaTool))?;
    registry.register(Box::new(personas::CreatePersonaTool))?;
    registry.register(Box::new(personas::UpdatePersonaTool))?;
    registry.register(Box::new(personas::DeletePersonaTool))?;
    registry.register(Box::new(personas::SearchPersonasTool))?;
    registry.register(Box::new(personas::GetPersonaStatisticsTool))?;

    info!(count = registry.len(), "registered persona tools");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::test_context;
    use serde_json::json;

    #[test]
    fn default_registry_exposes_the_full_tool_set() {
        let registry = default_registry().unwrap();
        let names: Vec<String> = registry.list().into_iter().map(|t| t.name).collect();

        for expected in [
            "select_persona",
            "recommend_persona_for_task",
            "analyze_task",
            "echo_current_persona",
            "enable_auto_generation",
            "set_confidence_threshold",
            "get_auto_generation_status",
            "list_generated_personas",
            "list_personas",
            "get_persona",
            "create_persona",
            "update_persona",
            "delete_persona",
            "search_personas",
            "get_persona_statistics",
        ] {
            assert!(names.contains(&expected.to_string()), "missing {expected}");
        }
        assert_eq!(registry.len(), 15);
    }

    #[test]
    fn every_tool_carries_an_object_schema() {
        let registry = default_registry().unwrap();
        for tool in registry.list() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Box::new(crate::mcp::tools::personas::ListPersonasTool))
            .unwrap();
        assert!(registry
            .register(Box::new(crate::mcp::tools::personas::ListPersonasTool))
            .is_err());
    }

    #[tokio::test]
    async fn unknown_tool_call_fails_with_not_found() {
        let (_dir, context) = test_context();
        let registry = default_registry().unwrap();
        let err = registry.call("no_such_tool", json!({}), &context).await;
        assert!(matches!(
            err,
            Err(McpError::Tool(ToolError::NotFound(_)))
        ));
    }
}
