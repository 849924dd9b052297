//! Selection and analysis tools.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::analyzer;
use crate::dispatcher::RecommendOverrides;
use crate::mcp::errors::ToolError;
use crate::mcp::tools::{optional_str, required_str, McpTool, ToolContext, ToolResult};
use crate::models::{Complexity, Domain, TaskCategory};

pub struct SelectPersonaTool;

#[async_trait]
impl McpTool for SelectPersonaTool {
    fn name(&self) -> &str {
        "select_persona"
    }

    fn description(&self) -> &str {
        "Select the best persona for a task, synthesizing a new one when no catalogue entry is confident enough"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_description": {
                    "type": "string",
                    "description": "The task to select a persona for"
                },
                "context": {
                    "type": "string",
                    "description": "Optional additional context about the task"
                }
            },
            "required": ["task_description"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let task = required_str(&params, "task_description")?;
        let extra = optional_str(&params, "context");

        let selection = context
            .dispatcher
            .select(task, extra)
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        ToolResult::json(&selection)
    }
}

pub struct RecommendPersonaTool;

#[async_trait]
impl McpTool for RecommendPersonaTool {
    fn name(&self) -> &str {
        "recommend_persona_for_task"
    }

    fn description(&self) -> &str {
        "Rank the top catalogue personas for a task without selecting or generating anything"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_description": {
                    "type": "string",
                    "description": "The task to rank personas against"
                },
                "context": {
                    "type": "string",
                    "description": "Optional additional context about the task"
                },
                "task_type": {
                    "type": "string",
                    "description": "Override the detected task category",
                    "enum": ["technical", "creative", "business", "educational", "design", "scientific", "consulting", "mentoring", "general"]
                },
                "complexity_level": {
                    "type": "string",
                    "description": "Override the detected complexity",
                    "enum": ["low", "medium", "high"]
                },
                "domain": {
                    "type": "string",
                    "description": "Override the detected domain",
                    "enum": ["technology", "business", "creative", "education", "science", "legal", "finance", "healthcare", "general"]
                }
            },
            "required": ["task_description"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let task = required_str(&params, "task_description")?;
        let extra = optional_str(&params, "context");

        let mut overrides = RecommendOverrides::default();
        if let Some(raw) = optional_str(&params, "task_type") {
            overrides.category = Some(
                raw.parse::<TaskCategory>()
                    .map_err(|err| ToolError::InvalidParams(err.to_string()))?,
            );
        }
        if let Some(raw) = optional_str(&params, "complexity_level") {
            overrides.complexity = Some(
                raw.parse::<Complexity>()
                    .map_err(|err| ToolError::InvalidParams(err.to_string()))?,
            );
        }
        if let Some(raw) = optional_str(&params, "domain") {
            overrides.domain = Some(
                raw.parse::<Domain>()
                    .map_err(|err| ToolError::InvalidParams(err.to_string()))?,
            );
        }

        let (analysis, recommendations) = context
            .dispatcher
            .recommend(task, extra, overrides)
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;

        let (confidence_score, reasoning) = recommendations
            .first()
            .map(|top| (top.confidence, top.reasoning.clone()))
            .unwrap_or((0.0, "No candidates available".to_string()));

        ToolResult::json(&json!({
            "analysis": analysis,
            "recommendations": recommendations,
            "confidence_score": confidence_score,
            "reasoning": reasoning,
        }))
    }
}

pub struct AnalyzeTaskTool;

#[async_trait]
impl McpTool for AnalyzeTaskTool {
    fn name(&self) -> &str {
        "analyze_task"
    }

    fn description(&self) -> &str {
        "Analyze a task description into domain, category, complexity, urgency, audience, output format and keywords"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_description": {
                    "type": "string",
                    "description": "The task to analyze"
                },
                "context": {
                    "type": "string",
                    "description": "Optional additional context about the task"
                }
            },
            "required": ["task_description"]
        })
    }

    async fn execute(&self, params: Value, _context: &ToolContext) -> Result<ToolResult, ToolError> {
        let task = required_str(&params, "task_description")?;
        let extra = optional_str(&params, "context");
        let analysis = analyzer::analyze(task, extra);
        ToolResult::json(&analysis)
    }
}

pub struct EchoCurrentPersonaTool;

#[async_trait]
impl McpTool for EchoCurrentPersonaTool {
    fn name(&self) -> &str {
        "echo_current_persona"
    }

    fn description(&self) -> &str {
        "Report the persona chosen by the most recent selection, if any"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        match context.dispatcher.current_persona() {
            Some(current) => ToolResult::json(&current),
            None => Ok(ToolResult::text("No persona currently selected")),
        }
    }
}
