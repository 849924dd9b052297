//! Auto-generation control tools.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::mcp::errors::ToolError;
use crate::mcp::tools::{McpTool, ToolContext, ToolResult};

pub struct EnableAutoGenerationTool;

#[async_trait]
impl McpTool for EnableAutoGenerationTool {
    fn name(&self) -> &str {
        "enable_auto_generation"
    }

    fn description(&self) -> &str {
        "Turn automatic persona synthesis on or off"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "enabled": {
                    "type": "boolean",
                    "description": "Whether low-confidence selections may synthesize personas"
                }
            },
            "required": ["enabled"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let enabled = params
            .get("enabled")
            .and_then(Value::as_bool)
            .ok_or_else(|| ToolError::InvalidParams("missing required argument: enabled".into()))?;
        context.dispatcher.enable_auto_generation(enabled);
        Ok(ToolResult::text(format!(
            "Auto-generation {}",
            if enabled { "enabled" } else { "disabled" }
        )))
    }
}

pub struct SetConfidenceThresholdTool;

#[async_trait]
impl McpTool for SetConfidenceThresholdTool {
    fn name(&self) -> &str {
        "set_confidence_threshold"
    }

    fn description(&self) -> &str {
        "Set the confidence below which selection synthesizes a new persona (0.0 to 1.0)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "threshold": {
                    "type": "number",
                    "description": "New confidence threshold between 0.0 and 1.0",
                    "minimum": 0.0,
                    "maximum": 1.0
                }
            },
            "required": ["threshold"]
        })
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let threshold = params
            .get("threshold")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                ToolError::InvalidParams("missing required argument: threshold".into())
            })?;
        context
            .dispatcher
            .set_confidence_threshold(threshold)
            .map_err(|err| ToolError::InvalidParams(err.to_string()))?;
        Ok(ToolResult::text(format!(
            "Confidence threshold set to {threshold:.2}"
        )))
    }
}

pub struct GetAutoGenerationStatusTool;

#[async_trait]
impl McpTool for GetAutoGenerationStatusTool {
    fn name(&self) -> &str {
        "get_auto_generation_status"
    }

    fn description(&self) -> &str {
        "Report the auto-generation settings and how many personas have been synthesized"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let settings = context.dispatcher.settings();
        let total_generated = context
            .dispatcher
            .list_generated()
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?
            .len();

        ToolResult::json(&json!({
            "enabled": settings.enabled,
            "confidence_threshold": settings.confidence_threshold,
            "total_generated": total_generated,
        }))
    }
}

pub struct ListGeneratedPersonasTool;

#[async_trait]
impl McpTool for ListGeneratedPersonasTool {
    fn name(&self) -> &str {
        "list_generated_personas"
    }

    fn description(&self) -> &str {
        "List every persona the engine has synthesized, with its generation metadata"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, context: &ToolContext) -> Result<ToolResult, ToolError> {
        let generated = context
            .dispatcher
            .list_generated()
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        ToolResult::json(&json!({
            "total_generated": generated.len(),
            "generated_personas": generated,
        }))
    }
}
