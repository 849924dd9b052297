/// MCP tool surface over the persona engine.
///
/// Every operation a client can invoke through `tools/call` lives here as a
/// small [`McpTool`] implementation sharing one [`ToolContext`].
pub mod dispatch;
pub mod generation;
pub mod personas;
pub mod registry;

pub use self::registry::ToolRegistry;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::mcp::errors::ToolError;
use crate::repository::PersonaRepository;

/// A single callable tool exposed through `tools/list` and `tools/call`.
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the tool's arguments.
    fn input_schema(&self) -> Value;

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult, ToolError>;
}

/// Shared state handed to every tool execution.
#[derive(Clone)]
pub struct ToolContext {
    pub dispatcher: Arc<Dispatcher>,
    pub repository: Arc<dyn PersonaRepository>,
}

/// Result of a tool call, in the MCP content shape.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "is_false")]
    pub is_error: bool,
}

fn is_false(value: &bool) -> bool {
    !value
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Serialize a payload as pretty JSON text content.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, ToolError> {
        let text = serde_json::to_string_pretty(payload)
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        Ok(Self::text(text))
    }
}

/// Pull a required string argument out of the params object.
pub(crate) fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidParams(format!("missing required argument: {key}")))
}

pub(crate) fn optional_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

pub(crate) fn optional_string_list(params: &Value, key: &str) -> Result<Option<Vec<String>>, ToolError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ToolError::InvalidParams(format!("{key} must be a string array")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(ToolError::InvalidParams(format!(
            "{key} must be a string array"
        ))),
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> (tempfile::TempDir, ToolContext) {
    let dir = tempfile::TempDir::new().unwrap();
    let repository: Arc<dyn PersonaRepository> =
        Arc::new(crate::repository::FilePersonaRepository::open(dir.path()).unwrap());
    let dispatcher = Arc::new(Dispatcher::new(repository.clone(), None, None));
    (
        dir,
        ToolContext {
            dispatcher,
            repository,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_str_rejects_blank_and_missing_values() {
        let params = json!({"task_description": "  ", "other": 3});
        assert!(required_str(&params, "task_description").is_err());
        assert!(required_str(&params, "missing").is_err());
        assert!(required_str(&json!({"q": "ok"}), "q").is_ok());
    }

    #[test]
    fn string_lists_are_validated() {
        let params = json!({"expertise": ["Python", "Rust"], "broken": [1, 2]});
        assert_eq!(
            optional_string_list(&params, "expertise").unwrap().unwrap(),
            vec!["Python".to_string(), "Rust".to_string()]
        );
        assert!(optional_string_list(&params, "broken").is_err());
        assert!(optional_string_list(&params, "absent").unwrap().is_none());
    }

    #[test]
    fn error_flag_is_omitted_on_success() {
        let result = ToolResult::text("done");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("isError").is_none());
        assert_eq!(json["content"][0]["type"], "text");
    }
}
