use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::errors::PersonaError;

/// Errors raised by the MCP layer. Domain errors from the persona core are
/// wrapped so the server loop can translate everything into a single
/// JSON-RPC error shape.
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Persona(#[from] PersonaError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON-RPC version: {0}")]
    InvalidVersion(String),

    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

pub type McpResult<T> = Result<T, McpError>;

/// Standard JSON-RPC 2.0 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
    ServerError = -32000,
}

/// The error object carried in a JSON-RPC error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: JsonRpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(code: JsonRpcErrorCode, message: impl Into<String>, data: Value) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        let code = match &err {
            McpError::Serialization(_) => JsonRpcErrorCode::ParseError,
            McpError::Protocol(ProtocolError::MethodNotFound(_)) => JsonRpcErrorCode::MethodNotFound,
            McpError::Protocol(ProtocolError::InvalidParams(_)) => JsonRpcErrorCode::InvalidParams,
            McpError::Protocol(_) => JsonRpcErrorCode::InvalidRequest,
            McpError::Tool(ToolError::NotFound(_)) => JsonRpcErrorCode::MethodNotFound,
            McpError::Tool(ToolError::InvalidParams(_)) => JsonRpcErrorCode::InvalidParams,
            McpError::Tool(ToolError::ExecutionFailed(_)) => JsonRpcErrorCode::InternalError,
            McpError::Persona(PersonaError::Validation(_))
            | McpError::Persona(PersonaError::DuplicateId(_)) => JsonRpcErrorCode::InvalidParams,
            McpError::Persona(PersonaError::NotFound(_)) => JsonRpcErrorCode::InvalidParams,
            McpError::Persona(_) => JsonRpcErrorCode::ServerError,
            McpError::Transport(_) => JsonRpcErrorCode::InternalError,
        };
        JsonRpcError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_match_the_json_rpc_spec() {
        assert_eq!(JsonRpcErrorCode::ParseError as i32, -32700);
        assert_eq!(JsonRpcErrorCode::InvalidRequest as i32, -32600);
        assert_eq!(JsonRpcErrorCode::MethodNotFound as i32, -32601);
        assert_eq!(JsonRpcErrorCode::InvalidParams as i32, -32602);
        assert_eq!(JsonRpcErrorCode::InternalError as i32, -32603);
    }

    #[test]
    fn validation_failures_map_to_invalid_params() {
        let err: McpError = PersonaError::Validation("bad payload".into()).into();
        let rpc: JsonRpcError = err.into();
        assert_eq!(rpc.code, -32602);
        assert!(rpc.message.contains("bad payload"));
    }

    #[test]
    fn unknown_methods_map_to_method_not_found() {
        let err: McpError = ProtocolError::MethodNotFound("prompts/list".into()).into();
        let rpc: JsonRpcError = err.into();
        assert_eq!(rpc.code, -32601);
    }

    #[test]
    fn storage_failures_map_to_server_error() {
        let err: McpError = PersonaError::Storage("disk full".into()).into();
        let rpc: JsonRpcError = err.into();
        assert_eq!(rpc.code, -32000);
    }

    #[test]
    fn error_serializes_without_empty_data() {
        let rpc = JsonRpcError::new(JsonRpcErrorCode::InternalError, "boom");
        let json = serde_json::to_value(&rpc).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["code"], -32603);
    }
}
