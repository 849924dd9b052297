//! Model Context Protocol (MCP) server surface.
//!
//! JSON-RPC 2.0 over newline-delimited stdio: a transport feeds parsed
//! messages into the server loop, which routes `initialize`, `tools/list`
//! and `tools/call` to the tool registry.

pub mod errors;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use self::{server::McpServer, tools::McpTool, transport::McpTransport};

/// MCP protocol version implemented by this server.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

pub const SERVER_NAME: &str = "Persona MCP Server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
