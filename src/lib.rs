//! Persona selection and synthesis engine behind an MCP server.
//!
//! The core pipeline is analyzer -> scorer -> dispatcher: a raw task
//! description is analyzed into a structured shape, every catalogue persona
//! is scored against it, and the dispatcher either selects the winner or
//! asks the generation engine to synthesize a purpose-built persona. The
//! `mcp` module exposes the whole thing as JSON-RPC tools over stdio.

pub mod analyzer;
pub mod context_adapter;
pub mod dispatcher;
pub mod errors;
pub mod generator;
pub mod keywords;
pub mod mcp;
pub mod models;
pub mod repository;
pub mod scorer;
pub mod templates;

pub use dispatcher::Dispatcher;
pub use errors::{PersonaError, PersonaResult};
pub use models::{Persona, Selection, TaskAnalysis};
pub use repository::{FilePersonaRepository, PersonaRepository};
