//! MCP (Model Context Protocol) implementation.

mod content;
pub mod server;
mod tools;

pub use content::{ToolTextMiddleware, ToolTextTransport};
pub use server::{McpServer, SERVER_NAME};
pub use tools::{SearchPapersHandler, Tool, ToolHandler, ToolRegistry};
