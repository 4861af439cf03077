//! # arXiv Researcher
//!
//! A Model Context Protocol (MCP) server exposing one tool, `search_papers`,
//! which queries the arXiv API by keyword and returns formatted paper summaries.
//!
//! ## Architecture
//!
//! - [`sources`]: the outbound call to arXiv (query executor)
//! - [`feed`]: Atom parsing and text rendering (feed formatter)
//! - [`research`]: the pipeline tying the two together
//! - [`models`]: paper records, search requests and outcomes
//! - [`mcp`]: MCP tool registry and server
//! - [`utils`]: HTTP client
//! - [`config`]: Configuration management

pub mod config;
pub mod feed;
pub mod mcp;
pub mod models;
pub mod research;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{PaperRecord, SearchOutcome, SearchRequest};
pub use research::PaperSearch;
pub use sources::{Source, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
