//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::models::SearchRequest;
use crate::research::PaperSearch;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "search_papers")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry exposing the search pipeline
    pub fn new(search: Arc<PaperSearch>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        let default_max_results = search.default_max_results();
        registry.register(Tool {
            name: "search_papers".to_string(),
            description: "Search arXiv for the most recent papers matching a keyword \
                (e.g. \"LLM\", \"Quantum Computing\"), newest submissions first. \
                Returns title, authors, date, PDF link and abstract for each paper."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search keyword(s), matched against all fields"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Number of papers to return",
                        "minimum": 1,
                        "default": default_max_results
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchPapersHandler { search }),
        });

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}

/// Handler for `search_papers`
#[derive(Debug)]
pub struct SearchPapersHandler {
    pub search: Arc<PaperSearch>,
}

impl SearchPapersHandler {
    /// Validate tool arguments into a search request
    fn request(&self, args: &Value) -> Result<SearchRequest, String> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'query' parameter")?;

        let max_results = match args.get("max_results") {
            None | Some(Value::Null) => self.search.default_max_results(),
            Some(value) => match value.as_u64() {
                Some(n) if n >= 1 => usize::try_from(n).unwrap_or(usize::MAX),
                _ => return Err("'max_results' must be a positive integer".to_string()),
            },
        };

        Ok(SearchRequest::new(query).max_results(max_results))
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchPapersHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request = self.request(&args)?;
        let text = self.search.search_text(&request).await;
        Ok(Value::String(text))
    }
}
