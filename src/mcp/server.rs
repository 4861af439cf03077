//! MCP server implementation using pmcp (Pragmatic AI's rust-mcp-sdk).
//!
//! Serves the tool registry over stdio or the streamable HTTP transport.
//! Both transports deliver tool results as plain text.

use crate::mcp::content::{ToolTextMiddleware, ToolTextTransport};
use crate::mcp::tools::ToolRegistry;
use crate::research::PaperSearch;
use async_trait::async_trait;
use pmcp::server::http_middleware::ServerHttpMiddlewareChain;
use pmcp::server::streamable_http_server::{StreamableHttpServer, StreamableHttpServerConfig};
use pmcp::{
    Error, RequestHandlerExtra, Server, ServerCapabilities, StdioTransport, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Name the server reports to MCP clients
pub const SERVER_NAME: &str = "arxiv-researcher";

/// The MCP server exposing arXiv search
#[derive(Debug, Clone)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
    tools: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server around a search pipeline
    pub fn new(search: Arc<PaperSearch>) -> Result<Self, pmcp::Error> {
        let tools = ToolRegistry::new(search);
        let server = Self::build_server_impl(&tools)?;
        Ok(Self {
            server: Arc::new(Mutex::new(server)),
            tools: Arc::new(tools),
        })
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Build the MCP server with tool handlers (internal implementation)
    fn build_server_impl(tools: &ToolRegistry) -> Result<Server, pmcp::Error> {
        let mut http_middleware = ServerHttpMiddlewareChain::new();
        http_middleware.add(Arc::new(ToolTextMiddleware));

        let mut builder = Server::builder()
            .name(SERVER_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .capabilities(ServerCapabilities::default())
            .with_http_middleware(Arc::new(http_middleware));

        for tool in tools.all() {
            let tool_handler = ToolWrapper {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: tool.input_schema.clone(),
                handler: tool.handler.clone(),
            };
            builder = builder.tool(tool_handler.name.clone(), tool_handler);
        }

        builder.build()
    }

    /// Run the server in stdio mode (for desktop MCP clients)
    pub async fn run(self) -> Result<(), pmcp::Error> {
        tracing::info!("Starting MCP server in stdio mode");

        // run() takes ownership of the Server
        let server = Arc::try_unwrap(self.server)
            .map_err(|_| Error::internal("Cannot unwrap Arc - multiple references exist"))?
            .into_inner();

        server
            .run(ToolTextTransport::new(StdioTransport::new()))
            .await
    }

    /// Run the server over streamable HTTP, returning the bound address
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), pmcp::Error> {
        tracing::info!("Starting MCP server in HTTP mode on {}", addr);

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid address: {}", e)))?;

        let config = StreamableHttpServerConfig {
            http_middleware: self.server.lock().await.http_middleware(),
            ..Default::default()
        };
        let http_server = StreamableHttpServer::with_config(socket_addr, self.server.clone(), config);
        http_server.start().await
    }
}

/// Wrapper for adapting our Tool to pmcp's ToolHandler
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    handler: Arc<dyn crate::mcp::tools::ToolHandler>,
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        self.handler
            .execute(args)
            .await
            .map_err(Error::invalid_params)
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}
