use anyhow::Result;
use arxiv_researcher::config::{get_config, load_config};
use arxiv_researcher::mcp::McpServer;
use arxiv_researcher::models::SearchRequest;
use arxiv_researcher::research::PaperSearch;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv Researcher - search recent arXiv papers over MCP
#[derive(Parser, Debug)]
#[command(name = "arxiv-researcher")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search recent arXiv papers by keyword, as an MCP server or from the command line", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Run the MCP server (default when no command is given)
    Serve {
        /// Serve over stdio instead of HTTP (for desktop MCP clients)
        #[arg(long)]
        stdio: bool,

        /// Port for HTTP mode (default: $PORT, then 8000)
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to for HTTP mode (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,
    },

    /// Search arXiv once and print the result
    #[command(alias = "s")]
    Search {
        /// Search keyword(s)
        query: String,

        /// Number of papers to return
        #[arg(long, short, value_parser = clap::value_parser!(u64).range(1..))]
        max_results: Option<u64>,

        /// Print the structured outcome as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve {
            stdio: false,
            port: None,
            host: None,
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if quiet { "error" } else { log_level };

    // Logs go to stderr; stdout carries the stdio transport and search output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("arxiv_researcher={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut config = if let Some(config_path) = &cli.config {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(config_path)?
    } else {
        get_config()
    };
    config.server = config.server.with_env_port()?;
    config.validate()?;

    let search = Arc::new(PaperSearch::arxiv(&config.arxiv)?);

    match cli.command.unwrap_or_default() {
        Commands::Serve { stdio, port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }

            let server = McpServer::new(search)?;

            if stdio {
                server.run().await?;
            } else {
                let addr = config.server.bind_addr();
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            }
        }

        Commands::Search {
            query,
            max_results,
            json,
        } => {
            let request = match max_results {
                Some(n) => SearchRequest::new(query)
                    .max_results(usize::try_from(n).unwrap_or(usize::MAX)),
                None => search.request(query),
            };

            let outcome = search.search(&request).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome);
            }

            if outcome.is_error() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
