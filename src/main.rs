use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use persona_mcp::context_adapter::ContextAdapter;
use persona_mcp::dispatcher::Dispatcher;
use persona_mcp::mcp::server::McpServer;
use persona_mcp::mcp::tools::registry::default_registry;
use persona_mcp::mcp::tools::ToolContext;
use persona_mcp::mcp::transport::StdioTransport;
use persona_mcp::repository::{FilePersonaRepository, PersonaRepository};

#[derive(Parser, Debug)]
#[command(name = "persona-mcp", about = "MCP server for persona selection and synthesis")]
struct Cli {
    /// Directory holding the persona store
    #[arg(long, default_value = "./data")]
    storage_dir: PathBuf,

    /// Base URL of the context-manager service
    #[arg(long)]
    context_url: Option<String>,

    /// Project name to fetch context for
    #[arg(long)]
    project: Option<String>,

    /// Confidence threshold below which personas are synthesized
    #[arg(long)]
    confidence_threshold: Option<f64>,

    /// Start with auto-generation disabled
    #[arg(long)]
    no_auto_generation: bool,

    /// Directory for daily-rotated log files; stderr only when unset
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // stdout carries the JSON-RPC stream, so logs go to stderr or a file.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _guard = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "persona-mcp.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    let context_url = cli
        .context_url
        .or_else(|| std::env::var("CONTEXT_MANAGER_URL").ok());
    let project = cli.project.or_else(|| std::env::var("PROJECT_NAME").ok());

    let repository: Arc<dyn PersonaRepository> =
        Arc::new(FilePersonaRepository::open(&cli.storage_dir)?);
    let adapter = context_url.map(|url| Arc::new(ContextAdapter::new(url)));
    let dispatcher = Arc::new(Dispatcher::new(repository.clone(), adapter, project));

    if let Some(threshold) = cli.confidence_threshold {
        dispatcher.set_confidence_threshold(threshold)?;
    }
    if cli.no_auto_generation {
        dispatcher.enable_auto_generation(false);
    }

    let registry = default_registry()?;
    let server = McpServer::new(
        registry,
        ToolContext {
            dispatcher,
            repository,
        },
    );

    info!(storage = %cli.storage_dir.display(), "persona server starting on stdio");
    let mut transport = StdioTransport::new();
    server.run(&mut transport).await?;
    Ok(())
}
