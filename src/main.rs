//! scaffold-mcp - MCP servers for project introspection and scaffolding
//!
//! Serves either the frontend or the tests toolset over stdio.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scaffold_mcp::{McpServer, Toolset};

/// MCP server for project introspection and test/component scaffolding.
#[derive(Parser, Debug)]
#[command(name = "scaffold-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run in stdio mode (standard MCP transport).
    #[arg(long, default_value = "true")]
    stdio: bool,

    /// Which toolset to serve.
    #[arg(long, value_enum, default_value = "tests")]
    toolset: Toolset,

    /// Project root used when a tool call omits one (default: current directory).
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Log output file (default: stderr).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the MCP protocol, so logs go to stderr or a file.
    let (stderr_layer, file_layer) = match &args.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => (Some(fmt::layer().with_writer(std::io::stderr)), None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("cannot install tracing subscriber")?;
    Ok(())
}

fn resolve_project_root(args: &Args) -> anyhow::Result<PathBuf> {
    match &args.project_root {
        Some(root) => Ok(root.clone()),
        None => std::env::current_dir().context("cannot determine current directory"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("scaffold-mcp: {:#}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        "Starting {} v{} ({} toolset)",
        scaffold_mcp::server::SERVER_NAME,
        scaffold_mcp::server::SERVER_VERSION,
        args.toolset.server_name()
    );

    let project_root = match resolve_project_root(&args) {
        Ok(root) => root,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Default project root: {}", project_root.display());

    let server = McpServer::new(args.toolset, project_root);

    if args.stdio {
        match server.run_stdio().await {
            Ok(()) => {
                tracing::info!("Server exited cleanly");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Server error: {}", e);
                ExitCode::FAILURE
            }
        }
    } else {
        tracing::error!("Only stdio mode is currently supported");
        ExitCode::FAILURE
    }
}
