use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rentdesk_lib::{DataSources, Datastore};
use rentdesk_mcp::stdio::{configure_tracing, serve_stdio};
use rentdesk_mcp::McpServerState;

/// Serve rentdesk lookups as MCP tools over stdin/stdout.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory containing stores.csv and orders.csv.
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Tracing filter, e.g. `debug` or `rentdesk_mcp=trace` (defaults to RUST_LOG).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging MUST go to stderr to avoid stdout protocol corruption
    configure_tracing(args.log_level.as_deref())?;

    let sources = DataSources::resolve(args.data_dir.as_deref());
    let datastore = Datastore::load(&sources);
    serve_stdio(McpServerState::new(Arc::new(datastore))).await
}
