use std::sync::Arc;

use anyhow::{Context, Result};
use rentdesk_mcp::server::McpServerState;
use rentdesk_mcp::stdio::serve_stdio;

use crate::GlobalOptions;

/// Serve the MCP tools over stdin/stdout until EOF or Ctrl-C.
pub fn handle_mcp(global: &GlobalOptions) -> Result<()> {
    let datastore = global.load_datastore();
    let report = datastore.report();
    tracing::info!(
        stores = datastore.stores().len(),
        orders = datastore.orders().len(),
        fixtures = report.used_fixtures(),
        "starting stdio MCP server"
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(serve_stdio(McpServerState::new(Arc::new(datastore))))
}
