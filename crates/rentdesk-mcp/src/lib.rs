//! MCP (Model Context Protocol) server for rentdesk
//!
//! This crate exposes the order and store lookups of `rentdesk-lib` to AI
//! assistants as two MCP tools.
//!
//! # Architecture
//!
//! - `server`: Server state and JSON-RPC method dispatch
//! - `tools`: Tool implementations (query_order, query_stores)
//! - `resources`: Resource implementations (dataset info)
//! - `stdio`: Newline-delimited JSON-RPC transport over stdin/stdout
//! - `error`: JSON-RPC and tool error types
//!
//! # Transport
//!
//! The dispatcher is transport independent. The `rentdesk-mcp` binary and the
//! `rentdesk-cli mcp` subcommand serve it over stdio; `rentdesk-service` serves
//! it over HTTP.

pub mod error;
pub mod resources;
pub mod server;
pub mod stdio;
pub mod tools;
pub mod types;

pub use error::{Error, Result, ToolError};
pub use server::McpServerState;
pub use types::{JsonRpcRequest, JsonRpcResponse, ToolResult};
