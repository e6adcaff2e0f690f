//! Subcommand implementations.

pub mod check;
pub mod mcp;
pub mod orders;
pub mod stores;
