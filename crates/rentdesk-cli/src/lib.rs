//! rentdesk CLI library.
//!
//! Command implementations and output formatting for the `rentdesk-cli`
//! binary. Every lookup goes through `rentdesk_lib`; this crate only parses
//! arguments and renders results.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Args;
use rentdesk_lib::{DataSources, Datastore};

pub use output::OutputFormat;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Directory holding `stores.csv` and `orders.csv`.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format for lookup results.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl GlobalOptions {
    /// Load both datasets, falling back to fixtures per file.
    pub fn load_datastore(&self) -> Datastore {
        let sources = DataSources::resolve(self.data_dir.as_deref());
        tracing::debug!(
            stores = %sources.stores.display(),
            orders = %sources.orders.display(),
            "loading datasets"
        );
        Datastore::load(&sources)
    }
}
