use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rentdesk_cli::commands::{check, mcp, orders, stores};
use rentdesk_cli::GlobalOptions;

#[derive(Parser, Debug)]
#[command(author, version, about = "rentdesk order and store lookups")]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every order placed with a phone number.
    Orders {
        /// 11-digit mainland mobile number.
        #[arg(long)]
        phone: String,
    },
    /// Rank stores by distance from a coordinate.
    Stores {
        /// Latitude in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Number of stores to return (1-50, default 10).
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Report dataset provenance, contents and sample lookups.
    Check {
        /// Fail when fixtures are in use or required fields are missing.
        #[arg(long)]
        strict: bool,
    },
    /// Run the MCP server over stdin/stdout.
    Mcp,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Orders { phone } => orders::handle_orders(&cli.global, &phone, &mut out),
        Command::Stores { lat, lon, limit } => {
            stores::handle_stores(&cli.global, lat, lon, limit, &mut out)
        }
        Command::Check { strict } => check::handle_check(&cli.global, strict, &mut out),
        Command::Mcp => {
            drop(out);
            mcp::handle_mcp(&cli.global)
        }
    }
}

/// Logs go to stderr so stdout only carries results or protocol traffic.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
