//! Command-line driver for the schola classroom rendezvous simulation.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::config::CheckConfigArgs;
use commands::run::RunArgs;
use schola_core::LogLevel;

/// Schola Command Line Interface
///
/// Runs a population of teacher and student threads through quorum-gated
/// lessons and reports how many of them met their quota.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[clap(long, global = true, default_value = "warn")]
    log_level: LogLevel,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run(RunArgs),

    /// Validate a configuration file and print the resolved configuration
    #[clap(name = "check-config")]
    CheckConfig(CheckConfigArgs),
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match cli.command {
        Commands::Run(args) => commands::run::execute(&args),
        Commands::CheckConfig(args) => commands::config::execute(&args),
    }
}
